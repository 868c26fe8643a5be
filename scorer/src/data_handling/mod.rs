pub mod catalog;
pub mod variants;
