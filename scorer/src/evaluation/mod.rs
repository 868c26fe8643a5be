pub mod aggregate;
pub mod classifier;
pub mod condition;
pub mod regulators;
