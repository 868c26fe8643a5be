//! Antibiotic resistance scoring for bacterial isolates.
//!
//! A rule catalog (gene → antibiotic → rule) is validated once, then applied
//! to the annotated variants of an isolate to produce one signed score per
//! antibiotic, plus a per-gene trace of every contribution.
//!
//! - `data_handling/`: catalog validation and variant row conversion
//! - `evaluation/`: variant classification, rule evaluation, regulator and catalog aggregation
//! - `batch`: parallel scoring of many isolates

pub mod batch;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluation;
pub mod helper_functions;
pub mod models;

pub use batch::Isolate;
pub use config::{RegulatorPolicy, ScoringConfig};
pub use data_handling::variants::records_from_rows;
pub use error::{CatalogError, RecordError};
pub use evaluation::aggregate::{aggregate, AntibioticScores, ScoreReport, Scorer, TraceEntry};
pub use evaluation::classifier::{classify_gof, classify_lof, GofMatch, LofClass};
pub use evaluation::condition::{evaluate_condition, Contribution};
/// `RegulatorPolicy::FirstFiring` gives the documented behaviour: only the first
/// sub-locus with a firing record adds to the main locus score.
pub use evaluation::regulators::evaluate_with_regulators;
pub use models::{Catalog, MutationType, ScoringRule, VariantRecord};

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
