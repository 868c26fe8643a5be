use thiserror::Error;

/// Raised while turning raw rows into [`crate::models::VariantRecord`]s.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("variant record has {found} columns, expected {expected}")]
    WrongWidth { expected: usize, found: usize },
}

/// Catalog schema violations that make a rule impossible to interpret.
///
/// Every variant carries the gene (and antibiotic where relevant) key so the
/// offending entry can be found in the source catalog. Sub-locus rules are
/// reported as `parent>sub`.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse scoring catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scoring catalog root must be an object keyed by gene")]
    RootNotObject,

    #[error("conditions for gene `{gene}` must be an object keyed by antibiotic")]
    GeneNotObject { gene: String },

    #[error("gene group `{gene}` does not name any gene")]
    EmptyGroup { gene: String },

    #[error("{gene}/{antibiotic}: missing required field `{field}`")]
    MissingField {
        gene: String,
        antibiotic: String,
        field: &'static str,
    },

    #[error("{gene}/{antibiotic}: invalid value {value} for `{field}`")]
    InvalidField {
        gene: String,
        antibiotic: String,
        field: &'static str,
        value: String,
    },

    #[error("{gene}/{antibiotic}: malformed rule: {source}")]
    Malformed {
        gene: String,
        antibiotic: String,
        source: serde_json::Error,
    },
}
