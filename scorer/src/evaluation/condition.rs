use serde::Serialize;

use crate::evaluation::classifier::{classify_gof, classify_lof, GofMatch, LofClass};
use crate::models::{MutationType, ScoringRule, VariantRecord};

/// Result of applying one rule to one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contribution {
    /// Whether the rule recognised the variant. Gates regulator sub-loci.
    pub fired: bool,
    pub value: f64,
}

impl Contribution {
    pub const NONE: Self = Self {
        fired: false,
        value: 0.0,
    };

    fn fired(value: f64) -> Self {
        Self { fired: true, value }
    }
}

pub fn evaluate_condition(record: &VariantRecord, rule: &ScoringRule) -> Contribution {
    match rule.mutation_type {
        MutationType::Lof => match classify_lof(record) {
            LofClass::Lof => Contribution::fired(rule.signed_double()),
            LofClass::Snp => Contribution::fired(rule.signed_simple()),
            LofClass::Nlof => Contribution::NONE,
        },
        // intact negative regulator => downstream target stays active
        MutationType::Lofn => match classify_lof(record) {
            LofClass::Lof => Contribution::NONE,
            LofClass::Snp => Contribution::fired(rule.signed_simple()),
            LofClass::Nlof => Contribution::fired(rule.signed_double()),
        },
        MutationType::Gof | MutationType::Gofo => match classify_gof(record, &rule.alleles) {
            GofMatch::Double => Contribution::fired(rule.signed_double()),
            GofMatch::Simple if rule.mutation_type == MutationType::Gof => {
                Contribution::fired(rule.signed_simple())
            }
            GofMatch::Simple | GofMatch::NoMatch => Contribution::NONE,
        },
    }
}
