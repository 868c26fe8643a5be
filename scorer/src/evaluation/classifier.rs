//! Classification of a single variant against a single locus rule.

use serde::Serialize;

use crate::helper_functions::{is_missense, is_truncating, last_three_chars};
use crate::models::{AlleleKey, AlleleSpec, VariantRecord, ANY_AMINO_ACID};

/// Loss-of-function class of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LofClass {
    /// Stop-gained or indel.
    Lof,
    /// Missense substitution.
    Snp,
    /// Anything else (synonymous, intergenic, ...).
    Nlof,
}

/// Outcome of matching a missense variant against a rule's allele list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GofMatch {
    /// Position and amino acid (or range) match.
    Double,
    /// Position matches, amino acid does not.
    Simple,
    NoMatch,
}

pub fn classify_lof(record: &VariantRecord) -> LofClass {
    let effect = record.effect();
    if is_truncating(effect) {
        LofClass::Lof
    } else if is_missense(effect) {
        LofClass::Snp
    } else {
        LofClass::Nlof
    }
}

/// Match a variant against allele entries, scanning them in catalog order.
///
/// The first entry whose key covers the variant's position decides the result.
pub fn classify_gof(record: &VariantRecord, alleles: &[AlleleSpec]) -> GofMatch {
    let effect = record.effect();
    if !is_missense(effect) {
        return GofMatch::NoMatch;
    }
    let Some(position) = record.aa_position() else {
        return GofMatch::NoMatch;
    };
    let truncating = is_truncating(effect);

    if alleles.is_empty() && !truncating {
        return GofMatch::Double;
    }

    let observed = last_three_chars(record.protein_change());
    for allele in alleles {
        match allele.key {
            AlleleKey::Range { lo, hi } => {
                if (lo..=hi).contains(&position) {
                    return GofMatch::Double;
                }
            }
            AlleleKey::Position(pos) if pos == position => {
                let hit = allele.codes.iter().any(|code| {
                    (code == ANY_AMINO_ACID && !truncating) || observed == code.as_str()
                });
                return if hit { GofMatch::Double } else { GofMatch::Simple };
            }
            AlleleKey::Position(_) | AlleleKey::Malformed(_) => {}
        }
    }

    GofMatch::NoMatch
}
