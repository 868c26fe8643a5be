use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RecordError;

/// Number of columns in an annotated variant row.
pub const RECORD_WIDTH: usize = 14;

const EFFECT_COL: usize = 4;
const LOCUS_COL: usize = 7;
const PROTEIN_COL: usize = 9;
const POSITION_COL: usize = 12;

// ─────────────────────────────────────────────────────────────────────────────
// Variant records
// ─────────────────────────────────────────────────────────────────────────────

/// One observed variant of an isolate, as a fixed-width annotated row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    fields: Vec<String>,
}

impl VariantRecord {
    pub fn new<I, S>(fields: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.len() != RECORD_WIDTH {
            return Err(RecordError::WrongWidth {
                expected: RECORD_WIDTH,
                found: fields.len(),
            });
        }
        Ok(Self { fields })
    }

    /// Effect annotation (`missense_variant`, `stop_gained`, ...).
    pub fn effect(&self) -> &str {
        &self.fields[EFFECT_COL]
    }

    pub fn locus(&self) -> &str {
        &self.fields[LOCUS_COL]
    }

    /// Protein change annotation, e.g. `p.Thr83Ile`.
    pub fn protein_change(&self) -> &str {
        &self.fields[PROTEIN_COL]
    }

    /// Amino-acid position, `None` when the column is not an integer.
    pub fn aa_position(&self) -> Option<i64> {
        self.fields[POSITION_COL].trim().parse().ok()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl TryFrom<Vec<String>> for VariantRecord {
    type Error = RecordError;

    fn try_from(fields: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rules
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MutationType {
    /// Loss of function: truncations score double, missense scores simple.
    Lof,
    /// Inverse of `Lof` for negative regulators: an intact gene scores double.
    Lofn,
    /// Gain of function: allele hits score double, other missense at a listed position simple.
    Gof,
    /// Gain of function only: allele hits score double, nothing else scores.
    Gofo,
}

impl FromStr for MutationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LOF" => Ok(Self::Lof),
            "LOFN" => Ok(Self::Lofn),
            "GOF" => Ok(Self::Gof),
            "GOFO" => Ok(Self::Gofo),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lof => "LOF",
            Self::Lofn => "LOFN",
            Self::Gof => "GOF",
            Self::Gofo => "GOFO",
        };
        write!(f, "{s}")
    }
}

/// Direction a rule pushes the antibiotic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Increase,
    Decrease,
}

impl Effect {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Increase => 1.0,
            Self::Decrease => -1.0,
        }
    }
}

impl FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Self::Increase),
            "-" => Ok(Self::Decrease),
            other => Err(other.to_string()),
        }
    }
}

/// Amino-acid position selector of an allele entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlleleKey {
    Position(i64),
    /// Inclusive `lo-hi` range; the expected codes are not consulted.
    Range { lo: i64, hi: i64 },
    /// Key that is neither an integer nor a range. Never matches.
    Malformed(String),
}

impl AlleleKey {
    pub fn parse(key: &str) -> Self {
        if let Some((lo, hi)) = key.split_once('-') {
            return match (lo.trim().parse(), hi.trim().parse()) {
                (Ok(lo), Ok(hi)) => Self::Range { lo, hi },
                _ => Self::Malformed(key.to_string()),
            };
        }
        match key.trim().parse() {
            Ok(pos) => Self::Position(pos),
            Err(_) => Self::Malformed(key.to_string()),
        }
    }
}

/// Expected amino-acid code(s) at a position. `Xxx` accepts any non-truncating change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleSpec {
    pub key: AlleleKey,
    pub codes: Vec<String>,
}

pub const ANY_AMINO_ACID: &str = "Xxx";

#[derive(Debug, Clone, PartialEq)]
pub struct SubLocus {
    pub name: String,
    pub rule: ScoringRule,
}

/// Scoring rule for one (gene, antibiotic) pair, or for a regulator sub-locus.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRule {
    pub mutation_type: MutationType,
    pub effect: Effect,
    pub simple_value: f64,
    pub doble_value: f64,
    /// Scanned in catalog order; empty means any missense qualifies.
    pub alleles: Vec<AlleleSpec>,
    pub regulators: bool,
    pub loci: Vec<SubLocus>,
}

impl ScoringRule {
    pub fn signed_simple(&self) -> f64 {
        self.effect.multiplier() * self.simple_value
    }

    pub fn signed_double(&self) -> f64 {
        self.effect.multiplier() * self.doble_value
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// Catalog gene key: a single locus, or a comma-joined group scored jointly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneKey {
    Single(String),
    Group(Vec<String>),
}

impl GeneKey {
    pub fn label(&self) -> String {
        match self {
            Self::Single(gene) => gene.clone(),
            Self::Group(members) => members.join(","),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AntibioticRule {
    pub antibiotic: String,
    pub rule: ScoringRule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneEntry {
    pub key: GeneKey,
    pub conditions: Vec<AntibioticRule>,
}

/// A rule left out at load time because its mutation type is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRule {
    pub gene: String,
    pub antibiotic: String,
    pub mutation_type: String,
}

/// Validated rule catalog, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<GeneEntry>,
    skipped: Vec<SkippedRule>,
}

impl Catalog {
    pub fn new(entries: Vec<GeneEntry>) -> Self {
        Self {
            entries,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn with_skipped(entries: Vec<GeneEntry>, skipped: Vec<SkippedRule>) -> Self {
        Self { entries, skipped }
    }

    pub fn entries(&self) -> &[GeneEntry] {
        &self.entries
    }

    pub fn skipped(&self) -> &[SkippedRule] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_record(
    locus: &str,
    effect: &str,
    protein: &str,
    position: &str,
) -> VariantRecord {
    let mut fields = vec![String::new(); RECORD_WIDTH];
    fields[EFFECT_COL] = effect.to_string();
    fields[LOCUS_COL] = locus.to_string();
    fields[PROTEIN_COL] = protein.to_string();
    fields[POSITION_COL] = position.to_string();
    VariantRecord::new(fields).expect("test record has fixed width")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_requires_fourteen_columns() {
        let err = VariantRecord::new(vec!["a"; 13]).unwrap_err();
        assert_eq!(err, RecordError::WrongWidth { expected: 14, found: 13 });
        assert!(VariantRecord::new(vec!["a"; 14]).is_ok());
    }

    #[test]
    fn record_accessors_follow_column_layout() {
        let rec = test_record("gyrA", "missense_variant", "p.Thr83Ile", " 83 ");
        assert_eq!(rec.locus(), "gyrA");
        assert_eq!(rec.effect(), "missense_variant");
        assert_eq!(rec.protein_change(), "p.Thr83Ile");
        assert_eq!(rec.aa_position(), Some(83));
    }

    #[test]
    fn garbage_position_is_none() {
        assert_eq!(test_record("gyrA", "", "", "83a").aa_position(), None);
        assert_eq!(test_record("gyrA", "", "", "").aa_position(), None);
    }

    #[test]
    fn allele_keys_parse() {
        assert_eq!(AlleleKey::parse("83"), AlleleKey::Position(83));
        assert_eq!(AlleleKey::parse("80-93"), AlleleKey::Range { lo: 80, hi: 93 });
        assert_eq!(AlleleKey::parse("8x"), AlleleKey::Malformed("8x".into()));
        assert_eq!(AlleleKey::parse("80-"), AlleleKey::Malformed("80-".into()));
    }

    #[test]
    fn mutation_type_tokens() {
        assert_eq!("LOFN".parse::<MutationType>(), Ok(MutationType::Lofn));
        assert_eq!(" GOFO ".parse::<MutationType>(), Ok(MutationType::Gofo));
        assert_eq!("SNP".parse::<MutationType>(), Err("SNP".to_string()));
        assert_eq!(MutationType::Gof.to_string(), "GOF");
    }

    #[test]
    fn effect_sign() {
        assert_eq!("+".parse::<Effect>().map(Effect::multiplier), Ok(1.0));
        assert_eq!("-".parse::<Effect>().map(Effect::multiplier), Ok(-1.0));
        assert!("x".parse::<Effect>().is_err());
    }
}
