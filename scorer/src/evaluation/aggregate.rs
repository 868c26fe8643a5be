//! Per-antibiotic aggregation over a whole rule catalog.
//!
//! Genes are visited in catalog order. Each gene entry is either a single
//! locus, scored rule by rule, or a comma-joined group of co-dependent loci
//! that is switched off entirely when any member carries a loss-of-function
//! variant.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::data_handling::variants::records_at;
use crate::evaluation::classifier::{classify_lof, LofClass};
use crate::evaluation::condition::evaluate_condition;
use crate::evaluation::regulators::evaluate_with_regulators;
use crate::models::{AntibioticRule, Catalog, GeneKey, VariantRecord};

/// Signed running totals keyed by antibiotic code, in report order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AntibioticScores {
    scores: Vec<(String, f64)>,
}

impl AntibioticScores {
    pub fn new<I, S>(tracked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scores = Self::default();
        for code in tracked {
            let code = code.into();
            if scores.get(&code).is_none() {
                scores.scores.push((code, 0.0));
            }
        }
        scores
    }

    pub fn add(&mut self, antibiotic: &str, value: f64) {
        match self.scores.iter_mut().find(|(code, _)| code == antibiotic) {
            Some((_, total)) => *total += value,
            None => {
                debug!("Antibiotic {} is not tracked, adding it to the report", antibiotic);
                self.scores.push((antibiotic.to_string(), value));
            }
        }
    }

    pub fn get(&self, antibiotic: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(code, _)| code == antibiotic)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(code, total)| (code.as_str(), *total))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Serialize for AntibioticScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scores.len()))?;
        for (code, total) in &self.scores {
            map.serialize_entry(code, total)?;
        }
        map.end()
    }
}

/// One contribution added to an antibiotic total, for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub antibiotic: String,
    pub gene: String,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub totals: AntibioticScores,
    pub trace: Vec<TraceEntry>,
}

impl ScoreReport {
    fn new(config: &ScoringConfig) -> Self {
        Self {
            totals: AntibioticScores::new(config.antibiotics.iter().cloned()),
            trace: Vec::new(),
        }
    }

    fn record(&mut self, antibiotic: &str, gene: &str, contribution: f64) {
        self.totals.add(antibiotic, contribution);
        self.trace.push(TraceEntry {
            antibiotic: antibiotic.to_string(),
            gene: gene.to_string(),
            contribution,
        });
    }

    pub fn total(&self, antibiotic: &str) -> Option<f64> {
        self.totals.get(antibiotic)
    }

    pub fn trace_for<'a>(
        &'a self,
        antibiotic: &'a str,
    ) -> impl Iterator<Item = &'a TraceEntry> + 'a {
        self.trace.iter().filter(move |e| e.antibiotic == antibiotic)
    }
}

pub fn aggregate(
    catalog: &Catalog,
    records: &[VariantRecord],
    config: &ScoringConfig,
) -> ScoreReport {
    let mut report = ScoreReport::new(config);

    for entry in catalog.entries() {
        match &entry.key {
            GeneKey::Group(members) => {
                score_group(members, &entry.conditions, records, config, &mut report)
            }
            GeneKey::Single(gene) => {
                score_single(gene, &entry.conditions, records, config, &mut report)
            }
        }
    }

    info!(
        "Scored {} records against {} gene entries ({} contributions)",
        records.len(),
        catalog.entries().len(),
        report.trace.len()
    );
    report
}

fn score_group(
    members: &[String],
    conditions: &[AntibioticRule],
    records: &[VariantRecord],
    config: &ScoringConfig,
    report: &mut ScoreReport,
) {
    let knocked_out = records
        .iter()
        .filter(|r| members.iter().any(|m| m == r.locus()))
        .find(|r| classify_lof(r) == LofClass::Lof);
    if let Some(rec) = knocked_out {
        debug!(
            "Gene group {} inactive: loss of function in {}",
            members.join(","),
            rec.locus()
        );
        return;
    }

    for condition in conditions {
        for member in members {
            let score =
                evaluate_with_regulators(member, &condition.rule, records, config.regulator_policy);
            report.record(&condition.antibiotic, member, score);
        }
    }
}

/// Regulated rules are evaluated even when `gene` has no records of its own,
/// so a firing regulator alone can move the total. Unregulated rules only see
/// records at `gene`.
fn score_single(
    gene: &str,
    conditions: &[AntibioticRule],
    records: &[VariantRecord],
    config: &ScoringConfig,
    report: &mut ScoreReport,
) {
    for condition in conditions {
        if condition.rule.regulators {
            let score =
                evaluate_with_regulators(gene, &condition.rule, records, config.regulator_policy);
            report.record(&condition.antibiotic, gene, score);
        } else {
            for rec in records_at(records, gene) {
                let score = evaluate_condition(rec, &condition.rule).value;
                report.record(&condition.antibiotic, gene, score);
            }
        }
    }
}

/// Owns a validated catalog and the config it is evaluated under.
#[derive(Debug, Clone)]
pub struct Scorer {
    catalog: Catalog,
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(catalog: Catalog, config: ScoringConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, records: &[VariantRecord]) -> ScoreReport {
        aggregate(&self.catalog, records, &self.config)
    }
}
