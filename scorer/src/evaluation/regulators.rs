//! Scoring of a main locus together with its regulatory sub-loci.

use serde::Serialize;
use tracing::debug;

use crate::config::RegulatorPolicy;
use crate::data_handling::variants::records_at;
use crate::evaluation::condition::evaluate_condition;
use crate::models::{ScoringRule, VariantRecord};

/// A sub-locus whose rule fired on one of its records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiredRegulator {
    pub locus: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulatorOutcome {
    /// Sum over every record at the main locus, fired or not.
    pub main_score: f64,
    pub regulators: Vec<FiredRegulator>,
}

impl RegulatorOutcome {
    pub fn regulator_pass(&self) -> bool {
        !self.regulators.is_empty()
    }

    pub fn regulator_value(&self) -> f64 {
        self.regulators.iter().map(|r| r.value).sum()
    }

    pub fn total(&self) -> f64 {
        if self.regulator_pass() {
            self.main_score + self.regulator_value()
        } else {
            self.main_score
        }
    }
}

pub fn regulator_outcome(
    gene: &str,
    rule: &ScoringRule,
    records: &[VariantRecord],
    policy: RegulatorPolicy,
) -> RegulatorOutcome {
    let mut regulators = Vec::new();
    for sub in &rule.loci {
        // at most one firing record per sub-locus
        let fired = records_at(records, &sub.name)
            .map(|rec| evaluate_condition(rec, &sub.rule))
            .find(|c| c.fired);
        if let Some(contribution) = fired {
            debug!(
                "Regulator {} of {} fired with {}",
                sub.name, gene, contribution.value
            );
            regulators.push(FiredRegulator {
                locus: sub.name.clone(),
                value: contribution.value,
            });
            if policy == RegulatorPolicy::FirstFiring {
                break;
            }
        }
    }

    let main_score = records_at(records, gene)
        .map(|rec| evaluate_condition(rec, rule).value)
        .sum();

    RegulatorOutcome {
        main_score,
        regulators,
    }
}

pub fn evaluate_with_regulators(
    gene: &str,
    rule: &ScoringRule,
    records: &[VariantRecord],
    policy: RegulatorPolicy,
) -> f64 {
    regulator_outcome(gene, rule, records, policy).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{test_record, Effect, MutationType, SubLocus};
    use approx::assert_relative_eq;

    fn lof(effect: Effect, simple: f64, double: f64) -> ScoringRule {
        ScoringRule {
            mutation_type: MutationType::Lof,
            effect,
            simple_value: simple,
            doble_value: double,
            alleles: Vec::new(),
            regulators: false,
            loci: Vec::new(),
        }
    }

    fn with_loci(mut rule: ScoringRule, loci: Vec<(&str, ScoringRule)>) -> ScoringRule {
        rule.regulators = true;
        rule.loci = loci
            .into_iter()
            .map(|(name, rule)| SubLocus { name: name.to_string(), rule })
            .collect();
        rule
    }

    #[test]
    fn no_firing_regulator_leaves_main_score() {
        let rule = with_loci(
            lof(Effect::Increase, 1.0, 2.0),
            vec![("mexR", lof(Effect::Increase, 10.0, 20.0))],
        );
        let records = vec![
            test_record("mexB", "stop_gained", "", ""),
            test_record("mexB", "missense_variant", "", ""),
            test_record("mexR", "synonymous_variant", "", ""),
        ];
        let outcome = regulator_outcome("mexB", &rule, &records, RegulatorPolicy::FirstFiring);
        assert!(!outcome.regulator_pass());
        assert_relative_eq!(outcome.total(), 3.0);
    }

    #[test]
    fn first_firing_record_per_sub_locus_counts_once() {
        let rule = with_loci(
            lof(Effect::Increase, 1.0, 2.0),
            vec![("mexR", lof(Effect::Increase, 10.0, 20.0))],
        );
        let records = vec![
            test_record("mexB", "missense_variant", "", ""),
            test_record("mexR", "synonymous_variant", "", ""),
            test_record("mexR", "missense_variant", "", ""),
            test_record("mexR", "stop_gained", "", ""),
        ];
        let total = evaluate_with_regulators("mexB", &rule, &records, RegulatorPolicy::FirstFiring);
        assert_relative_eq!(total, 1.0 + 10.0);

        let summed = evaluate_with_regulators("mexB", &rule, &records, RegulatorPolicy::SumFiring);
        assert_relative_eq!(summed, 1.0 + 10.0);
    }

    #[test]
    fn only_first_firing_sub_locus_counts_by_default() {
        let rule = with_loci(
            lof(Effect::Increase, 1.0, 2.0),
            vec![
                ("nalC", lof(Effect::Increase, 0.0, 0.0)),
                ("nalD", lof(Effect::Increase, 3.0, 4.0)),
                ("mexR", lof(Effect::Increase, 5.0, 6.0)),
            ],
        );
        let records = vec![
            test_record("mexR", "stop_gained", "", ""),
            test_record("nalD", "missense_variant", "", ""),
        ];

        let first = regulator_outcome("mexB", &rule, &records, RegulatorPolicy::FirstFiring);
        assert_eq!(
            first.regulators,
            vec![FiredRegulator { locus: "nalD".into(), value: 3.0 }]
        );
        assert_relative_eq!(first.total(), 3.0);

        let all = regulator_outcome("mexB", &rule, &records, RegulatorPolicy::SumFiring);
        assert_relative_eq!(all.total(), 3.0 + 6.0);
    }

    #[test]
    fn main_locus_records_all_contribute() {
        let rule = with_loci(
            lof(Effect::Decrease, 1.0, 2.0),
            vec![("ampR", lof(Effect::Increase, 1.0, 1.0))],
        );
        let records = vec![
            test_record("ampC", "stop_gained", "", ""),
            test_record("ampC", "missense_variant", "", ""),
            test_record("ampC", "synonymous_variant", "", ""),
        ];
        let outcome = regulator_outcome("ampC", &rule, &records, RegulatorPolicy::FirstFiring);
        assert_relative_eq!(outcome.main_score, -3.0);
        assert_relative_eq!(outcome.total(), -3.0);
    }

    #[test]
    fn regulator_without_main_records() {
        let rule = with_loci(
            lof(Effect::Increase, 1.0, 2.0),
            vec![("mexZ", lof(Effect::Increase, 2.0, 4.0))],
        );
        let records = vec![test_record("mexZ", "stop_gained", "", "")];
        assert_relative_eq!(
            evaluate_with_regulators("mexY", &rule, &records, RegulatorPolicy::FirstFiring),
            4.0
        );
    }
}
