//! Scoring of many isolates against one catalog.
//!
//! Each isolate gets its own report; the catalog and config are only read,
//! so isolates are scored in parallel with rayon.

use rayon::prelude::*;
use tracing::info;

use crate::evaluation::aggregate::{ScoreReport, Scorer};
use crate::models::VariantRecord;

#[derive(Debug, Clone)]
pub struct Isolate {
    pub id: String,
    pub records: Vec<VariantRecord>,
}

impl Isolate {
    pub fn new(id: impl Into<String>, records: Vec<VariantRecord>) -> Self {
        Self {
            id: id.into(),
            records,
        }
    }
}

impl Scorer {
    /// Reports come back in the same order as `isolates`.
    pub fn score_isolates<'a>(&self, isolates: &'a [Isolate]) -> Vec<(&'a str, ScoreReport)> {
        info!("Scoring {} isolates", isolates.len());
        isolates
            .par_iter()
            .map(|isolate| (isolate.id.as_str(), self.score(&isolate.records)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::models::{test_record, Catalog};
    use approx::assert_relative_eq;
    use serde_json::json;

    fn scorer() -> Scorer {
        let catalog = Catalog::from_value(json!({
            "gyrA": {"CIP": {"mutation_type": "GOF", "effect": "+", "simple_value": 1, "doble_value": 2,
                             "alleles": {"83": "Ile", "87": ["Asn", "Gly"]}, "regulators": "NO"}},
            "oprD": {"MER": {"mutation_type": "LOF", "effect": "+", "simple_value": 1, "doble_value": 2, "regulators": "NO"}}
        }))
        .unwrap();
        Scorer::new(catalog, ScoringConfig::default())
    }

    #[test]
    fn parallel_matches_sequential() {
        let scorer = scorer();
        let isolates: Vec<Isolate> = (0..32)
            .map(|i| {
                let position = if i % 2 == 0 { "83" } else { "87" };
                let mut records = vec![test_record("gyrA", "missense_variant", "p.Xaa0Ile", position)];
                if i % 3 == 0 {
                    records.push(test_record("oprD", "stop_gained", "", ""));
                }
                Isolate::new(format!("PA{i:03}"), records)
            })
            .collect();

        let reports = scorer.score_isolates(&isolates);
        assert_eq!(reports.len(), isolates.len());
        for ((id, report), isolate) in reports.iter().zip(&isolates) {
            assert_eq!(*id, isolate.id);
            assert_eq!(report, &scorer.score(&isolate.records));
        }

        // PA000: Ile at 83 (double) + oprD stop; PA001: Ile at 87 is not an expected code
        assert_relative_eq!(reports[0].1.total("CIP").unwrap(), 2.0);
        assert_relative_eq!(reports[0].1.total("MER").unwrap(), 2.0);
        assert_relative_eq!(reports[1].1.total("CIP").unwrap(), 1.0);
        assert_relative_eq!(reports[1].1.total("MER").unwrap(), 0.0);
    }

    #[test]
    fn scorer_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scorer>();
        assert_send_sync::<Isolate>();
    }
}
