//! Validation of an already-deserialized scoring catalog.
//!
//! The catalog arrives as nested JSON: gene → antibiotic → rule. Every string
//! flag is resolved here, once, so evaluation never dispatches on raw tokens.

use std::io::Read;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::error::CatalogError;
use crate::models::{
    AlleleKey, AlleleSpec, AntibioticRule, Catalog, Effect, GeneEntry, GeneKey, MutationType,
    ScoringRule, SkippedRule, SubLocus,
};

/// Rule exactly as written in the catalog, before validation.
#[derive(Debug, Deserialize)]
struct RawRule {
    mutation_type: Option<String>,
    effect: Option<String>,
    simple_value: Option<f64>,
    doble_value: Option<f64>,
    alleles: Option<Map<String, Value>>,
    regulators: Option<String>,
    loci: Option<Map<String, Value>>,
}

impl Catalog {
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let Value::Object(genes) = value else {
            return Err(CatalogError::RootNotObject);
        };

        let mut entries = Vec::with_capacity(genes.len());
        let mut skipped = Vec::new();

        for (gene, conditions) in genes {
            let key = parse_gene_key(&gene)?;
            let Value::Object(conditions) = conditions else {
                return Err(CatalogError::GeneNotObject { gene });
            };

            let mut rules = Vec::with_capacity(conditions.len());
            for (antibiotic, raw) in conditions {
                if let Some(rule) = parse_rule(&gene, &antibiotic, raw, &mut skipped)? {
                    rules.push(AntibioticRule { antibiotic, rule });
                }
            }
            entries.push(GeneEntry {
                key,
                conditions: rules,
            });
        }

        info!(
            "Loaded scoring catalog: {} gene entries, {} rules skipped",
            entries.len(),
            skipped.len()
        );
        Ok(Catalog::with_skipped(entries, skipped))
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Self::from_value(serde_json::from_reader(reader)?)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Catalog::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn parse_gene_key(gene: &str) -> Result<GeneKey, CatalogError> {
    if !gene.contains(',') {
        return Ok(GeneKey::Single(gene.to_string()));
    }
    let members: Vec<String> = gene
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if members.is_empty() {
        return Err(CatalogError::EmptyGroup {
            gene: gene.to_string(),
        });
    }
    Ok(GeneKey::Group(members))
}

/// `Ok(None)` means the rule was skipped for an unknown mutation type.
fn parse_rule(
    gene: &str,
    antibiotic: &str,
    raw: Value,
    skipped: &mut Vec<SkippedRule>,
) -> Result<Option<ScoringRule>, CatalogError> {
    let missing = |field: &'static str| CatalogError::MissingField {
        gene: gene.to_string(),
        antibiotic: antibiotic.to_string(),
        field,
    };
    let invalid = |field: &'static str, value: String| CatalogError::InvalidField {
        gene: gene.to_string(),
        antibiotic: antibiotic.to_string(),
        field,
        value,
    };

    let raw: RawRule = serde_json::from_value(raw).map_err(|source| CatalogError::Malformed {
        gene: gene.to_string(),
        antibiotic: antibiotic.to_string(),
        source,
    })?;

    let token = raw.mutation_type.ok_or_else(|| missing("mutation_type"))?;
    let mutation_type = match token.parse::<MutationType>() {
        Ok(mutation_type) => mutation_type,
        Err(token) => {
            error!(
                "Unknown mutation_type {:?} for {}/{} (not LOF, LOFN, GOF or GOFO), rule skipped",
                token, gene, antibiotic
            );
            skipped.push(SkippedRule {
                gene: gene.to_string(),
                antibiotic: antibiotic.to_string(),
                mutation_type: token,
            });
            return Ok(None);
        }
    };

    let effect = raw
        .effect
        .ok_or_else(|| missing("effect"))?
        .parse::<Effect>()
        .map_err(|token| invalid("effect", format!("{token:?}")))?;

    let simple_value = raw.simple_value.ok_or_else(|| missing("simple_value"))?;
    let doble_value = raw.doble_value.ok_or_else(|| missing("doble_value"))?;
    for (field, value) in [("simple_value", simple_value), ("doble_value", doble_value)] {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(field, value.to_string()));
        }
    }

    let regulators = match raw.regulators.as_deref().map(str::trim) {
        None | Some("NO") => false,
        Some("YES") => true,
        Some(other) => return Err(invalid("regulators", format!("{other:?}"))),
    };

    let alleles = match raw.alleles {
        Some(alleles) => parse_alleles(gene, antibiotic, alleles)?,
        None if matches!(mutation_type, MutationType::Gof | MutationType::Gofo) => {
            return Err(missing("alleles"));
        }
        None => Vec::new(),
    };

    let mut loci = Vec::new();
    for (name, sub_raw) in raw.loci.unwrap_or_default() {
        let context = format!("{gene}>{name}");
        if let Some(rule) = parse_rule(&context, antibiotic, sub_raw, skipped)? {
            loci.push(SubLocus { name, rule });
        }
    }
    if regulators && loci.is_empty() {
        debug!("{}/{}: regulators = YES but no sub-loci are listed", gene, antibiotic);
    }

    Ok(Some(ScoringRule {
        mutation_type,
        effect,
        simple_value,
        doble_value,
        alleles,
        regulators,
        loci,
    }))
}

fn parse_alleles(
    gene: &str,
    antibiotic: &str,
    alleles: Map<String, Value>,
) -> Result<Vec<AlleleSpec>, CatalogError> {
    alleles
        .into_iter()
        .map(|(raw_key, codes)| {
            let codes = match codes {
                Value::String(code) => vec![code],
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(code) => Ok(code),
                        other => Err(other),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|other| CatalogError::InvalidField {
                        gene: gene.to_string(),
                        antibiotic: antibiotic.to_string(),
                        field: "alleles",
                        value: other.to_string(),
                    })?,
                other => {
                    return Err(CatalogError::InvalidField {
                        gene: gene.to_string(),
                        antibiotic: antibiotic.to_string(),
                        field: "alleles",
                        value: other.to_string(),
                    })
                }
            };

            let key = AlleleKey::parse(&raw_key);
            match &key {
                AlleleKey::Malformed(k) => {
                    warn!(
                        "{}/{}: allele key {:?} is not a position or range, it will never match",
                        gene, antibiotic, k
                    );
                }
                AlleleKey::Range { lo, hi } if lo > hi => {
                    warn!("{}/{}: allele range {}-{} is empty", gene, antibiotic, lo, hi);
                }
                _ => {}
            }
            Ok(AlleleSpec { key, codes })
        })
        .collect()
}
