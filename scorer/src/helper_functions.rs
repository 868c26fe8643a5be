use std::env;
use std::path::PathBuf;

/// Environment variable naming an optional JSON scoring config.
pub const CONFIG_ENV_VAR: &str = "RESISTANCE_SCORER_CONFIG";

pub fn config_path() -> Option<PathBuf> {
    match env::var_os(CONFIG_ENV_VAR) {
        Some(val) if !val.is_empty() => Some(PathBuf::from(val)),
        _ => None,
    }
}

/// Case-insensitive substring test. `needle` must already be lowercase.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Stop-gained or indel annotations, i.e. changes that truncate or shift the product.
pub fn is_truncating(effect: &str) -> bool {
    let effect = effect.to_lowercase();
    effect.contains("stop") || effect.contains("indel")
}

pub fn is_missense(effect: &str) -> bool {
    contains_ci(effect, "missense_variant")
}

/// Last three characters of a protein change annotation (`p.Thr83Ile` -> `Ile`).
/// Shorter annotations are returned whole.
pub fn last_three_chars(annotation: &str) -> &str {
    match annotation.char_indices().rev().nth(2) {
        Some((idx, _)) => &annotation[idx..],
        None => annotation,
    }
}
