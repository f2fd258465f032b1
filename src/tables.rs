//! Static reference data: the brand-to-generic name map, the allergy
//! conflict table, and the readable expansions for frequency and food-timing
//! codes.
//!
//! All tables are initialized lazily on first use and never mutated after,
//! so concurrent translations can read them without synchronization.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Short or brand name (lower-case) to generic drug name.
static GENERIC_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("pcm", "Paracetamol"),
        ("amox", "Amoxicillin"),
        ("cetirizine", "Cetirizine"),
        ("hydrocortisone", "Hydrocortisone"),
    ])
});

/// Allergen (lower-case) to the short/generic drug identifiers it
/// conflicts with.
static ALLERGY_CONFLICTS: Lazy<HashMap<&'static str, HashSet<&'static str>>> =
    Lazy::new(|| HashMap::from([("penicillin", HashSet::from(["amox", "amoxicillin"]))]));

/// Resolve a short or brand drug name to its generic name.
///
/// Lookup is case-insensitive; names without a mapping resolve to
/// themselves verbatim.
pub fn generic_name(short_name: &str) -> String {
    match GENERIC_NAMES.get(short_name.to_lowercase().as_str()) {
        Some(generic) => (*generic).to_string(),
        None => short_name.to_string(),
    }
}

/// Conflict set for an allergen, if one is on record. Lookup is
/// case-insensitive.
pub fn allergy_conflicts(allergen: &str) -> Option<&'static HashSet<&'static str>> {
    ALLERGY_CONFLICTS.get(allergen.to_lowercase().as_str())
}

/// Expand a frequency code to a readable phrase. Standard codes come from a
/// fixed table, `q<N>h` becomes "every N hours", anything else passes
/// through verbatim.
pub fn expand_frequency(code: &str) -> String {
    let lower = code.to_lowercase();
    match lower.as_str() {
        "od" => "once daily".to_string(),
        "bd" => "twice daily".to_string(),
        "tds" => "three times daily".to_string(),
        "qid" => "four times daily".to_string(),
        "hs" => "at night".to_string(),
        "stat" => "immediately (stat)".to_string(),
        "prn" => "as needed (prn)".to_string(),
        "sos" => "if needed (sos)".to_string(),
        _ => {
            if lower.starts_with('q') && lower.ends_with('h') {
                format!("every {} hours", &lower[1..lower.len() - 1])
            } else {
                code.to_string()
            }
        }
    }
}

/// Expand a food-timing code to a readable phrase; unrecognized codes pass
/// through verbatim.
pub fn expand_food(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "ac" | "before_food" => "before food".to_string(),
        "pc" | "after_food" => "after food".to_string(),
        "with_meals" => "with meals".to_string(),
        _ => code.to_string(),
    }
}
