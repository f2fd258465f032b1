//! Semantic checks over a parsed document.
//!
//! A pure pass: the document is never mutated and every check always runs,
//! with no short-circuiting on earlier failures. All positions are pinned to
//! 1:1; only the parser tracks real token coordinates.

use std::collections::HashSet;

use crate::ast::Document;
use crate::diagnostics::Diagnostic;
use crate::tables;

/// Paracetamol single doses above this many milligrams draw a warning.
const PARACETAMOL_SINGLE_DOSE_LIMIT_MG: f64 = 1000.0;

/// Analyze a document and return its semantic diagnostics in detection
/// order.
pub fn analyze(document: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let name_missing = document
        .patient
        .name
        .as_deref()
        .map_or(true, |name| name.trim().is_empty());
    if name_missing {
        diagnostics.push(Diagnostic::warning(
            1,
            1,
            "Patient name is missing (add: patient <Name> ...)",
        ));
    }

    let mut seen = HashSet::new();
    for medication in &document.medications {
        let key = medication.name.to_lowercase();
        if !seen.insert(key.clone()) {
            diagnostics.push(Diagnostic::warning(
                1,
                1,
                format!("Duplicate medication detected: {}", medication.name),
            ));
        }

        if leading_number(&medication.dose.strength) <= 0.0 {
            diagnostics.push(Diagnostic::error(
                1,
                1,
                format!("Dose must be positive for {}", medication.name),
            ));
        }

        if medication.duration.value <= 0.0 {
            diagnostics.push(Diagnostic::error(
                1,
                1,
                format!("Duration must be > 0 for {}", medication.name),
            ));
        }

        // Topical forms cannot take invasive routes.
        if let Some(route) = &medication.route {
            let topical_form = medication.form.eq_ignore_ascii_case("Oint")
                || medication.form.eq_ignore_ascii_case("Cream");
            if topical_form && (route == "iv" || route == "im") {
                diagnostics.push(Diagnostic::error(
                    1,
                    1,
                    format!(
                        "Invalid route '{}' for {} {}",
                        route, medication.form, medication.name
                    ),
                ));
            }
        }

        if (key == "pcm" || key == "paracetamol") && medication.dose.strength.contains("mg") {
            let mg = leading_number(&medication.dose.strength);
            if mg > PARACETAMOL_SINGLE_DOSE_LIMIT_MG {
                diagnostics.push(Diagnostic::warning(
                    1,
                    1,
                    format!("High single dose for Paracetamol ({mg}mg). Check safety limits."),
                ));
            }
        }

        for allergy in &document.allergies {
            if let Some(conflicts) = tables::allergy_conflicts(allergy) {
                let generic = tables::generic_name(&key).to_lowercase();
                if conflicts.contains(key.as_str()) || conflicts.contains(generic.as_str()) {
                    diagnostics.push(Diagnostic::error(
                        1,
                        1,
                        format!(
                            "Allergy conflict: patient allergy '{}' conflicts with {}",
                            allergy, medication.name
                        ),
                    ));
                }
            }
        }
    }

    diagnostics
}

/// Leading numeric value of a strength string: the first decimal number
/// found scanning left to right, or, failing that, the first `n/m` fraction
/// evaluated as a division. Zero when neither appears.
fn leading_number(text: &str) -> f64 {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len()
                && chars[i] == '.'
                && i + 1 < chars.len()
                && chars[i + 1].is_ascii_digit()
            {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let number: String = chars[start..i].iter().collect();
            return number.parse().unwrap_or(0.0);
        }
        i += 1;
    }
    first_fraction(&chars).unwrap_or(0.0)
}

fn first_fraction(chars: &[char]) -> Option<f64> {
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len()
                && chars[i] == '/'
                && i + 1 < chars.len()
                && chars[i + 1].is_ascii_digit()
            {
                let numerator: String = chars[start..i].iter().collect();
                i += 1;
                let den_start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let denominator: String = chars[den_start..i].iter().collect();
                let n: f64 = numerator.parse().ok()?;
                let d: f64 = denominator.parse().ok()?;
                return Some(n / d);
            }
        } else {
            i += 1;
        }
    }
    None
}
