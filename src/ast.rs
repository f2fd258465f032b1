//! Abstract syntax tree for a MedScript document.
//!
//! The parser builds these types and every later stage only reads them.

/// A complete shorthand document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub patient: Patient,
    /// Lower-cased allergy names, first occurrence wins, insertion order kept.
    pub allergies: Vec<String>,
    pub medications: Vec<Medication>,
    pub notes: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an allergy name. Matching is case-insensitive: names are
    /// stored lower-cased and duplicates are dropped.
    pub fn add_allergy(&mut self, name: &str) {
        let key = name.to_lowercase();
        if !self.allergies.contains(&key) {
            self.allergies.push(key);
        }
    }
}

/// Patient details. Every field stays unset until a `patient` section
/// provides it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patient {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub weight_kg: Option<f64>,
}

/// One prescribed medication.
#[derive(Debug, Clone, PartialEq)]
pub struct Medication {
    /// Dosage form code as written, e.g. "Tab" or "Syr".
    pub form: String,
    /// Short or brand name as written; resolved to a generic name only at
    /// emission and in semantic checks.
    pub name: String,
    pub dose: Dose,
    /// Lower-cased route code, absent when the shorthand omits it.
    pub route: Option<String>,
    /// Lower-cased frequency code, e.g. "tds" or "q6h".
    pub frequency: String,
    pub duration: Duration,
    /// Lower-cased food-timing code, absent when the shorthand omits it.
    pub food_modifier: Option<String>,
    /// Trailing identifiers absorbed as boolean flags, mapped to "true".
    /// First occurrence keeps its position when a flag repeats.
    pub extras: Vec<(String, String)>,
}

/// Dose strength plus an optional second quantity such as a syrup volume.
///
/// Both are opaque formatted strings ("500mg", "5mg/5ml", "1%"); semantic
/// checks extract a leading number when they need a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dose {
    pub strength: String,
    pub amount: Option<String>,
}

/// Length of a course: a numeric value and a unit code (`d`, `w` or `m`).
///
/// The unit stays a raw string because the parser may have synthesized an
/// empty one; consumers decide their own fallback for codes they do not
/// recognize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Duration {
    pub value: f64,
    pub unit: String,
}

impl Duration {
    /// Whole-day count, rounded half away from zero. Weeks count 7 days and
    /// months a fixed 30; unrecognized unit codes count the value as days.
    pub fn to_days_rounded(&self) -> i64 {
        let days = match self.unit.as_str() {
            "w" => self.value * 7.0,
            "m" => self.value * 30.0,
            _ => self.value,
        };
        days.round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_converts_weeks_and_months_to_days() {
        let days = Duration {
            value: 5.0,
            unit: "d".into(),
        };
        let weeks = Duration {
            value: 2.0,
            unit: "w".into(),
        };
        let months = Duration {
            value: 1.0,
            unit: "m".into(),
        };
        assert_eq!(days.to_days_rounded(), 5);
        assert_eq!(weeks.to_days_rounded(), 14);
        assert_eq!(months.to_days_rounded(), 30);
    }

    #[test]
    fn duration_rounds_half_away_from_zero() {
        let d = Duration {
            value: 2.5,
            unit: "d".into(),
        };
        assert_eq!(d.to_days_rounded(), 3);
        let w = Duration {
            value: 0.5,
            unit: "w".into(),
        };
        assert_eq!(w.to_days_rounded(), 4); // 3.5 days
    }

    #[test]
    fn duration_unknown_unit_counts_as_days() {
        let d = Duration {
            value: 3.2,
            unit: String::new(),
        };
        assert_eq!(d.to_days_rounded(), 3);
    }

    #[test]
    fn allergies_deduplicate_case_insensitively() {
        let mut doc = Document::new();
        doc.add_allergy("Penicillin");
        doc.add_allergy("penicillin");
        doc.add_allergy("Sulfa");
        assert_eq!(doc.allergies, vec!["penicillin", "sulfa"]);
    }
}
