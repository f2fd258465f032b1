//! JSON rendering of a parsed document.
//!
//! Builds a serializable view of the tree (fixed key order, abbreviation
//! codes expanded to readable phrases) and pretty-prints it. Emission is a
//! pure function of the document: the same document always yields the same
//! text.

use serde::ser::Serializer;
use serde::Serialize;

use crate::ast::{Document, Duration, Medication, Patient};
use crate::tables;

/// Render the document as deterministic JSON text. Total: a document built
/// from arbitrarily broken input still renders completely, with null for
/// everything that never got a value.
pub fn to_json(document: &Document) -> String {
    let view = DocumentView::from(document);
    serde_json::to_string_pretty(&view).expect("document view always serializes")
}

/// Serializable mirror of [`Document`]. Field order here is the emitted key
/// order.
#[derive(Serialize)]
struct DocumentView {
    patient: PatientView,
    allergies: Vec<String>,
    medications: Vec<MedicationView>,
    notes: Vec<String>,
}

#[derive(Serialize)]
struct PatientView {
    name: Option<String>,
    age: Option<i64>,
    #[serde(rename = "weightKg", serialize_with = "integral_trimmed")]
    weight_kg: Option<f64>,
}

#[derive(Serialize)]
struct MedicationView {
    form: String,
    #[serde(rename = "shortName")]
    short_name: String,
    name: String,
    dose: String,
    amount: Option<String>,
    route: Option<String>,
    frequency: String,
    duration: String,
    food: Option<String>,
}

impl From<&Document> for DocumentView {
    fn from(document: &Document) -> Self {
        Self {
            patient: PatientView::from(&document.patient),
            allergies: document.allergies.clone(),
            medications: document.medications.iter().map(MedicationView::from).collect(),
            notes: document.notes.clone(),
        }
    }
}

impl From<&Patient> for PatientView {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            age: patient.age,
            weight_kg: patient.weight_kg,
        }
    }
}

impl From<&Medication> for MedicationView {
    fn from(medication: &Medication) -> Self {
        Self {
            form: medication.form.clone(),
            short_name: medication.name.clone(),
            name: tables::generic_name(&medication.name),
            dose: medication.dose.strength.clone(),
            amount: medication.dose.amount.clone(),
            route: medication.route.clone(),
            frequency: tables::expand_frequency(&medication.frequency),
            duration: format_duration(&medication.duration),
            food: medication.food_modifier.as_deref().map(tables::expand_food),
        }
    }
}

fn format_duration(duration: &Duration) -> String {
    let unit = match duration.unit.as_str() {
        "d" => "days",
        "w" => "weeks",
        _ => "months",
    };
    format!("{} {}", trim_number(duration.value), unit)
}

/// Integral values lose their fractional part ("5", not "5.0"); everything
/// else renders as plain decimal text.
fn trim_number(value: f64) -> String {
    if is_integral(value) {
        format!("{}", value.round() as i64)
    } else {
        format!("{value}")
    }
}

fn is_integral(value: f64) -> bool {
    (value - value.round()).abs() < 1e-9
}

/// Weight serializer: integral weights emit as JSON integers so no ".0"
/// appears in the output.
fn integral_trimmed<S>(weight: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match weight {
        None => serializer.serialize_none(),
        Some(value) if is_integral(*value) => serializer.serialize_i64(value.round() as i64),
        Some(value) => serializer.serialize_f64(*value),
    }
}
