//! Pet profile payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A medication the pet is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Drug name.
    pub name: String,
    /// Dose, e.g. `25mg`.
    pub dosage: String,
    /// How often.
    pub frequency: String,
    /// First day.
    pub start_date: String,
    /// Last day, if the course ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// A visit in the pet's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalEntry {
    /// Visit date.
    pub date: String,
    /// What happened.
    pub description: String,
    /// Attending vet.
    pub veterinarian: String,
    /// Diagnosis, when one was made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
}

/// One weigh-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Kilograms.
    pub weight: f64,
    /// Date of the weigh-in.
    pub date: String,
}

/// Body of `PUT /pets/{id}` covering the extended health profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetProfileUpdate {
    /// Pet name.
    pub name: String,
    /// Species.
    pub species: String,
    /// Breed.
    pub breed: String,
    /// Birth date.
    pub birth_date: String,
    /// Current weight in kg.
    pub weight: f64,
    /// Free notes.
    pub notes: String,
    /// Whether the pet is insured.
    pub insurance: bool,
    /// Insurer.
    pub insurance_company: String,
    /// Policy number.
    pub insurance_policy: String,
    /// Long-term diseases.
    pub chronic_diseases: Vec<String>,
    /// Conditions under treatment.
    pub current_conditions: Vec<String>,
    /// Known allergies.
    pub allergies: Vec<String>,
    /// Ongoing and past medications.
    pub medications: Vec<Medication>,
    /// Visit history.
    pub medical_history: Vec<MedicalEntry>,
    /// Weigh-ins, oldest first.
    pub weight_history: Vec<WeightEntry>,
}

impl PetProfileUpdate {
    /// Compare a pet returned by the API against this update.
    ///
    /// Scalar insurance fields must match exactly; collections must have the
    /// same length; every weight entry must carry `weight` and `date`.
    #[must_use]
    pub fn mismatches(&self, pet: &Value) -> Vec<String> {
        let mut out = Vec::new();

        if pet.get("insurance").and_then(Value::as_bool) != Some(self.insurance) {
            out.push(format!("insurance: {}", field(pet, "insurance")));
        }
        for (key, expected) in [
            ("insuranceCompany", &self.insurance_company),
            ("insurancePolicy", &self.insurance_policy),
        ] {
            if pet.get(key).and_then(Value::as_str) != Some(expected.as_str()) {
                out.push(format!("{key}: {}", field(pet, key)));
            }
        }

        for (key, expected) in [
            ("chronicDiseases", self.chronic_diseases.len()),
            ("currentConditions", self.current_conditions.len()),
            ("allergies", self.allergies.len()),
            ("medications", self.medications.len()),
            ("medicalHistory", self.medical_history.len()),
            ("weightHistory", self.weight_history.len()),
        ] {
            let got = pet.get(key).and_then(Value::as_array).map(Vec::len);
            if got != Some(expected) {
                out.push(format!("{key}: expected {expected} items, got {got:?}"));
            }
        }

        if let Some(weights) = pet.get("weightHistory").and_then(Value::as_array) {
            if weights
                .iter()
                .any(|w| w.get("weight").is_none() || w.get("date").is_none())
            {
                out.push("weightHistory entries lack weight or date".to_string());
            }
        }

        out
    }
}

fn field(pet: &Value, key: &str) -> String {
    pet.get(key)
        .map_or_else(|| "missing".to_string(), Value::to_string)
}
