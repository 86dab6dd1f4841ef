//! Patient import: CSV bodies and the import result.
//!
//! The import endpoint takes a multipart upload with a `file` field and a
//! `type` field (`data` for CSV rows). Column headers are the Italian names
//! published by the template endpoint.

use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Columns the template marks as mandatory.
pub const REQUIRED_IMPORT_COLUMNS: [&str; 2] = ["nome", "specie"];

/// Header row written by [`PatientRow::to_csv`].
const CSV_HEADER: [&str; 13] = [
    "nome",
    "specie",
    "razza",
    "data_nascita",
    "microchip",
    "sesso",
    "peso",
    "proprietario",
    "email",
    "telefono",
    "vaccino",
    "data_vaccino",
    "scadenza_vaccino",
];

/// One patient (pet plus owner) to import.
///
/// Serializes to one CSV record in [`CSV_HEADER`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatientRow {
    /// Pet name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Species, one of the template's `speciesValues`.
    #[serde(rename = "specie")]
    pub species: String,
    /// Breed.
    #[serde(rename = "razza")]
    pub breed: Option<String>,
    /// Birth date, `GG/MM/AAAA` or `AAAA-MM-GG`.
    #[serde(rename = "data_nascita")]
    pub birth_date: Option<String>,
    /// Microchip code.
    pub microchip: Option<String>,
    /// `maschio` or `femmina`.
    #[serde(rename = "sesso")]
    pub sex: Option<String>,
    /// Weight in kg, as written.
    #[serde(rename = "peso")]
    pub weight: Option<String>,
    /// Owner full name.
    #[serde(rename = "proprietario")]
    pub owner_name: Option<String>,
    /// Owner email.
    #[serde(rename = "email")]
    pub owner_email: Option<String>,
    /// Owner phone.
    #[serde(rename = "telefono")]
    pub owner_phone: Option<String>,
    /// Vaccine name.
    #[serde(rename = "vaccino")]
    pub vaccine: Option<String>,
    /// Vaccination date.
    #[serde(rename = "data_vaccino")]
    pub vaccine_date: Option<String>,
    /// Vaccine expiry.
    #[serde(rename = "scadenza_vaccino")]
    pub vaccine_expiry: Option<String>,
}

impl PatientRow {
    /// A row with only the mandatory columns.
    #[must_use]
    pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            ..Self::default()
        }
    }

    /// Render rows as a CSV document with a header line.
    ///
    /// The header is written even when `rows` is empty.
    pub fn to_csv(rows: &[Self]) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| CoreError::Csv(std::io::Error::from(e.error().kind()).into()))
    }
}

/// Per-kind counters in an import result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportCounts {
    /// Owner accounts created.
    pub owners: u64,
    /// Pets created.
    pub pets: u64,
    /// Vaccination records created.
    pub vaccines: u64,
    /// Documents attached.
    pub documents: u64,
}

/// Body returned by `POST /import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportResult {
    /// Whether the import ran.
    pub success: bool,
    /// What was created.
    pub imported: ImportCounts,
    /// Rows that failed.
    pub errors: Vec<String>,
    /// Rows imported with caveats.
    pub warnings: Vec<String>,
}

/// Check the `GET /import` template body.
#[must_use]
pub fn template_problems(body: &Value) -> Vec<String> {
    let mut problems = Vec::new();
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        problems.push("success is not true".to_string());
    }
    match body.get("requiredColumns").and_then(Value::as_array) {
        Some(columns) => {
            for required in REQUIRED_IMPORT_COLUMNS {
                if !columns.iter().any(|c| c.as_str() == Some(required)) {
                    problems.push(format!("requiredColumns lacks {required}"));
                }
            }
        }
        None => problems.push("requiredColumns missing".to_string()),
    }
    if body.get("optionalColumns").and_then(Value::as_array).is_none() {
        problems.push("optionalColumns missing".to_string());
    }
    problems
}
