//! Request and response types for the VetBuddy client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vetbuddy_core::{InvoiceItem, InvoiceStatus, Role};

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: Role,
    /// Clinic name, for clinic accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
    /// Phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Body of a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer token.
    pub token: String,
    /// User record without the password.
    pub user: Value,
}

/// A signed-in account.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token.
    pub token: String,
    /// User id.
    pub user_id: Option<String>,
    /// Role reported by the server.
    pub role: Option<Role>,
    /// Full user record.
    pub user: Value,
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        let user_id = auth.user.get("id").and_then(Value::as_str).map(str::to_string);
        let role = auth
            .user
            .get("role")
            .and_then(Value::as_str)
            .and_then(|r| r.parse().ok());
        Self {
            token: auth.token,
            user_id,
            role,
            user: auth.user,
        }
    }
}

/// Body of `POST /appointments`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    /// Pet name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    /// Pet id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<String>,
    /// Owner name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    /// Owner id, when booked by a clinic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Clinic id, when booked by an owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_id: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub time: String,
    /// Reason for the visit.
    pub reason: String,
    /// Notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Price in euros.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Body of `POST /documents`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    /// Title.
    pub name: String,
    /// Kind, e.g. `vaccination`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Content.
    pub content: String,
    /// Pet the document belongs to.
    pub pet_name: String,
}

/// Body of `POST /documents/send-email`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEmailRequest {
    /// Document to send.
    pub document_id: String,
    /// Recipient.
    pub recipient_email: String,
}

/// Body of `POST /staff`.
#[derive(Debug, Clone, Serialize)]
pub struct NewStaff {
    /// Full name.
    pub name: String,
    /// `vet`, `nurse`, `receptionist`, …
    pub role: String,
    /// Email.
    pub email: String,
    /// Phone.
    pub phone: String,
}

/// Body of `POST /pets`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    /// Name.
    pub name: String,
    /// Species.
    pub species: String,
    /// Breed.
    pub breed: String,
    /// `YYYY-MM-DD`.
    pub birth_date: String,
    /// Weight as entered.
    pub weight: String,
    /// Notes.
    pub notes: String,
}

/// Body of `POST /invoices`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: String,
    /// Customer phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    /// Customer address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    /// Codice fiscale.
    #[serde(rename = "customerCF", skip_serializing_if = "Option::is_none")]
    pub customer_cf: Option<String>,
    /// Pet name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    /// Billed lines.
    pub items: Vec<InvoiceItem>,
    /// Notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Create as draft (unnumbered) or issue immediately.
    pub is_draft: bool,
}

/// Body of `PUT /invoices`.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceStatusUpdate {
    /// Invoice id.
    pub id: String,
    /// New status.
    pub status: InvoiceStatus,
}

/// Export formats of `GET /invoices/export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Spreadsheet export.
    Csv,
    /// Structured export with summary.
    Json,
    /// Printable single invoice.
    Html,
}

/// Body of `POST /services`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category id.
    pub category: String,
    /// Price in euros.
    pub price: f64,
    /// Minutes.
    pub duration: u32,
    /// Whether the price includes IVA.
    pub vat_included: bool,
}

/// Body of `POST /invite-clinic`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteClinicRequest {
    /// Invited clinic.
    pub clinic_name: String,
    /// Invited clinic email.
    pub clinic_email: String,
    /// Personal message.
    pub message: String,
    /// Who invites.
    pub inviter_name: String,
    /// Inviter email.
    pub inviter_email: String,
}

/// Filters of `GET /clinics/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClinicSearch {
    /// City name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Service id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

/// Body of `POST /automations/settings`.
#[derive(Debug, Clone, Serialize)]
pub struct AutomationToggle {
    /// Automation key.
    pub key: String,
    /// New state.
    pub enabled: bool,
}
