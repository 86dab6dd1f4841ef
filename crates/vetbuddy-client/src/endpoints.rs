//! One method per VetBuddy endpoint the harness exercises.

use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use vetbuddy_core::{ChatRequest, CheckoutRequest, Credentials, InvoiceStatus, PetProfileUpdate};

use crate::client::VetBuddyClient;
use crate::error::ClientError;
use crate::response::ApiResponse;
use crate::types::{
    AuthResponse, AutomationToggle, ClinicSearch, DocumentEmailRequest, ExportFormat,
    InviteClinicRequest, InvoiceStatusUpdate, NewAppointment, NewDocument, NewInvoice, NewPet,
    NewService, NewStaff, RegisterRequest, Session,
};

type ApiResult = Result<ApiResponse, ClientError>;

impl VetBuddyClient {
    // ---------------------------------------------------------------- health

    /// `GET /health`.
    pub async fn health(&self) -> ApiResult {
        self.get("health").await
    }

    // ------------------------------------------------------------------ auth

    /// `POST /auth/register`.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult {
        self.post_json("auth/register", request).await
    }

    /// `POST /auth/login`.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult {
        self.post_json("auth/login", credentials).await
    }

    /// `POST /auth/login` with an arbitrary body, for validation checks.
    pub async fn login_raw(&self, body: &Value) -> ApiResult {
        self.post_json("auth/login", body).await
    }

    /// Log in and require a token.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let response = self.login(credentials).await?;
        response.expect_success()?;
        let auth: AuthResponse = response.decode()?;
        tracing::info!(email = %credentials.email, "Signed in");
        Ok(auth.into())
    }

    /// `GET /auth/me`.
    pub async fn me(&self) -> ApiResult {
        self.get("auth/me").await
    }

    // ---------------------------------------------------------- appointments

    /// `POST /appointments`.
    pub async fn create_appointment(&self, appointment: &NewAppointment) -> ApiResult {
        self.post_json("appointments", appointment).await
    }

    /// `GET /appointments`.
    pub async fn list_appointments(&self) -> ApiResult {
        self.get("appointments").await
    }

    /// `PUT /appointments/{id}` merging the given fields.
    pub async fn update_appointment(&self, id: &str, changes: &Value) -> ApiResult {
        self.put_json(&format!("appointments/{id}"), changes).await
    }

    /// `DELETE /appointments/{id}`.
    pub async fn delete_appointment(&self, id: &str) -> ApiResult {
        self.delete(&format!("appointments/{id}")).await
    }

    // ------------------------------------------------------------- documents

    /// `POST /documents`.
    pub async fn create_document(&self, document: &NewDocument) -> ApiResult {
        self.post_json("documents", document).await
    }

    /// `GET /documents`.
    pub async fn list_documents(&self) -> ApiResult {
        self.get("documents").await
    }

    /// `POST /documents/send-email`.
    pub async fn send_document_email(&self, request: &DocumentEmailRequest) -> ApiResult {
        self.post_json("documents/send-email", request).await
    }

    /// `DELETE /documents/{id}`.
    pub async fn delete_document(&self, id: &str) -> ApiResult {
        self.delete(&format!("documents/{id}")).await
    }

    // ----------------------------------------------------------------- staff

    /// `POST /staff`.
    pub async fn create_staff(&self, staff: &NewStaff) -> ApiResult {
        self.post_json("staff", staff).await
    }

    /// `GET /staff`.
    pub async fn list_staff(&self) -> ApiResult {
        self.get("staff").await
    }

    /// `DELETE /staff/{id}`.
    pub async fn delete_staff(&self, id: &str) -> ApiResult {
        self.delete(&format!("staff/{id}")).await
    }

    // ------------------------------------------------------------------ pets

    /// `POST /pets`.
    pub async fn create_pet(&self, pet: &NewPet) -> ApiResult {
        self.post_json("pets", pet).await
    }

    /// `GET /pets`.
    pub async fn list_pets(&self) -> ApiResult {
        self.get("pets").await
    }

    /// `PUT /pets/{id}`.
    pub async fn update_pet(&self, id: &str, update: &PetProfileUpdate) -> ApiResult {
        self.put_json(&format!("pets/{id}"), update).await
    }

    /// `DELETE /pets/{id}`.
    pub async fn delete_pet(&self, id: &str) -> ApiResult {
        self.delete(&format!("pets/{id}")).await
    }

    // -------------------------------------------------------------- invoices

    /// `GET /invoices`, optionally filtered by status.
    pub async fn list_invoices(&self, status: Option<InvoiceStatus>) -> ApiResult {
        match status {
            Some(status) => self.get_query("invoices", &[("status", status.as_str())]).await,
            None => self.get("invoices").await,
        }
    }

    /// `POST /invoices`.
    pub async fn create_invoice(&self, invoice: &NewInvoice) -> ApiResult {
        self.post_json("invoices", invoice).await
    }

    /// `PUT /invoices` changing the status.
    pub async fn set_invoice_status(&self, id: &str, status: InvoiceStatus) -> ApiResult {
        let update = InvoiceStatusUpdate {
            id: id.to_string(),
            status,
        };
        self.put_json("invoices", &update).await
    }

    /// `GET /invoices/export`, for all invoices or a single one.
    pub async fn export_invoices(&self, format: ExportFormat, id: Option<&str>) -> ApiResult {
        let format = match format {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        };
        let mut query = vec![("format", format)];
        if let Some(id) = id {
            query.push(("id", id));
        }
        self.get_query("invoices/export", &query).await
    }

    // -------------------------------------------------------------- services

    /// `GET /services`.
    pub async fn list_services(&self) -> ApiResult {
        self.get("services").await
    }

    /// `GET /services/flat`.
    pub async fn list_services_flat(&self) -> ApiResult {
        self.get("services/flat").await
    }

    /// `POST /services`.
    pub async fn create_service(&self, service: &NewService) -> ApiResult {
        self.post_json("services", service).await
    }

    // -------------------------------------------------------------- payments

    /// `POST /payments/appointment`.
    pub async fn create_appointment_checkout(&self, request: &CheckoutRequest) -> ApiResult {
        self.post_json("payments/appointment", request).await
    }

    /// `GET /payments/appointment`, with or without the id.
    pub async fn appointment_payment_status(&self, appointment_id: Option<&str>) -> ApiResult {
        match appointment_id {
            Some(id) => self.get_query("payments/appointment", &[("appointmentId", id)]).await,
            None => self.get("payments/appointment").await,
        }
    }

    // ------------------------------------------------------------------ chat

    /// `POST /chat`.
    pub async fn chat(&self, request: &ChatRequest) -> ApiResult {
        self.post_json("chat", request).await
    }

    /// `POST /chat` with an arbitrary body, for validation checks.
    pub async fn chat_raw(&self, body: &Value) -> ApiResult {
        self.post_json("chat", body).await
    }

    // ---------------------------------------------------------------- import

    /// `GET /import` template description.
    pub async fn import_template(&self) -> ApiResult {
        self.get("import").await
    }

    /// `POST /import` uploading a CSV document.
    pub async fn import_csv(&self, file_name: &str, csv: Vec<u8>) -> ApiResult {
        let part = Part::bytes(csv)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part).text("type", "data");
        self.post_multipart("import", form).await
    }

    // ----------------------------------------------------------- automations

    /// `GET /automations/settings`.
    pub async fn automation_settings(&self) -> ApiResult {
        self.get("automations/settings").await
    }

    /// `POST /automations/settings` toggling one key.
    pub async fn toggle_automation(&self, key: &str, enabled: bool) -> ApiResult {
        let toggle = AutomationToggle {
            key: key.to_string(),
            enabled,
        };
        self.post_json("automations/settings", &toggle).await
    }

    /// `PUT /automations/settings` replacing the whole map.
    pub async fn replace_automation_settings(&self, settings: &Value) -> ApiResult {
        self.put_json("automations/settings", &json!({ "settings": settings })).await
    }

    // ------------------------------------------------------------- directory

    /// `GET /clinics/search`.
    pub async fn search_clinics(&self, filters: &ClinicSearch) -> ApiResult {
        self.get_query("clinics/search", filters).await
    }

    /// `POST /invite-clinic`.
    pub async fn invite_clinic(&self, request: &InviteClinicRequest) -> ApiResult {
        self.post_json("invite-clinic", request).await
    }
}
