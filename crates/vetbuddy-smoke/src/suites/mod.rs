//! Check suites, one per API area.

mod appointments;
mod auth;
mod automations;
mod chat;
mod cleanup;
mod documents;
mod health;
mod import;
mod invoices;
mod payments;
mod pets;
mod public;
mod services;
mod staff;

pub use appointments::AppointmentsSuite;
pub use auth::AuthSuite;
pub use automations::AutomationsSuite;
pub use chat::ChatSuite;
pub use cleanup::CleanupSuite;
pub use documents::DocumentsSuite;
pub use health::HealthSuite;
pub use import::ImportSuite;
pub use invoices::InvoicesSuite;
pub use payments::PaymentsSuite;
pub use pets::PetsSuite;
pub use public::PublicSuite;
pub use services::ServicesSuite;
pub use staff::StaffSuite;

use serde_json::Value;
use vetbuddy_client::ApiResponse;

use crate::error::CheckError;
use crate::runner::{Check, Suite};

/// Suites selectable on the command line, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum SuiteKind {
    /// `GET /health`.
    Health,
    /// Registration, login and token checks.
    Auth,
    /// Appointment CRUD.
    Appointments,
    /// Documents and email delivery.
    Documents,
    /// Clinic staff.
    Staff,
    /// Pets and medical profiles.
    Pets,
    /// Invoicing, totals and exports.
    Invoices,
    /// Clinic price list.
    Services,
    /// Appointment checkout.
    Payments,
    /// Virtual assistant.
    Chat,
    /// Patient CSV import.
    Import,
    /// Automation settings and plan limits.
    Automations,
    /// Unauthenticated directory endpoints and demo logins.
    Public,
    /// Deletes records created by the run.
    Cleanup,
}

impl SuiteKind {
    /// Everything except cleanup.
    pub const DEFAULT: [Self; 13] = [
        Self::Health,
        Self::Auth,
        Self::Appointments,
        Self::Documents,
        Self::Staff,
        Self::Pets,
        Self::Invoices,
        Self::Services,
        Self::Payments,
        Self::Chat,
        Self::Import,
        Self::Automations,
        Self::Public,
    ];

    /// Instantiate the suite.
    #[must_use]
    pub fn build(self) -> Box<dyn Suite> {
        match self {
            Self::Health => Box::new(HealthSuite),
            Self::Auth => Box::new(AuthSuite),
            Self::Appointments => Box::new(AppointmentsSuite),
            Self::Documents => Box::new(DocumentsSuite),
            Self::Staff => Box::new(StaffSuite),
            Self::Pets => Box::new(PetsSuite),
            Self::Invoices => Box::new(InvoicesSuite),
            Self::Services => Box::new(ServicesSuite),
            Self::Payments => Box::new(PaymentsSuite),
            Self::Chat => Box::new(ChatSuite),
            Self::Import => Box::new(ImportSuite),
            Self::Automations => Box::new(AutomationsSuite),
            Self::Public => Box::new(PublicSuite),
            Self::Cleanup => Box::new(CleanupSuite),
        }
    }
}

/// Suites to run: the selection (or all defaults) in execution order, plus
/// cleanup last when requested.
#[must_use]
pub fn plan(selected: &[SuiteKind], cleanup: bool) -> Vec<SuiteKind> {
    let mut kinds: Vec<SuiteKind> = if selected.is_empty() {
        SuiteKind::DEFAULT.to_vec()
    } else {
        selected.to_vec()
    };
    if cleanup {
        kinds.push(SuiteKind::Cleanup);
    }
    kinds.sort();
    kinds.dedup();
    kinds
}

// Shared assertions.

pub(crate) fn expect_status(response: &ApiResponse, expected: u16) -> Check {
    if response.status_code() == expected {
        Ok(())
    } else {
        Err(CheckError::Failed(format!(
            "expected status {expected}, got {}: {}",
            response.status_code(),
            response.summary(200)
        )))
    }
}

pub(crate) fn expect_success(response: &ApiResponse) -> Check {
    if response.is_success() {
        Ok(())
    } else {
        Err(CheckError::Failed(format!(
            "status {}: {}",
            response.status_code(),
            response.summary(200)
        )))
    }
}

/// Error responses carry a string `error` field.
pub(crate) fn expect_error(response: &ApiResponse, expected: u16) -> Check {
    expect_status(response, expected)?;
    match response.error_message() {
        Some(_) => Ok(()),
        None => Err(CheckError::Failed(format!(
            "{expected} response has no error field: {}",
            response.summary(200)
        ))),
    }
}

pub(crate) fn id_of(record: &Value) -> Result<String, CheckError> {
    record
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CheckError::Failed(format!("record has no id: {record}")))
}

pub(crate) fn body(response: &ApiResponse) -> Result<&Value, CheckError> {
    response
        .json()
        .ok_or_else(|| CheckError::Failed(format!("body is not JSON: {}", response.summary(200))))
}

pub(crate) fn expect_field(record: &Value, key: &str, expected: &str) -> Check {
    match record.get(key).and_then(Value::as_str) {
        Some(actual) if actual == expected => Ok(()),
        other => Err(CheckError::Failed(format!(
            "{key}: expected {expected:?}, got {other:?}"
        ))),
    }
}

/// List endpoints answer a bare array; some wrap it under `key`.
pub(crate) fn items<'a>(
    response: &'a ApiResponse,
    key: &str,
) -> Result<&'a Vec<Value>, CheckError> {
    let value = body(response)?;
    value
        .as_array()
        .or_else(|| value.get(key).and_then(Value::as_array))
        .ok_or_else(|| {
            CheckError::Failed(format!(
                "expected an array of {key}: {}",
                response.summary(200)
            ))
        })
}

pub(crate) fn prerequisite(id: Option<&String>, what: &str) -> Result<String, CheckError> {
    id.cloned()
        .ok_or_else(|| CheckError::Skipped(format!("no {what} from an earlier check")))
}
