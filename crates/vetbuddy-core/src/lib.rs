//! Core types for the VetBuddy smoke harness.
//!
//! This crate holds the request payloads and the response rules the harness
//! asserts on. Nothing here performs I/O:
//!
//! - **Accounts**: `Role`, `Credentials`
//! - **Invoicing**: `InvoiceItem`, `InvoiceTotals`, `InvoiceNumber`, cents arithmetic
//! - **Automations**: `AutomationPlan` and the known automation keys
//! - **Payments**: `CheckoutSession`, `PaymentStatus`
//! - **Chat**: `ChatMessage`, `ChatRequest`, `ChatReply`
//! - **Import**: `PatientRow`, CSV body building, `ImportResult`
//! - **Pets**: `PetProfileUpdate` and its medical record entries
//!
//! # Money
//!
//! The API speaks euros as JSON floats. Comparisons are done in integer
//! cents (`i64`) so that `0.1 + 0.2` style drift never fails a check.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod automation;
pub mod chat;
pub mod error;
pub mod import;
pub mod invoice;
pub mod payment;
pub mod pet;

pub use account::{Credentials, Role};
pub use automation::{
    is_known_key, settings_response_problems, AutomationPlan, ALL_AUTOMATION_KEYS,
    PRO_EXTRA_AUTOMATIONS, STARTER_AUTOMATIONS,
};
pub use chat::{ChatMessage, ChatReply, ChatRequest, ChatRole, MIN_REPLY_CHARS, PRICING_TERMS};
pub use error::{CoreError, Result};
pub use import::{
    template_problems, ImportCounts, ImportResult, PatientRow, REQUIRED_IMPORT_COLUMNS,
};
pub use invoice::{
    cents_display, euros_to_cents, expected_totals, ExpectedTotals, InvoiceItem, InvoiceNumber,
    InvoiceStatus, InvoiceTotals, BOLLO_CENTS, BOLLO_THRESHOLD_CENTS, VAT_PERCENT,
};
pub use payment::{
    CheckoutRequest, CheckoutSession, PaymentStatus, STRIPE_CHECKOUT_PREFIX, STRIPE_SESSION_PREFIX,
};
pub use pet::{MedicalEntry, Medication, PetProfileUpdate, WeightEntry};
