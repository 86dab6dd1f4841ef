//! Error types for vetbuddy-core.

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while interpreting API payloads.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Invoice number is not in `YYYY/NNN` form.
    #[error("invalid invoice number: {0}")]
    InvalidInvoiceNumber(String),

    /// Subscription plan name the harness does not know.
    #[error("unknown subscription plan: {0}")]
    UnknownPlan(String),

    /// Role string that is not one of clinic, owner, staff, admin.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Amount that cannot be represented in cents.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// CSV body could not be written.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
