//! Appointment payment payloads.

use serde::{Deserialize, Serialize};

/// Prefix every hosted Stripe checkout page URL starts with.
pub const STRIPE_CHECKOUT_PREFIX: &str = "https://checkout.stripe.com/";

/// Prefix of Stripe checkout session ids.
pub const STRIPE_SESSION_PREFIX: &str = "cs_";

/// Body of `POST /payments/appointment`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Appointment to pay for. Omitted to exercise validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    /// Origin the checkout page redirects back to.
    pub origin_url: String,
}

/// Checkout session returned for an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Hosted checkout page.
    pub url: String,
    /// Stripe session id.
    pub session_id: String,
    /// Amount in euros.
    pub amount: f64,
    /// Line description shown to the owner.
    pub description: String,
}

impl CheckoutSession {
    /// Reasons this session does not look like a real Stripe checkout.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.url.starts_with(STRIPE_CHECKOUT_PREFIX) {
            problems.push(format!("invalid Stripe checkout URL: {}", self.url));
        }
        if !self.session_id.starts_with(STRIPE_SESSION_PREFIX) {
            problems.push(format!("invalid Stripe session id: {}", self.session_id));
        }
        if self.amount.is_nan() || self.amount <= 0.0 {
            problems.push(format!("invalid amount: {}", self.amount));
        }
        problems
    }
}

/// Body of `GET /payments/appointment?appointmentId=…`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    /// Appointment the status belongs to.
    pub appointment_id: String,
    /// `pending`, `paid`, …
    pub payment_status: String,
    /// When it was paid, if it was.
    #[serde(default)]
    pub paid_at: Option<String>,
    /// Amount paid in euros.
    #[serde(default)]
    pub paid_amount: Option<f64>,
}
