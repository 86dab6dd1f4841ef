//! Invoice payloads and the Italian invoicing rules the API must honour.
//!
//! Clinics bill with 22% IVA on the taxable subtotal and a €2.00 marca da
//! bollo once the subtotal exceeds €77.47. Draft invoices carry no number;
//! issuing assigns a `YYYY/NNN` number in the current year.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// IVA rate applied to invoice subtotals, in percent.
pub const VAT_PERCENT: i64 = 22;

/// Stamp duty charged above [`BOLLO_THRESHOLD_CENTS`].
pub const BOLLO_CENTS: i64 = 200;

/// Subtotal above which stamp duty applies (strictly greater).
pub const BOLLO_THRESHOLD_CENTS: i64 = 7747;

/// Largest euro amount accepted by [`euros_to_cents`].
const MAX_EUROS: f64 = 1.0e12;

/// Convert a JSON euro amount to integer cents, rounding half away from zero.
///
/// # Errors
///
/// Returns [`CoreError::InvalidAmount`] for NaN, infinities or absurd magnitudes.
#[allow(clippy::cast_possible_truncation)]
pub fn euros_to_cents(euros: f64) -> Result<i64> {
    if !euros.is_finite() || euros.abs() > MAX_EUROS {
        return Err(CoreError::InvalidAmount(euros.to_string()));
    }
    Ok((euros * 100.0).round() as i64)
}

/// Lifecycle state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Editable, unnumbered.
    Draft,
    /// Numbered and final.
    Issued,
    /// Emailed to the customer.
    Sent,
    /// Settled.
    Paid,
    /// Voided.
    Cancelled,
}

impl InvoiceStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Issued => "issued",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One billed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    /// Line description.
    pub description: String,
    /// Units billed.
    pub quantity: u32,
    /// Price per unit in euros.
    pub unit_price: f64,
}

impl InvoiceItem {
    /// Create a line item.
    #[must_use]
    pub fn new(description: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// Line amount in cents.
    ///
    /// # Errors
    ///
    /// Returns an error when the unit price is not a usable amount.
    pub fn line_cents(&self) -> Result<i64> {
        Ok(euros_to_cents(self.unit_price)? * i64::from(self.quantity))
    }
}

/// Totals the harness expects for a set of items, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedTotals {
    /// Sum of line amounts.
    pub subtotal_cents: i64,
    /// IVA on the subtotal.
    pub vat_cents: i64,
    /// Stamp duty.
    pub bollo_cents: i64,
    /// Grand total.
    pub total_cents: i64,
}

/// IVA for a subtotal, rounded half up.
#[must_use]
pub fn vat_for(subtotal_cents: i64) -> i64 {
    (subtotal_cents * VAT_PERCENT + 50).div_euclid(100)
}

/// Stamp duty owed for a subtotal.
#[must_use]
pub fn bollo_for(subtotal_cents: i64) -> i64 {
    if subtotal_cents > BOLLO_THRESHOLD_CENTS {
        BOLLO_CENTS
    } else {
        0
    }
}

/// Compute the totals the API should report for `items`.
///
/// # Errors
///
/// Returns an error when any unit price is unusable.
pub fn expected_totals(items: &[InvoiceItem]) -> Result<ExpectedTotals> {
    let mut subtotal_cents = 0;
    for item in items {
        subtotal_cents += item.line_cents()?;
    }
    let vat_cents = vat_for(subtotal_cents);
    let bollo_cents = bollo_for(subtotal_cents);
    Ok(ExpectedTotals {
        subtotal_cents,
        vat_cents,
        bollo_cents,
        total_cents: subtotal_cents + vat_cents + bollo_cents,
    })
}

/// `totals` object returned with every invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceTotals {
    /// Taxable subtotal in euros.
    pub subtotal: f64,
    /// IVA rate in percent.
    pub vat_rate: f64,
    /// IVA amount in euros.
    pub vat_amount: f64,
    /// Stamp duty in euros.
    pub bollo_amount: f64,
    /// Grand total in euros.
    pub total: f64,
}

impl InvoiceTotals {
    /// Cross-check the reported figures against each other.
    ///
    /// Returns a description of every rule that does not hold, allowing one
    /// cent of rounding slack. An empty vector means the totals are consistent.
    ///
    /// # Errors
    ///
    /// Returns an error when a figure is not a usable amount.
    pub fn discrepancies(&self) -> Result<Vec<String>> {
        let subtotal = euros_to_cents(self.subtotal)?;
        let vat = euros_to_cents(self.vat_amount)?;
        let bollo = euros_to_cents(self.bollo_amount)?;
        let total = euros_to_cents(self.total)?;

        let mut problems = Vec::new();

        let expected_vat = vat_for(subtotal);
        if (vat - expected_vat).abs() > 1 {
            problems.push(format!(
                "vatAmount {} is not {VAT_PERCENT}% of subtotal {} (expected {})",
                cents_display(vat),
                cents_display(subtotal),
                cents_display(expected_vat)
            ));
        }

        let expected_bollo = bollo_for(subtotal);
        if bollo != expected_bollo {
            problems.push(format!(
                "bolloAmount {} wrong for subtotal {} (expected {})",
                cents_display(bollo),
                cents_display(subtotal),
                cents_display(expected_bollo)
            ));
        }

        let expected_total = subtotal + vat + bollo;
        if (total - expected_total).abs() > 1 {
            problems.push(format!(
                "total {} is not subtotal + vat + bollo ({})",
                cents_display(total),
                cents_display(expected_total)
            ));
        }

        Ok(problems)
    }

    /// Subtotal in cents.
    ///
    /// # Errors
    ///
    /// Returns an error when the subtotal is not a usable amount.
    pub fn subtotal_cents(&self) -> Result<i64> {
        euros_to_cents(self.subtotal)
    }
}

/// Render cents as `€12.34`.
#[must_use]
pub fn cents_display(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}€{}.{:02}", abs / 100, abs % 100)
}

/// Progressive invoice number, `YYYY/NNN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InvoiceNumber {
    /// Fiscal year.
    pub year: i32,
    /// Sequence within the year.
    pub sequence: u32,
}

impl InvoiceNumber {
    /// Whether this number belongs to `year`.
    #[must_use]
    pub const fn is_for_year(&self, year: i32) -> bool {
        self.year == year
    }
}

impl FromStr for InvoiceNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidInvoiceNumber(s.to_string());
        let (year, sequence) = s.split_once('/').ok_or_else(invalid)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || !digits(year) || !digits(sequence) {
            return Err(invalid());
        }
        Ok(Self {
            year: year.parse().map_err(|_| invalid())?,
            sequence: sequence.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:03}", self.year, self.sequence)
    }
}
