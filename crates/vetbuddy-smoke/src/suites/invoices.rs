use async_trait::async_trait;
use serde_json::Value;
use vetbuddy_client::{ApiResponse, ExportFormat, NewInvoice, VetBuddyClient};
use vetbuddy_core::{
    cents_display, euros_to_cents, expected_totals, InvoiceNumber, InvoiceStatus, InvoiceTotals,
};

use super::{body, expect_field, expect_status, expect_success, id_of, prerequisite};
use crate::error::CheckError;
use crate::fixtures;
use crate::runner::{Account, Check, CheckResult, Context, Recorder, Suite};
use crate::{ensure, fail};

/// Electronic invoicing: totals, numbering, status changes and exports.
pub struct InvoicesSuite;

#[async_trait]
impl Suite for InvoicesSuite {
    fn name(&self) -> &'static str {
        "invoices"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("list invoices", list(ctx)).await;
        rec.check("filter invoices by status", filter_by_status(ctx)).await;
        rec.check("create draft invoice", create_draft(ctx)).await;
        rec.check("issue invoice", issue(ctx)).await;
        rec.check("mark invoice paid", mark_paid(ctx)).await;
        rec.check("stamp duty on high amount", stamp_duty(ctx)).await;
        rec.check("vat calculation", vat_calculation(ctx)).await;
        rec.check("export csv", export_csv(ctx)).await;
        rec.check("export json", export_json(ctx)).await;
        rec.check("export html", export_html(ctx)).await;
        rec.finish()
    }
}

async fn list(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Clinic).await?;
    let response = client.list_invoices(None).await?;
    expect_success(&response)?;
    let body = body(&response)?;
    ensure!(
        body.get("invoices").is_some_and(Value::is_array),
        "response has no invoices array: {}",
        response.summary(200)
    );
    Ok(())
}

async fn filter_by_status(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Clinic).await?;
    for status in [InvoiceStatus::Draft, InvoiceStatus::Paid] {
        let response = client.list_invoices(Some(status)).await?;
        expect_status(&response, 200)?;
    }
    Ok(())
}

/// Create `invoice` and check its totals against the items sent.
async fn create_checked(
    client: &VetBuddyClient,
    invoice: &NewInvoice,
) -> Result<Value, CheckError> {
    let response = client.create_invoice(invoice).await?;
    expect_success(&response)?;
    let record = body(&response)?.clone();
    id_of(&record)?;
    check_totals(&record, invoice)?;
    Ok(record)
}

fn totals_of(record: &Value) -> Result<InvoiceTotals, CheckError> {
    let Some(totals) = record.get("totals") else {
        fail!("invoice has no totals: {record}");
    };
    serde_json::from_value(totals.clone())
        .map_err(|e| CheckError::Failed(format!("unreadable totals: {e}")))
}

fn check_totals(record: &Value, invoice: &NewInvoice) -> Check {
    let totals = totals_of(record)?;
    let problems = totals.discrepancies()?;
    ensure!(problems.is_empty(), "inconsistent totals: {}", problems.join("; "));

    let expected = expected_totals(&invoice.items)?;
    let subtotal = totals.subtotal_cents()?;
    ensure!(
        (subtotal - expected.subtotal_cents).abs() <= 1,
        "subtotal {} does not match the items ({})",
        cents_display(subtotal),
        cents_display(expected.subtotal_cents)
    );
    Ok(())
}

async fn create_draft(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Clinic).await?;
    let record = create_checked(&client, &fixtures::draft_invoice()).await?;
    expect_field(&record, "status", InvoiceStatus::Draft.as_str())?;
    ensure!(
        record.get("invoiceNumber").map_or(true, Value::is_null),
        "draft already has a number: {}",
        record["invoiceNumber"]
    );
    ctx.fixtures.invoice_id = Some(id_of(&record)?);
    Ok(())
}

async fn issue(ctx: &mut Context) -> Check {
    let id = prerequisite(ctx.fixtures.invoice_id.as_ref(), "draft invoice")?;
    let client = ctx.client_as(Account::Clinic).await?;
    let response = client.set_invoice_status(&id, InvoiceStatus::Issued).await?;
    expect_success(&response)?;
    let record = body(&response)?;
    expect_field(record, "status", InvoiceStatus::Issued.as_str())?;

    let Some(raw) = record.get("invoiceNumber").and_then(Value::as_str) else {
        fail!("issued invoice has no number");
    };
    let number: InvoiceNumber = raw.parse()?;
    let year = chrono::Datelike::year(&chrono::Utc::now());
    if !number.is_for_year(year) {
        tracing::warn!(invoice_number = %number, year, "Invoice number is not for the current year");
    }
    if record.get("issueDate").map_or(true, Value::is_null) {
        tracing::warn!(%id, "Issued invoice has no issueDate");
    }
    Ok(())
}

async fn mark_paid(ctx: &mut Context) -> Check {
    let id = prerequisite(ctx.fixtures.invoice_id.as_ref(), "issued invoice")?;
    let client = ctx.client_as(Account::Clinic).await?;
    let response = client.set_invoice_status(&id, InvoiceStatus::Paid).await?;
    expect_success(&response)?;
    let record = body(&response)?;
    expect_field(record, "status", InvoiceStatus::Paid.as_str())?;
    if record.get("paidDate").map_or(true, Value::is_null) {
        tracing::warn!(%id, "Paid invoice has no paidDate");
    }
    Ok(())
}

async fn stamp_duty(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Clinic).await?;
    let invoice = fixtures::high_amount_invoice();
    let record = create_checked(&client, &invoice).await?;
    let bollo = euros_to_cents(totals_of(&record)?.bollo_amount)?;
    ensure!(
        bollo == vetbuddy_core::BOLLO_CENTS,
        "stamp duty not applied: bolloAmount {}",
        cents_display(bollo)
    );
    expect_field(&record, "status", InvoiceStatus::Issued.as_str())
}

async fn vat_calculation(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Clinic).await?;
    let invoice = fixtures::vat_invoice();
    let record = create_checked(&client, &invoice).await?;
    let totals = totals_of(&record)?;
    let expected = expected_totals(&invoice.items)?;
    let vat = euros_to_cents(totals.vat_amount)?;
    let total = euros_to_cents(totals.total)?;
    ensure!(
        (vat - expected.vat_cents).abs() <= 1,
        "vatAmount {} expected {}",
        cents_display(vat),
        cents_display(expected.vat_cents)
    );
    ensure!(
        (total - expected.total_cents).abs() <= 1,
        "total {} expected {}",
        cents_display(total),
        cents_display(expected.total_cents)
    );
    ensure!(
        (totals.vat_rate - 22.0).abs() < f64::EPSILON,
        "vatRate is {}",
        totals.vat_rate
    );
    Ok(())
}

fn warn_on_content_type(response: &ApiResponse, expected: &str) {
    let content_type = response.content_type().unwrap_or_default();
    if !content_type.contains(expected) {
        tracing::warn!(content_type, expected, "Unexpected export content type");
    }
}

async fn export_csv(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Clinic).await?;
    let response = client.export_invoices(ExportFormat::Csv, None).await?;
    expect_status(&response, 200)?;
    warn_on_content_type(&response, "text/csv");
    let disposition = response.header("content-disposition").unwrap_or_default();
    ensure!(
        disposition.contains("attachment") && disposition.contains("fatture_"),
        "unexpected Content-Disposition: {disposition:?}"
    );
    Ok(())
}

async fn export_json(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Clinic).await?;
    let response = client.export_invoices(ExportFormat::Json, None).await?;
    expect_status(&response, 200)?;
    let body = body(&response)?;
    ensure!(
        body.get("fatture").is_some_and(Value::is_array),
        "export has no fatture array"
    );
    for key in ["export_date", "totale_fatture", "totale_importo"] {
        ensure!(body.get(key).is_some(), "export lacks {key}");
    }
    Ok(())
}

async fn export_html(ctx: &mut Context) -> Check {
    let id = prerequisite(ctx.fixtures.invoice_id.as_ref(), "issued invoice")?;
    let client = ctx.client_as(Account::Clinic).await?;
    let response = client.export_invoices(ExportFormat::Html, Some(&id)).await?;
    expect_status(&response, 200)?;
    warn_on_content_type(&response, "text/html");
    let html = response.text();
    ensure!(
        html.to_lowercase().contains("<html"),
        "export is not an HTML document"
    );
    ensure!(html.contains("FATTURA"), "HTML export lacks the FATTURA heading");
    for marker in ["VetBuddy", "€"] {
        if !html.contains(marker) {
            tracing::warn!(marker, "HTML export lacks an expected marker");
        }
    }
    Ok(())
}
