use async_trait::async_trait;
use vetbuddy_core::{CheckoutRequest, CheckoutSession, PaymentStatus};

use super::{body, expect_error, expect_success, id_of};
use crate::error::CheckError;
use crate::fixtures;
use crate::runner::{Account, Check, CheckResult, Context, Recorder, Suite};
use crate::{ensure, fail, skip};

/// Stripe checkout for appointments.
pub struct PaymentsSuite;

#[async_trait]
impl Suite for PaymentsSuite {
    fn name(&self) -> &'static str {
        "payments"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("create checkout session", checkout(ctx)).await;
        rec.check("checkout without appointment", checkout_missing_id(ctx)).await;
        rec.check("checkout for unknown appointment", checkout_unknown(ctx)).await;
        rec.check("payment status", status(ctx)).await;
        rec.check("payment status without appointment", status_missing_id(ctx)).await;
        rec.finish()
    }
}

fn checkout_request(ctx: &Context, appointment_id: Option<&str>) -> CheckoutRequest {
    CheckoutRequest {
        appointment_id: appointment_id.map(str::to_string),
        origin_url: ctx.config.origin_url.clone(),
    }
}

/// Create a priced appointment as the demo clinic.
async fn create_payable_appointment(ctx: &mut Context) -> Result<String, CheckError> {
    let client = ctx.client_as(Account::Clinic).await?;
    let response = client
        .create_appointment(&fixtures::payable_appointment())
        .await?;
    expect_success(&response)?;
    let id = id_of(body(&response)?)?;
    tracing::info!(appointment_id = %id, "Created appointment for checkout");
    ctx.fixtures.payment_appointment_created = true;
    Ok(id)
}

async fn checkout(ctx: &mut Context) -> Check {
    let mut appointment_id = match ctx.config.appointment_id.clone() {
        Some(id) => id,
        None => create_payable_appointment(ctx).await?,
    };

    let mut response = ctx
        .client()
        .create_appointment_checkout(&checkout_request(ctx, Some(&appointment_id)))
        .await?;
    if response.status_code() == 404 && !ctx.fixtures.payment_appointment_created {
        tracing::warn!(%appointment_id, "Configured appointment not found, creating one");
        appointment_id = create_payable_appointment(ctx).await?;
        response = ctx
            .client()
            .create_appointment_checkout(&checkout_request(ctx, Some(&appointment_id)))
            .await?;
    }
    ctx.fixtures.payment_appointment_id = Some(appointment_id);

    expect_success(&response)?;
    let session: CheckoutSession = response.decode()?;
    let problems = session.problems();
    ensure!(problems.is_empty(), "{}", problems.join("; "));
    tracing::info!(
        session_id = %session.session_id,
        amount = session.amount,
        "Checkout session created"
    );
    Ok(())
}

async fn checkout_missing_id(ctx: &mut Context) -> Check {
    let response = ctx
        .client()
        .create_appointment_checkout(&checkout_request(ctx, None))
        .await?;
    expect_error(&response, 400)
}

async fn checkout_unknown(ctx: &mut Context) -> Check {
    let response = ctx
        .client()
        .create_appointment_checkout(&checkout_request(
            ctx,
            Some(fixtures::MISSING_APPOINTMENT_ID),
        ))
        .await?;
    expect_error(&response, 404)
}

async fn status(ctx: &mut Context) -> Check {
    let Some(id) = ctx
        .fixtures
        .payment_appointment_id
        .clone()
        .or_else(|| ctx.config.appointment_id.clone())
    else {
        skip!("no appointment to query");
    };
    let response = ctx.client().appointment_payment_status(Some(&id)).await?;
    match response.status_code() {
        200 => {
            let status: PaymentStatus = response.decode()?;
            ensure!(
                status.appointment_id == id,
                "status is for appointment {}",
                status.appointment_id
            );
            ensure!(!status.payment_status.is_empty(), "empty paymentStatus");
            Ok(())
        }
        404 => expect_error(&response, 404),
        other => fail!("expected 200 or 404, got {other}: {}", response.summary(200)),
    }
}

async fn status_missing_id(ctx: &mut Context) -> Check {
    let response = ctx.client().appointment_payment_status(None).await?;
    expect_error(&response, 400)
}
