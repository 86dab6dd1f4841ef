use async_trait::async_trait;
use serde_json::Value;
use vetbuddy_client::{ApiResponse, ClientError, VetBuddyClient};

use super::{body, expect_success};
use crate::runner::{Account, Check, CheckResult, Context, Recorder, Suite};
use crate::{ensure, skip};

/// Deletes the records created earlier in the run.
pub struct CleanupSuite;

#[derive(Clone, Copy)]
enum Record {
    Appointment,
    PaymentAppointment,
    Document,
    Staff,
    Pet,
}

impl Record {
    const ALL: [Self; 5] = [
        Self::Appointment,
        Self::PaymentAppointment,
        Self::Document,
        Self::Staff,
        Self::Pet,
    ];

    const fn check_name(self) -> &'static str {
        match self {
            Self::Appointment => "delete appointment",
            Self::PaymentAppointment => "delete checkout appointment",
            Self::Document => "delete document",
            Self::Staff => "delete staff member",
            Self::Pet => "delete pet",
        }
    }
}

#[async_trait]
impl Suite for CleanupSuite {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        for record in Record::ALL {
            rec.check(record.check_name(), delete(ctx, record)).await;
        }
        rec.finish()
    }
}

async fn delete(ctx: &mut Context, record: Record) -> Check {
    let fixtures = &ctx.fixtures;
    let id = match record {
        Record::Appointment => fixtures.appointment_id.clone(),
        Record::PaymentAppointment if fixtures.payment_appointment_created => {
            fixtures.payment_appointment_id.clone()
        }
        Record::PaymentAppointment => None,
        Record::Document => fixtures.document_id.clone(),
        Record::Staff => fixtures.staff_id.clone(),
        Record::Pet => fixtures.pet_id.clone(),
    };
    let Some(id) = id else {
        skip!("nothing was created");
    };

    // Checkout appointments belong to the demo clinic, the rest to the workspace.
    let client = match record {
        Record::PaymentAppointment => ctx.client_as(Account::Clinic).await?,
        _ => ctx.workspace().await?,
    };
    let response = send_delete(&client, record, &id).await?;
    expect_success(&response)?;
    ensure!(
        body(&response)?.get("success").and_then(Value::as_bool) == Some(true),
        "delete did not report success: {}",
        response.summary(200)
    );
    tracing::info!(%id, check = record.check_name(), "Removed test record");
    Ok(())
}

async fn send_delete(
    client: &VetBuddyClient,
    record: Record,
    id: &str,
) -> Result<ApiResponse, ClientError> {
    match record {
        Record::Appointment | Record::PaymentAppointment => client.delete_appointment(id).await,
        Record::Document => client.delete_document(id).await,
        Record::Staff => client.delete_staff(id).await,
        Record::Pet => client.delete_pet(id).await,
    }
}
