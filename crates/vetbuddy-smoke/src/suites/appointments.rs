use async_trait::async_trait;
use serde_json::json;

use super::{body, expect_field, expect_success, id_of, items, prerequisite};
use crate::ensure;
use crate::fixtures;
use crate::runner::{Check, CheckResult, Context, Recorder, Suite};

const UPDATED_NOTES: &str = "Aggiornato dallo smoke test";

/// Appointment create, list and update.
pub struct AppointmentsSuite;

#[async_trait]
impl Suite for AppointmentsSuite {
    fn name(&self) -> &'static str {
        "appointments"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("create appointment", create(ctx)).await;
        rec.check("list appointments", list(ctx)).await;
        rec.check("update appointment", update(ctx)).await;
        rec.finish()
    }
}

async fn create(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let appointment = fixtures::appointment();
    let response = client.create_appointment(&appointment).await?;
    expect_success(&response)?;
    let record = body(&response)?;
    let id = id_of(record)?;
    expect_field(record, "petName", "Buddy")?;
    ctx.fixtures.appointment_id = Some(id);
    Ok(())
}

async fn list(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let response = client.list_appointments().await?;
    expect_success(&response)?;
    let appointments = items(&response, "appointments")?;
    ensure!(!appointments.is_empty(), "appointment list is empty");
    if let Some(id) = &ctx.fixtures.appointment_id {
        ensure!(
            appointments
                .iter()
                .any(|a| a.get("id").and_then(|v| v.as_str()) == Some(id.as_str())),
            "created appointment {id} is not listed"
        );
    }
    Ok(())
}

async fn update(ctx: &mut Context) -> Check {
    let id = prerequisite(ctx.fixtures.appointment_id.as_ref(), "appointment")?;
    let client = ctx.workspace().await?;
    let response = client
        .update_appointment(&id, &json!({ "notes": UPDATED_NOTES }))
        .await?;
    expect_success(&response)?;
    expect_field(body(&response)?, "notes", UPDATED_NOTES)
}
