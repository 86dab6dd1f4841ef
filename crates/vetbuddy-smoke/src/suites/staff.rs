use async_trait::async_trait;

use super::{body, expect_field, expect_success, id_of, items};
use crate::fixtures;
use crate::runner::{Check, CheckResult, Context, Recorder, Suite};

/// Clinic staff management.
pub struct StaffSuite;

#[async_trait]
impl Suite for StaffSuite {
    fn name(&self) -> &'static str {
        "staff"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("create staff member", create(ctx)).await;
        rec.check("list staff", list(ctx)).await;
        rec.finish()
    }
}

async fn create(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let member = fixtures::staff_member();
    let response = client.create_staff(&member).await?;
    expect_success(&response)?;
    let record = body(&response)?;
    let id = id_of(record)?;
    expect_field(record, "name", &member.name)?;
    ctx.fixtures.staff_id = Some(id);
    Ok(())
}

async fn list(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let response = client.list_staff().await?;
    expect_success(&response)?;
    items(&response, "staff")?;
    Ok(())
}
