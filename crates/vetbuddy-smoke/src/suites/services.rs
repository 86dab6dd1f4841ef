use async_trait::async_trait;

use super::{body, expect_field, expect_status, expect_success, id_of};
use crate::fixtures;
use crate::runner::{Account, Check, CheckResult, Context, Recorder, Suite};

/// Clinic price list.
pub struct ServicesSuite;

#[async_trait]
impl Suite for ServicesSuite {
    fn name(&self) -> &'static str {
        "services"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("list services", list(ctx)).await;
        rec.check("create service", create(ctx)).await;
        rec.finish()
    }
}

async fn list(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Clinic).await?;
    let response = client.list_services().await?;
    expect_status(&response, 200)?;
    body(&response)?;
    Ok(())
}

async fn create(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Clinic).await?;
    let service = fixtures::service();
    let response = client.create_service(&service).await?;
    expect_success(&response)?;
    let record = body(&response)?;
    let id = id_of(record)?;
    expect_field(record, "name", &service.name)?;
    ctx.fixtures.service_id = Some(id);
    Ok(())
}
