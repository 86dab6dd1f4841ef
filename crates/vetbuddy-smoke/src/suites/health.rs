use async_trait::async_trait;

use super::{body, expect_status};
use crate::ensure;
use crate::runner::{Check, CheckResult, Context, Recorder, Suite};

/// Liveness of the API.
pub struct HealthSuite;

#[async_trait]
impl Suite for HealthSuite {
    fn name(&self) -> &'static str {
        "health"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("health endpoint", health(ctx)).await;
        rec.finish()
    }
}

async fn health(ctx: &mut Context) -> Check {
    let response = ctx.client().health().await?;
    expect_status(&response, 200)?;
    let body = body(&response)?;
    ensure!(
        body.get("status").and_then(|s| s.as_str()) == Some("ok"),
        "status is not ok: {body}"
    );
    let app = body.get("app").and_then(|a| a.as_str()).unwrap_or_default();
    ensure!(app.contains("VetBuddy"), "app does not name VetBuddy: {app:?}");
    Ok(())
}
