use async_trait::async_trait;
use serde_json::{Map, Value};
use vetbuddy_client::VetBuddyClient;
use vetbuddy_core::{settings_response_problems, AutomationPlan, STARTER_AUTOMATIONS};

use super::{body, expect_error, expect_status, expect_success};
use crate::error::CheckError;
use crate::runner::{Account, Check, CheckResult, Context, Recorder, Suite};
use crate::{ensure, fail};

/// Toggled during the round-trip check; allowed on every plan.
const TOGGLE_KEY: &str = STARTER_AUTOMATIONS[0];

/// Clinic automation settings and plan limits.
pub struct AutomationsSuite;

#[async_trait]
impl Suite for AutomationsSuite {
    fn name(&self) -> &'static str {
        "automations"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("settings require a token", unauthenticated(ctx)).await;
        rec.check("owners are forbidden", owner_forbidden(ctx)).await;
        rec.check("clinic settings", clinic_settings(ctx)).await;
        rec.check("toggle automation", toggle(ctx)).await;
        rec.check("unknown key rejected", unknown_key(ctx)).await;
        rec.check("replace settings", replace(ctx)).await;
        rec.finish()
    }
}

async fn current_settings(client: &VetBuddyClient) -> Result<Map<String, Value>, CheckError> {
    let response = client.automation_settings().await?;
    expect_status(&response, 200)?;
    match body(&response)?.get("settings") {
        Some(Value::Object(settings)) => Ok(settings.clone()),
        _ => fail!("response has no settings object"),
    }
}

async fn unauthenticated(ctx: &mut Context) -> Check {
    let response = ctx.client().automation_settings().await?;
    expect_error(&response, 401)
}

async fn owner_forbidden(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Owner).await?;
    let response = client.automation_settings().await?;
    expect_error(&response, 403)
}

async fn clinic_settings(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let response = client.automation_settings().await?;
    expect_status(&response, 200)?;
    let body = body(&response)?;
    let problems = settings_response_problems(body);
    ensure!(problems.is_empty(), "{}", problems.join("; "));

    let plan = body
        .get("plan")
        .and_then(Value::as_str)
        .map_or(AutomationPlan::Starter, AutomationPlan::from_wire);
    tracing::info!(?plan, allowed = plan.expected_count(), "Automation plan");
    Ok(())
}

async fn toggle(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let settings = current_settings(&client).await?;
    let Some(original) = settings.get(TOGGLE_KEY).and_then(Value::as_bool) else {
        fail!("{TOGGLE_KEY} is not a boolean setting");
    };

    let flipped = flip_and_read_back(&client, !original).await;
    let restored = restore(&client, original).await;
    flipped.and(restored)
}

/// Sets [`TOGGLE_KEY`] and checks both the echo and a fresh read.
async fn flip_and_read_back(client: &VetBuddyClient, enabled: bool) -> Check {
    let response = client.toggle_automation(TOGGLE_KEY, enabled).await?;
    expect_success(&response)?;
    let echoed = body(&response)?;
    ensure!(
        echoed.get("key").and_then(Value::as_str) == Some(TOGGLE_KEY)
            && echoed.get("enabled").and_then(Value::as_bool) == Some(enabled),
        "toggle not echoed: {}",
        response.summary(200)
    );

    let stored = current_settings(client)
        .await?
        .get(TOGGLE_KEY)
        .and_then(Value::as_bool);
    ensure!(
        stored == Some(enabled),
        "{TOGGLE_KEY} reads back as {stored:?} after toggling to {enabled}"
    );
    Ok(())
}

/// Sent whenever a toggle was attempted, whatever the toggle check decided.
async fn restore(client: &VetBuddyClient, original: bool) -> Check {
    let response = client.toggle_automation(TOGGLE_KEY, original).await?;
    if !response.is_success() {
        tracing::warn!(
            key = TOGGLE_KEY,
            status = response.status_code(),
            "Could not restore automation setting"
        );
    }
    expect_success(&response)
}

async fn unknown_key(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let response = client.toggle_automation("notARealAutomation", true).await?;
    expect_error(&response, 400)
}

async fn replace(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let settings = current_settings(&client).await?;
    let response = client
        .replace_automation_settings(&Value::Object(settings.clone()))
        .await?;
    expect_success(&response)?;
    let Some(Value::Object(echoed)) = body(&response)?.get("settings") else {
        fail!("response has no settings object");
    };
    let differing: Vec<&str> = settings
        .iter()
        .filter(|(key, value)| echoed.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.as_str())
        .collect();
    ensure!(differing.is_empty(), "settings not echoed: {}", differing.join(", "));
    Ok(())
}
