use async_trait::async_trait;
use serde_json::json;
use vetbuddy_client::AuthResponse;
use vetbuddy_core::{Credentials, Role};

use super::{body, expect_error, expect_status, expect_success, id_of, prerequisite};
use crate::fixtures;
use crate::runner::{Account, Check, CheckResult, Context, Recorder, Suite};
use crate::{ensure, fail};

/// Registration, login and token enforcement.
pub struct AuthSuite;

#[async_trait]
impl Suite for AuthSuite {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("register clinic", register(ctx)).await;
        rec.check("login registered clinic", login(ctx)).await;
        rec.check("current user", current_user(ctx)).await;
        rec.check("missing token rejected", missing_token(ctx)).await;
        rec.check("invalid token rejected", invalid_token(ctx)).await;
        rec.check("bad credentials rejected", bad_credentials(ctx)).await;
        rec.check("missing password rejected", missing_password(ctx)).await;
        rec.finish()
    }
}

async fn register(ctx: &mut Context) -> Check {
    let registration = fixtures::clinic_registration();
    let response = ctx.client().register(&registration).await?;
    expect_success(&response)?;
    let auth: AuthResponse = response.decode()?;
    ensure!(!auth.token.is_empty(), "registration returned an empty token");
    ensure!(auth.user.is_object(), "registration returned no user");

    tracing::info!(email = %registration.email, "Registered clinic");
    ctx.fixtures.registered_email = Some(registration.email);
    ctx.store_session(Account::Registered, auth.into());
    Ok(())
}

async fn login(ctx: &mut Context) -> Check {
    let email = prerequisite(ctx.fixtures.registered_email.as_ref(), "registered clinic")?;
    let credentials = Credentials::new(email, fixtures::REGISTERED_PASSWORD);
    let session = ctx.client().sign_in(&credentials).await?;
    ensure!(!session.token.is_empty(), "login returned an empty token");
    ensure!(
        session.user.is_object(),
        "login returned no user: {}",
        session.user
    );
    ctx.store_session(Account::Registered, session);
    Ok(())
}

async fn current_user(ctx: &mut Context) -> Check {
    let client = ctx.client_as(Account::Registered).await?;
    let response = client.me().await?;
    expect_status(&response, 200)?;
    let user = body(&response)?;
    id_of(user)?;
    ensure!(
        user.get("password").is_none(),
        "current user exposes the password"
    );
    match user.get("role").and_then(|r| r.as_str()) {
        Some(role) if role == Role::Clinic.as_str() => Ok(()),
        other => fail!("expected role clinic, got {other:?}"),
    }
}

async fn missing_token(ctx: &mut Context) -> Check {
    let response = ctx.client().list_appointments().await?;
    expect_error(&response, 401)
}

async fn invalid_token(ctx: &mut Context) -> Check {
    let response = ctx
        .client()
        .authenticated("invalid.token.value")
        .list_appointments()
        .await?;
    expect_error(&response, 401)
}

async fn bad_credentials(ctx: &mut Context) -> Check {
    let credentials = Credentials::new("nobody@vetbuddy-test.it", "WrongPassword1!");
    let response = ctx.client().login(&credentials).await?;
    expect_error(&response, 401)
}

async fn missing_password(ctx: &mut Context) -> Check {
    let response = ctx
        .client()
        .login_raw(&json!({ "email": ctx.config.clinic.email }))
        .await?;
    expect_status(&response, 400)
}
