use async_trait::async_trait;
use vetbuddy_client::ClinicSearch;
use vetbuddy_core::{Credentials, Role};

use super::{body, expect_status, expect_success, items};
use crate::ensure;
use crate::fixtures;
use crate::runner::{Account, Check, CheckResult, Context, Recorder, Suite};

/// Endpoints reachable without an account, plus the demo logins.
pub struct PublicSuite;

#[async_trait]
impl Suite for PublicSuite {
    fn name(&self) -> &'static str {
        "public"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("services catalogue", catalogue(ctx)).await;
        rec.check("services flat list", flat_list(ctx)).await;
        rec.check("invite clinic", invite(ctx)).await;
        rec.check("search clinics", search(ctx, ClinicSearch::default())).await;
        rec.check(
            "search clinics by city",
            search(
                ctx,
                ClinicSearch {
                    city: Some("Milano".to_string()),
                    service: None,
                },
            ),
        )
        .await;
        rec.check(
            "search clinics by service",
            search(
                ctx,
                ClinicSearch {
                    city: None,
                    service: Some("visita_clinica".to_string()),
                },
            ),
        )
        .await;
        rec.check("demo clinic login", demo_login(ctx, Account::Clinic)).await;
        rec.check("demo owner login", demo_login(ctx, Account::Owner)).await;
        rec.finish()
    }
}

async fn catalogue(ctx: &mut Context) -> Check {
    let response = ctx.client().list_services().await?;
    expect_status(&response, 200)?;
    body(&response)?;
    Ok(())
}

async fn flat_list(ctx: &mut Context) -> Check {
    let response = ctx.client().list_services_flat().await?;
    expect_status(&response, 200)?;
    ensure!(
        !items(&response, "services")?.is_empty(),
        "flat service list is empty"
    );
    Ok(())
}

async fn invite(ctx: &mut Context) -> Check {
    let response = ctx.client().invite_clinic(&fixtures::clinic_invite()).await?;
    expect_success(&response)
}

async fn search(ctx: &mut Context, filters: ClinicSearch) -> Check {
    let response = ctx.client().search_clinics(&filters).await?;
    expect_status(&response, 200)?;
    body(&response)?;
    Ok(())
}

async fn demo_login(ctx: &mut Context, account: Account) -> Check {
    let (credentials, role): (Credentials, Role) = match account {
        Account::Owner => (ctx.config.owner.clone(), Role::Owner),
        Account::Clinic | Account::Registered => (ctx.config.clinic.clone(), Role::Clinic),
    };
    let session = ctx.client().sign_in(&credentials).await?;
    ensure!(
        session.role == Some(role),
        "{} logged in with role {:?}",
        credentials.email,
        session.role
    );
    ctx.store_session(account, session);
    Ok(())
}
