use async_trait::async_trait;
use serde_json::Value;

use super::{body, expect_field, expect_success, id_of, items};
use crate::fixtures;
use crate::runner::{Account, Check, CheckResult, Context, Recorder, Suite};
use crate::{ensure, fail, skip};

/// Pet records and medical profiles.
pub struct PetsSuite;

#[async_trait]
impl Suite for PetsSuite {
    fn name(&self) -> &'static str {
        "pets"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("create pet", create(ctx)).await;
        rec.check("list pets", list(ctx)).await;
        rec.check("owner profile update", profile_update(ctx, Account::Owner)).await;
        rec.check("clinic profile update", profile_update(ctx, Account::Clinic)).await;
        rec.finish()
    }
}

async fn create(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let pet = fixtures::pet();
    let response = client.create_pet(&pet).await?;
    expect_success(&response)?;
    let record = body(&response)?;
    let id = id_of(record)?;
    expect_field(record, "name", &pet.name)?;
    ctx.fixtures.pet_id = Some(id);
    Ok(())
}

async fn list(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let response = client.list_pets().await?;
    expect_success(&response)?;
    items(&response, "pets")?;
    Ok(())
}

/// Update the first pet visible to `account` and read it back.
async fn profile_update(ctx: &mut Context, account: Account) -> Check {
    let client = ctx.client_as(account).await?;

    let response = client.list_pets().await?;
    expect_success(&response)?;
    let Some(pet) = items(&response, "pets")?.first().cloned() else {
        skip!("{} has no pets", account.label());
    };
    let id = id_of(&pet)?;
    let name = pet.get("name").and_then(Value::as_str).unwrap_or("Max");
    let species = pet.get("species").and_then(Value::as_str).unwrap_or("dog");

    let update = fixtures::pet_profile_update(name, species);
    let response = client.update_pet(&id, &update).await?;
    expect_success(&response)?;
    let updated = body(&response)?;
    let problems = update.mismatches(updated);
    ensure!(
        problems.is_empty(),
        "update not echoed: {}",
        problems.join("; ")
    );

    let response = client.list_pets().await?;
    expect_success(&response)?;
    let Some(stored) = items(&response, "pets")?
        .iter()
        .find(|p| p.get("id").and_then(Value::as_str) == Some(id.as_str()))
    else {
        fail!("pet {id} vanished after the update");
    };
    let problems = update.mismatches(stored);
    ensure!(
        problems.is_empty(),
        "update not persisted: {}",
        problems.join("; ")
    );
    Ok(())
}
