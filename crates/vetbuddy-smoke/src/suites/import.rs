use async_trait::async_trait;
use vetbuddy_core::{template_problems, ImportResult, PatientRow};

use super::{body, expect_error, expect_status, expect_success};
use crate::ensure;
use crate::fixtures;
use crate::runner::{Check, CheckResult, Context, Recorder, Suite};

const FILE_NAME: &str = "pazienti.csv";

/// Bulk patient import from CSV.
pub struct ImportSuite;

#[async_trait]
impl Suite for ImportSuite {
    fn name(&self) -> &'static str {
        "import"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("import template", template(ctx)).await;
        rec.check("anonymous upload rejected", anonymous_upload(ctx)).await;
        rec.check("csv upload", upload(ctx)).await;
        rec.finish()
    }
}

async fn template(ctx: &mut Context) -> Check {
    let response = ctx.client().import_template().await?;
    expect_status(&response, 200)?;
    let problems = template_problems(body(&response)?);
    ensure!(problems.is_empty(), "{}", problems.join("; "));
    Ok(())
}

async fn anonymous_upload(ctx: &mut Context) -> Check {
    let csv = PatientRow::to_csv(&fixtures::import_rows())?;
    let response = ctx.client().import_csv(FILE_NAME, csv).await?;
    expect_error(&response, 401)
}

async fn upload(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let csv = PatientRow::to_csv(&fixtures::import_rows())?;
    let response = client.import_csv(FILE_NAME, csv).await?;
    expect_success(&response)?;
    ensure!(
        body(&response)?.get("errors").is_some_and(serde_json::Value::is_array),
        "import result has no errors array"
    );
    let result: ImportResult = response.decode()?;
    ensure!(result.success, "import reported failure: {:?}", result.errors);
    ensure!(
        result.imported.pets >= 1,
        "no pets imported (errors: {:?})",
        result.errors
    );
    for warning in &result.warnings {
        tracing::warn!(%warning, "Import warning");
    }
    tracing::info!(
        owners = result.imported.owners,
        pets = result.imported.pets,
        vaccines = result.imported.vaccines,
        "Import finished"
    );
    Ok(())
}
