use async_trait::async_trait;
use vetbuddy_client::DocumentEmailRequest;

use super::{body, expect_field, expect_success, id_of, items, prerequisite};
use crate::ensure;
use crate::fixtures;
use crate::runner::{Check, CheckResult, Context, Recorder, Suite};

/// Document storage and email delivery.
pub struct DocumentsSuite;

#[async_trait]
impl Suite for DocumentsSuite {
    fn name(&self) -> &'static str {
        "documents"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("create document", create(ctx)).await;
        rec.check("list documents", list(ctx)).await;
        rec.check("send document email", send_email(ctx)).await;
        rec.finish()
    }
}

async fn create(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let document = fixtures::document();
    let response = client.create_document(&document).await?;
    expect_success(&response)?;
    let record = body(&response)?;
    let id = id_of(record)?;
    expect_field(record, "name", &document.name)?;
    ctx.fixtures.document_id = Some(id);
    Ok(())
}

async fn list(ctx: &mut Context) -> Check {
    let client = ctx.workspace().await?;
    let response = client.list_documents().await?;
    expect_success(&response)?;
    items(&response, "documents")?;
    Ok(())
}

async fn send_email(ctx: &mut Context) -> Check {
    let document_id = prerequisite(ctx.fixtures.document_id.as_ref(), "document")?;
    let client = ctx.workspace().await?;
    let request = DocumentEmailRequest {
        document_id,
        recipient_email: "owner@example.com".to_string(),
    };
    let response = client.send_document_email(&request).await?;
    expect_success(&response)?;
    ensure!(
        body(&response)?.get("success").and_then(|s| s.as_bool()) == Some(true),
        "send-email did not report success: {}",
        response.summary(200)
    );
    Ok(())
}
