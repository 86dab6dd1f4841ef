use async_trait::async_trait;
use serde_json::{json, Value};
use vetbuddy_core::{ChatReply, ChatRequest, MIN_REPLY_CHARS, PRICING_TERMS};

use super::{body, expect_error, expect_success};
use crate::error::CheckError;
use crate::fixtures;
use crate::runner::{Check, CheckResult, Context, Recorder, Suite};
use crate::{ensure, fail};

/// Virtual assistant answers.
pub struct ChatSuite;

#[async_trait]
impl Suite for ChatSuite {
    fn name(&self) -> &'static str {
        "chat"
    }

    async fn run(&self, ctx: &mut Context) -> Vec<CheckResult> {
        let mut rec = Recorder::new(self.name(), ctx);
        rec.check("product question", product_question(ctx)).await;
        rec.check("invalid messages rejected", invalid_messages(ctx)).await;
        rec.check("pricing conversation", pricing_conversation(ctx)).await;
        rec.finish()
    }
}

async fn ask(ctx: &Context, request: &ChatRequest) -> Result<ChatReply, CheckError> {
    let response = ctx.client().chat(request).await?;
    expect_success(&response)?;
    let raw = body(&response)?;
    if raw.get("success").and_then(Value::as_bool) == Some(false) {
        fail!(
            "chat reported failure: {}",
            raw.get("error").and_then(Value::as_str).unwrap_or("no error given")
        );
    }
    let reply: ChatReply = response.decode()?;
    ensure!(reply.success, "chat reply is not marked successful");
    ensure!(!reply.session_id.is_empty(), "reply has an empty sessionId");
    tracing::debug!(chars = reply.len_chars(), "Chat reply received");
    Ok(reply)
}

async fn product_question(ctx: &mut Context) -> Check {
    let reply = ask(ctx, &fixtures::chat_question()).await?;
    ensure!(
        reply.len_chars() >= MIN_REPLY_CHARS,
        "reply too short ({} chars)",
        reply.len_chars()
    );
    ensure!(reply.mentions_vetbuddy(), "reply does not mention VetBuddy");
    Ok(())
}

async fn invalid_messages(ctx: &mut Context) -> Check {
    let response = ctx
        .client()
        .chat_raw(&json!({ "messages": "invalid", "sessionId": fixtures::chat_session_id() }))
        .await?;
    expect_error(&response, 400)
}

async fn pricing_conversation(ctx: &mut Context) -> Check {
    let reply = ask(ctx, &fixtures::chat_pricing_conversation()).await?;
    ensure!(reply.mentions_pricing(), "reply mentions none of {PRICING_TERMS:?}");
    Ok(())
}
