//! Pug bot: single pugs and pug bombs, every answer a bare image URL

use futures_util::future::BoxFuture;

use crate::chat::ChatContext;
use crate::common::Result;
use crate::harness::Harness;

use super::SuiteOptions;

pub const LABEL: &str = "pugme script test case";

pub const OPTIONS: SuiteOptions = SuiteOptions {
    create_test_user: false,
};

const URL_PATTERN: &str = r"https?://(?:[-\w.]|(?:%[\da-fA-F]{2}))+";

pub fn schedule(harness: &mut Harness<ChatContext>) {
    harness.schedule_pre("choose_general_channel", choose_general_channel);
    harness.schedule("requesting_1_pug", requesting_1_pug);
    harness.schedule("pug_bomb_3", pug_bomb_3);
    harness.schedule("pug_bomb_limit", pug_bomb_limit);
}

fn choose_general_channel(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move { cx.choose_general_channel().await })
}

fn requesting_1_pug(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let request = format!("{} pug me", cx.bot_name());
        cx.send_message(&request).await?;
        cx.expect_latest_response_matches(URL_PATTERN).await
    })
}

fn pug_bomb_3(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let request = format!("{} pug bomb 3", cx.bot_name());
        cx.send_message(&request).await?;
        cx.expect_latest_responses_match(URL_PATTERN, 3).await
    })
}

/// A bare `pug bomb` falls back to the bot's configured batch size
fn pug_bomb_limit(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let request = format!("{} pug bomb", cx.bot_name());
        let batch = cx.config().pugs_limit;
        cx.send_message(&request).await?;
        cx.expect_latest_responses_match(URL_PATTERN, batch).await
    })
}
