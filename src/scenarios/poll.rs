//! Poll bot: option limits, ballot rendering and reaction seeding

use futures_util::future::BoxFuture;

use crate::chat::ChatContext;
use crate::common::{ensure, Result};
use crate::harness::retry::DEFAULT_ATTEMPTS;
use crate::harness::Harness;

use super::SuiteOptions;

pub const LABEL: &str = "vote or die script test case";

pub const OPTIONS: SuiteOptions = SuiteOptions {
    create_test_user: false,
};

/// Reaction counts after the bot seeds one vote per option
const SEEDED_REACTIONS: &str = "0\u{20e3} 1 1\u{20e3} 1 2\u{20e3} 1";

pub fn schedule(harness: &mut Harness<ChatContext>) {
    harness.schedule_pre("choose_general_channel", choose_general_channel);
    harness.schedule("creating_poll_with_1_option", creating_poll_with_1_option);
    harness.schedule("creating_poll_with_2_options", creating_poll_with_2_options);
    harness.schedule(
        "creating_poll_with_3_options_and_check_related_emojis",
        creating_poll_with_3_options_and_check_related_emojis,
    );
    harness.schedule(
        "creating_poll_with_over_12_options",
        creating_poll_with_over_12_options,
    );
}

fn choose_general_channel(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move { cx.choose_general_channel().await })
}

/// Polls require more than one option
fn creating_poll_with_1_option(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.send_message("!poll question?, option 1").await?;
        cx.expect_latest_response("Provide more than one option.")
            .await
    })
}

fn creating_poll_with_2_options(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.send_message("!poll question?, option 1, option 2")
            .await?;
        cx.expect_latest_response(
            "_Please vote using reactions_\nquestion?\n0\u{20e3} option 1\n1\u{20e3} option 2",
        )
        .await
    })
}

/// Besides the ballot text the bot attaches one keycap reaction per option
fn creating_poll_with_3_options_and_check_related_emojis(
    cx: &mut ChatContext,
) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.send_message("!poll question?, option 1, option 2, option 3")
            .await?;
        cx.expect_latest_response(
            "_Please vote using reactions_\nquestion?\n0\u{20e3} option 1\n1\u{20e3} option 2\n2\u{20e3} option 3",
        )
        .await?;

        let seeded = cx
            .check_element_value_with_retries(".reactions", -1, SEEDED_REACTIONS, DEFAULT_ATTEMPTS)
            .await?;
        ensure(
            seeded,
            format!("the poll reactions never settled on '{}'", SEEDED_REACTIONS),
        )
    })
}

fn creating_poll_with_over_12_options(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.send_message("!poll question?, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15")
            .await?;
        cx.expect_latest_response("The maximum number of options is limited to 12.")
            .await
    })
}
