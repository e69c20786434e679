//! Birthday bot: set, query and delete a user's birthday

use futures_util::future::BoxFuture;

use crate::chat::ChatContext;
use crate::common::Result;
use crate::harness::Harness;

use super::SuiteOptions;

pub const LABEL: &str = "happy birthder script test case";

/// The bot stores birthdays against real accounts, so the disposable
/// test user must exist before the cases run.
pub const OPTIONS: SuiteOptions = SuiteOptions {
    create_test_user: true,
};

const TEST_USER_BIRTHDAY: &str = "01.01.2000";

pub fn schedule(harness: &mut Harness<ChatContext>) {
    harness.schedule_pre("choose_general_channel", choose_general_channel);
    harness.schedule("requesting_birthday_set", requesting_birthday_set);
    harness.schedule("requesting_birthdays_on", requesting_birthdays_on);
    harness.schedule("requesting_birthdays_delete", requesting_birthdays_delete);
}

fn choose_general_channel(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move { cx.choose_general_channel().await })
}

fn requesting_birthday_set(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let request = format!(
            "{} birthday set {} {}",
            cx.bot_name(),
            cx.test_username(),
            TEST_USER_BIRTHDAY
        );
        cx.send_message(&request).await?;

        let expected = format!("Saving {}'s birthday.", cx.test_username());
        cx.expect_latest_response(&expected).await
    })
}

fn requesting_birthdays_on(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        // Drop the year, the bot expects a DD.MM day
        let day_month = &TEST_USER_BIRTHDAY[..TEST_USER_BIRTHDAY.len() - 5];

        let request = format!("{} birthdays on {}", cx.bot_name(), day_month);
        cx.send_message(&request).await?;

        let expected = format!("@{}", cx.test_username());
        cx.expect_latest_response(&expected).await
    })
}

fn requesting_birthdays_delete(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let request = format!("{} birthday delete {}", cx.bot_name(), cx.test_username());
        cx.send_message(&request).await?;

        let expected = format!("Removing {}'s birthday.", cx.test_username());
        cx.expect_latest_response(&expected).await
    })
}
