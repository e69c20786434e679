//! Core chat features: user admin, channels, messages, pins and uploads

use futures_util::future::BoxFuture;

use crate::chat::ChatContext;
use crate::common::{ensure, Result};
use crate::harness::retry::{poll_until, DEFAULT_ATTEMPTS};
use crate::harness::Harness;

use super::SuiteOptions;

pub const LABEL: &str = "general test case";

/// The first case registers the test account through the admin panel, so
/// the REST fixture must stay out of the way.
pub const OPTIONS: SuiteOptions = SuiteOptions {
    create_test_user: false,
};

const TEST_CHANNEL: &str = "test-channel";

const EDIT_SUBJECT: &str = "this message will be edited";
const EDITED_TEXT: &str = "this message was edited";
const DELETE_SUBJECT: &str = "this message will be deleted";
const UPLOAD_DESCRIPTION: &str = "an uploaded file";

pub fn schedule(harness: &mut Harness<ChatContext>) {
    harness.schedule("create_user", create_user);
    harness.schedule("create_channel", create_channel);
    harness.schedule("send_message", send_message);
    harness.schedule("edit_message", edit_message);
    harness.schedule("delete_message", delete_message);
    harness.schedule("pin_message", pin_message);
    harness.schedule("unpin_message", unpin_message);
    harness.schedule("upload_file", upload_file);
    harness.schedule_post("remove_extra_rooms", remove_extra_rooms);
    harness.schedule_post("remove_extra_users", remove_extra_users);
}

fn create_user(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let user = cx.config().test_user.clone();
        cx.create_user_via_admin(&user).await?;

        let api = cx.api();
        let username = user.username.as_str();
        let email = user.email.as_str();
        let registered = poll_until(DEFAULT_ATTEMPTS, || async move {
            Ok(api.username_exists(username).await? && api.email_exists(email).await?)
        })
        .await?;
        ensure(
            registered,
            format!("the account '{}' never appeared in the user directory", username),
        )
    })
}

fn create_channel(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.create_channel(TEST_CHANNEL).await?;

        let api = cx.api();
        let listed = poll_until(DEFAULT_ATTEMPTS, || api.room_exists(TEST_CHANNEL)).await?;
        ensure(
            listed,
            format!("the channel '{}' never appeared in the room list", TEST_CHANNEL),
        )?;

        cx.switch_channel(TEST_CHANNEL).await
    })
}

fn send_message(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.send_message(EDIT_SUBJECT).await?;
        cx.expect_latest_response(EDIT_SUBJECT).await
    })
}

fn edit_message(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.edit_latest_message(EDITED_TEXT).await?;
        cx.expect_latest_response(EDITED_TEXT).await
    })
}

fn delete_message(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.send_message(DELETE_SUBJECT).await?;
        cx.expect_latest_response(DELETE_SUBJECT).await?;

        cx.delete_latest_message().await?;
        // With the newcomer gone the edited message is the newest again.
        cx.expect_latest_response(EDITED_TEXT).await
    })
}

fn pin_message(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.pin_latest_message().await?;

        let pinned = cx.pinned_messages().await?;
        ensure(
            pinned.iter().any(|text| text == EDITED_TEXT),
            format!("'{}' is missing from the pinned messages pane", EDITED_TEXT),
        )
    })
}

fn unpin_message(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.unpin_latest_message().await?;

        let pinned = cx.pinned_messages().await?;
        ensure(
            pinned.is_empty(),
            format!("the pinned messages pane still lists {} entries", pinned.len()),
        )
    })
}

fn upload_file(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("upload.txt");
        std::fs::write(&path, "end-to-end upload payload\n")?;

        cx.upload_file(&path, UPLOAD_DESCRIPTION).await?;
        cx.expect_latest_response(UPLOAD_DESCRIPTION).await
    })
}

fn remove_extra_rooms(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let keep = cx.config().expected_rooms.clone();
        cx.api().delete_extra_rooms(&keep).await
    })
}

fn remove_extra_users(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move { cx.api().delete_extra_users().await })
}
