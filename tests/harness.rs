//! End-to-end tests for the case harness
//!
//! These drive the same loop the suite binaries run: schedule fixture
//! steps, main-stage cases and cleanup, run them against a context and
//! let the report decide the exit code. A scripted chat stands in for
//! the live Rocket.Chat session so the whole loop runs without a
//! browser or a server.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use futures_util::future::BoxFuture;

use chatops_e2e::common::ensure;
use chatops_e2e::harness::report::{EXIT_FAILURE, EXIT_OK};
use chatops_e2e::harness::retry::poll_until;
use chatops_e2e::harness::Matcher;
use chatops_e2e::scenarios::{birthday, general, leave, poll, pug};
use chatops_e2e::{Harness, Result};

/// In-memory stand-in for a chat room with a bot that answers late
#[derive(Default)]
struct ScriptedChat {
    /// Posted messages, newest last
    transcript: Mutex<Vec<String>>,
    /// Reply the bot delivers once the delay runs out
    reply: Mutex<Option<String>>,
    /// Polls left before the queued reply lands
    reply_delay: AtomicU32,
    /// Case names in execution order
    log: Vec<&'static str>,
}

impl ScriptedChat {
    fn send(&self, text: &str) {
        self.transcript.lock().unwrap().push(text.to_string());
    }

    /// Queue a bot reply that lands after the given number of polls
    fn bot_replies_after(&self, text: &str, polls: u32) {
        *self.reply.lock().unwrap() = Some(text.to_string());
        self.reply_delay.store(polls, Ordering::SeqCst);
    }

    /// One poll of the transcript; the queued reply lands when due
    fn latest(&self) -> Option<String> {
        if self.reply_delay.load(Ordering::SeqCst) > 0 {
            self.reply_delay.fetch_sub(1, Ordering::SeqCst);
        } else if let Some(reply) = self.reply.lock().unwrap().take() {
            self.transcript.lock().unwrap().push(reply);
        }
        self.transcript.lock().unwrap().last().cloned()
    }
}

fn sign_in(cx: &mut ScriptedChat) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.log.push("sign_in");
        Ok(())
    })
}

fn sign_out(cx: &mut ScriptedChat) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.log.push("sign_out");
        Ok(())
    })
}

/// The happy path: the answer shows up a couple of polls after the request
fn ask_for_pug(cx: &mut ScriptedChat) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.log.push("ask_for_pug");
        cx.send("meeseeks pug me");
        cx.bot_replies_after("https://i.imgur.com/fat-pug.jpg", 2);

        let expected = Matcher::pattern(r"https?://\S+")?;
        let expected = &expected;
        let chat = &*cx;
        let answered = poll_until(5, || async move {
            Ok(chat.latest().map_or(false, |text| expected.matches(&text)))
        })
        .await?;
        ensure(answered, "the bot never sent a pug link")
    })
}

/// The bot stays silent, so the check runs out of budget and fails
fn expects_a_greeting(cx: &mut ScriptedChat) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.log.push("expects_a_greeting");
        cx.send("hello bot");

        let expected = Matcher::exact("hi there");
        let expected = &expected;
        let chat = &*cx;
        let answered = poll_until(1, || async move {
            Ok(chat.latest().map_or(false, |text| expected.matches(&text)))
        })
        .await?;
        ensure(answered, "the bot never greeted back")
    })
}

/// A broken check is an infrastructure problem, not a test verdict
fn broken_probe(cx: &mut ScriptedChat) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.log.push("broken_probe");
        Matcher::pattern("(")?;
        Ok(())
    })
}

// ============== Scripted runs ==============

#[tokio::test]
async fn test_schedule_runs_stages_in_order_and_counts_main_cases() {
    let mut harness = Harness::new("scripted suite");
    harness.schedule_pre("sign_in", sign_in);
    harness.schedule("ask_for_pug", ask_for_pug);
    harness.schedule("expects_a_greeting", expects_a_greeting);
    harness.schedule_post("sign_out", sign_out);

    let mut chat = ScriptedChat::default();
    let report = harness.run(&mut chat).await.expect("run should finish");

    assert_eq!(
        chat.log,
        ["sign_in", "ask_for_pug", "expects_a_greeting", "sign_out"],
        "cleanup must still run after a failed case"
    );
    assert_eq!(report.scheduled, 2);
    assert_eq!(report.passed, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.exit_code(), EXIT_FAILURE);
}

#[tokio::test]
async fn test_late_bot_reply_lands_within_the_poll_budget() {
    let mut harness = Harness::new("scripted suite");
    harness.schedule("ask_for_pug", ask_for_pug);

    let mut chat = ScriptedChat::default();
    let report = harness.run(&mut chat).await.expect("run should finish");

    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.exit_code(), EXIT_OK);
    assert_eq!(
        *chat.transcript.lock().unwrap(),
        ["meeseeks pug me", "https://i.imgur.com/fat-pug.jpg"]
    );
    // Two polls came up empty, so the case slept through two intervals
    assert!(
        report.duration >= Duration::from_secs(2),
        "expected the poll pacing to show up in the duration: {:?}",
        report.duration
    );
}

#[tokio::test]
async fn test_broken_probe_aborts_the_run_before_cleanup() {
    let mut harness = Harness::new("scripted suite");
    harness.schedule("broken_probe", broken_probe);
    harness.schedule_post("sign_out", sign_out);

    let mut chat = ScriptedChat::default();
    let err = harness.run(&mut chat).await.expect_err("run should abort");

    assert!(
        !err.is_assertion(),
        "a pattern error is not a test verdict: {}",
        err
    );
    assert!(
        err.to_string().starts_with("Pattern error:"),
        "unexpected error: {}",
        err
    );
    assert_eq!(chat.log, ["broken_probe"], "cleanup must not run");
}

// ============================================================================
// Suite registration
//
// The suite binaries hand these schedule functions to the shared runner.
// The lists below pin the case names and their execution order.
// ============================================================================

#[test]
fn test_general_suite_case_list() {
    let mut harness = Harness::new(general::LABEL);
    general::schedule(&mut harness);

    assert_eq!(harness.label(), "general test case");
    assert_eq!(
        harness.case_names(),
        [
            "create_user",
            "create_channel",
            "send_message",
            "edit_message",
            "delete_message",
            "pin_message",
            "unpin_message",
            "upload_file",
            "remove_extra_rooms",
            "remove_extra_users",
        ]
    );
}

#[test]
fn test_birthday_suite_case_list() {
    let mut harness = Harness::new(birthday::LABEL);
    birthday::schedule(&mut harness);

    assert_eq!(harness.label(), "happy birthder script test case");
    assert_eq!(
        harness.case_names(),
        [
            "choose_general_channel",
            "requesting_birthday_set",
            "requesting_birthdays_on",
            "requesting_birthdays_delete",
        ]
    );
}

#[test]
fn test_poll_suite_case_list() {
    let mut harness = Harness::new(poll::LABEL);
    poll::schedule(&mut harness);

    assert_eq!(harness.label(), "vote or die script test case");
    assert_eq!(
        harness.case_names(),
        [
            "choose_general_channel",
            "creating_poll_with_1_option",
            "creating_poll_with_2_options",
            "creating_poll_with_3_options_and_check_related_emojis",
            "creating_poll_with_over_12_options",
        ]
    );
}

#[test]
fn test_pugme_suite_case_list() {
    let mut harness = Harness::new(pug::LABEL);
    pug::schedule(&mut harness);

    assert_eq!(harness.label(), "pugme script test case");
    assert_eq!(
        harness.case_names(),
        [
            "choose_general_channel",
            "requesting_1_pug",
            "pug_bomb_3",
            "pug_bomb_limit",
        ]
    );
}

#[test]
fn test_leave_suite_case_list() {
    let mut harness = Harness::new(leave::LABEL);
    leave::schedule(&mut harness);

    assert_eq!(harness.label(), "viva las vegas script test case");
    assert_eq!(
        harness.case_names(),
        [
            "choose_general_channel",
            "send_birthday_to_bot",
            "sending_request_and_approving_it",
            "sending_request_and_rejecting_it",
            "approve_notification",
            "reject_notification",
            "cancel_notification",
            "for_adding_weekends_to_vacation",
            "vacation_notification_in_channel",
            "receiving_approval_in_channel",
            "receiving_reject_in_channel",
            "cancel_notification_in_channel",
            "sending_request_and_approving_it_without_permission",
            "sending_request_and_rejecting_it_without_permission",
            "sending_work_from_home_request_for_wrong_date",
            "sending_work_from_home_request_for_dd_mm",
            "sending_work_from_home_request_for_tomorrow",
            "sending_work_from_home_request_for_today",
            "sending_work_from_home_request_when_previous_one_is_approved",
            "cancelling_approved_work_from_home_request",
            "sending_time_off_request_from_regular_user",
            "sending_time_off_request_from_admin",
            "sending_ill_request_without_working_from_home_and_interrupting_it",
            "sending_ill_request_with_working_from_home_and_interrupting_it",
            "sending_ill_request",
            "sending_ill_request_when_previous_one_is_approved",
            "cancelling_approved_ill_request",
        ]
    );
}
