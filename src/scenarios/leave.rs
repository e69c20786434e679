//! Leave bot: vacation requests with approvals, work-from-home days,
//! time off and sick leave
//!
//! The bot speaks Russian and copies every verdict to the
//! `leave-coordination` channel. Several checks pin the exact reply
//! text, typos included, so the strings below must stay byte for byte
//! what the bot sends.

use chrono::{Datelike, Duration, Local};
use futures_util::future::BoxFuture;

use crate::chat::ChatContext;
use crate::common::{ensure, Result};
use crate::harness::Harness;

use super::SuiteOptions;

pub const LABEL: &str = "viva las vegas script test case";

pub const OPTIONS: SuiteOptions = SuiteOptions {
    create_test_user: true,
};

const LEAVE_CHANNEL: &str = "leave-coordination";

const DIVIDING_MESSAGE: &str = "Hello from dividing message for tests";

const FROM_MSG: &str = "Ok, с какого числа? (дд.мм)";

const TO_MSG: &str = "Отлично, по какое? (дд.мм)";

const INVALID_DATE_MSG: &str = "Указанная дата является невалидной. Попробуй еще раз.";

const PERMISSION_DENIED_MSG: &str = "У тебя недостаточно прав для этой команды 🙄";

const WFH_DAY_PROMPT: &str = "Ok, в какой день? (сегодня/завтра/дд.мм)";

const WFH_APPROVAL_PROMPT: &str = "Согласован ли этот день с руководителем/тимлидом?\nДа\nНет";

const ILL_WFH_PROMPT: &str = "Очень жаль. Ты в состоянии работать из дома в эти дни?\nДа\nНет";

const ILL_APPROVAL_PROMPT: &str =
    "Я понял. Согласовано ли отсутствие с руководителем/тимлидом?\nДа\nНет";

const VACATION_LENGTH_PATTERN: &str =
    r"Значит ты планируешь находиться в отпуске \d* д(ня|ней|ень).*";

const INVALID_DATES: [&str; 3] = ["99.99", "31.09", "30.02"];

pub fn schedule(harness: &mut Harness<ChatContext>) {
    harness.schedule_pre("choose_general_channel", choose_general_channel);
    harness.schedule_pre("send_birthday_to_bot", send_birthday_to_bot);
    harness.schedule(
        "sending_request_and_approving_it",
        sending_request_and_approving_it,
    );
    harness.schedule(
        "sending_request_and_rejecting_it",
        sending_request_and_rejecting_it,
    );
    harness.schedule("approve_notification", approve_notification);
    harness.schedule("reject_notification", reject_notification);
    harness.schedule("cancel_notification", cancel_notification);
    harness.schedule(
        "for_adding_weekends_to_vacation",
        for_adding_weekends_to_vacation,
    );
    harness.schedule(
        "vacation_notification_in_channel",
        vacation_notification_in_channel,
    );
    harness.schedule(
        "receiving_approval_in_channel",
        receiving_approval_in_channel,
    );
    harness.schedule("receiving_reject_in_channel", receiving_reject_in_channel);
    harness.schedule(
        "cancel_notification_in_channel",
        cancel_notification_in_channel,
    );
    harness.schedule(
        "sending_request_and_approving_it_without_permission",
        sending_request_and_approving_it_without_permission,
    );
    harness.schedule(
        "sending_request_and_rejecting_it_without_permission",
        sending_request_and_rejecting_it_without_permission,
    );
    harness.schedule(
        "sending_work_from_home_request_for_wrong_date",
        sending_work_from_home_request_for_wrong_date,
    );
    harness.schedule(
        "sending_work_from_home_request_for_dd_mm",
        sending_work_from_home_request_for_dd_mm,
    );
    harness.schedule(
        "sending_work_from_home_request_for_tomorrow",
        sending_work_from_home_request_for_tomorrow,
    );
    harness.schedule(
        "sending_work_from_home_request_for_today",
        sending_work_from_home_request_for_today,
    );
    harness.schedule(
        "sending_work_from_home_request_when_previous_one_is_approved",
        sending_work_from_home_request_when_previous_one_is_approved,
    );
    harness.schedule(
        "cancelling_approved_work_from_home_request",
        cancelling_approved_work_from_home_request,
    );
    harness.schedule(
        "sending_time_off_request_from_regular_user",
        sending_time_off_request_from_regular_user,
    );
    harness.schedule(
        "sending_time_off_request_from_admin",
        sending_time_off_request_from_admin,
    );
    harness.schedule(
        "sending_ill_request_without_working_from_home_and_interrupting_it",
        sending_ill_request_without_working_from_home_and_interrupting_it,
    );
    harness.schedule(
        "sending_ill_request_with_working_from_home_and_interrupting_it",
        sending_ill_request_with_working_from_home_and_interrupting_it,
    );
    harness.schedule("sending_ill_request", sending_ill_request);
    harness.schedule(
        "sending_ill_request_when_previous_one_is_approved",
        sending_ill_request_when_previous_one_is_approved,
    );
    harness.schedule(
        "cancelling_approved_ill_request",
        cancelling_approved_ill_request,
    );
}

//
// Fixture cases
//

fn choose_general_channel(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move { cx.choose_general_channel().await })
}

/// The bot refuses to talk about vacations until it knows a birthday
fn send_birthday_to_bot(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let bot_name = cx.bot_name().to_string();
        cx.switch_channel(&bot_name).await?;
        cx.send_message("01.01.1990").await
    })
}

//
// Date arithmetic
//

fn days_ahead(days: i64) -> String {
    (Local::now() + Duration::days(days))
        .format("%d.%m")
        .to_string()
}

fn days_ahead_full(days: i64) -> String {
    (Local::now() + Duration::days(days))
        .format("%d.%m.%Y")
        .to_string()
}

/// A vacation 15 days out, ending on the next Friday (or, from a
/// weekend start, the Friday after). Ending there makes the bot append
/// the weekend to the vacation span.
fn pre_weekend_dates() -> (String, String) {
    let date = Local::now() + Duration::days(15);
    let day = date.weekday().num_days_from_monday();
    let shift = if day < 4 { 4 - day } else { 6 - day + 4 };
    let start_date = date.format("%d.%m").to_string();
    let end_date = (date + Duration::days(i64::from(shift)))
        .format("%d.%m")
        .to_string();
    (start_date, end_date)
}

//
// Conversation building blocks
//

async fn send_to_bot(cx: &ChatContext, text: &str) -> Result<()> {
    cx.send_message(&format!("{} {}", cx.bot_name(), text)).await
}

async fn send_leave_request(cx: &ChatContext) -> Result<()> {
    send_to_bot(cx, "хочу в отпуск").await?;
    cx.expect_latest_response(FROM_MSG).await?;

    // Asking again mid-dialog earns a scolding
    send_to_bot(cx, "хочу в отпуск").await?;
    cx.expect_latest_response("Давай по порядку!\nC какого числа ты хочешь уйти в отпуск? (дд.мм)")
        .await
}

async fn input_start_date(cx: &ChatContext) -> Result<()> {
    for date in INVALID_DATES {
        send_to_bot(cx, date).await?;
        cx.expect_latest_response(INVALID_DATE_MSG).await?;
    }

    send_to_bot(cx, &days_ahead(1)).await?;
    cx.expect_latest_response(&format!(
        "Нужно запрашивать отпуск минимум за 7 дней, а твой - уже завтра. Попробуй выбрать дату позднее {}.",
        days_ahead_full(7)
    ))
    .await?;

    send_to_bot(cx, &days_ahead(2)).await?;
    cx.expect_latest_response(&format!(
        "Нужно запрашивать отпуск минимум за 7 дней, а твой - только через 2 дня. Попробуй выбрать дату позднее {}.",
        days_ahead_full(7)
    ))
    .await?;

    send_to_bot(cx, &days_ahead(15)).await?;
    cx.expect_latest_response(TO_MSG).await
}

async fn input_end_date(cx: &ChatContext) -> Result<()> {
    for date in INVALID_DATES {
        send_to_bot(cx, date).await?;
        cx.expect_latest_response(INVALID_DATE_MSG).await?;
    }

    // 44 days out exceeds the 28-day cap
    send_to_bot(cx, &days_ahead(44)).await?;
    cx.expect_latest_response_matches(r"Отпуск продолжительностью \d* д(ня|ней|ень).*")
        .await?;

    send_to_bot(cx, &days_ahead(29)).await?;
    cx.expect_latest_response_matches(VACATION_LENGTH_PATTERN).await
}

async fn confirm_dates(cx: &ChatContext, confirm: bool) -> Result<()> {
    let reply = if confirm { "Да, планирую" } else { "Нет, не планирую" };
    send_to_bot(cx, reply).await?;

    let expected = if confirm {
        "Заявка на отпуск отправлена. Ответ поступит не позже чем через 7 дней."
    } else {
        "Я прервал процесс формирования заявки на отпуск."
    };
    cx.expect_latest_response(expected).await
}

async fn approve_request(cx: &ChatContext, username: &str, is_admin: bool) -> Result<()> {
    send_to_bot(cx, &format!("одобрить заявку @{}", username)).await?;

    if is_admin {
        cx.expect_latest_response(&format!(
            "Заявка @{} одобрена. Я отправлю этому пользователю уведомление об этом.",
            username
        ))
        .await
    } else {
        cx.expect_latest_response(PERMISSION_DENIED_MSG).await
    }
}

async fn reject_request(cx: &ChatContext, username: &str, is_admin: bool) -> Result<()> {
    send_to_bot(cx, &format!("отклонить заявку @{}", username)).await?;

    if is_admin {
        cx.expect_latest_response(&format!(
            "Заявка @{} отклонена. Я отправлю этому пользователю уведомление об этом.",
            username
        ))
        .await
    } else {
        cx.expect_latest_response(PERMISSION_DENIED_MSG).await
    }
}

async fn cancel_approved_request(cx: &ChatContext, username: &str, is_admin: bool) -> Result<()> {
    send_to_bot(cx, &format!("отменить заявку @{}", username)).await?;

    if is_admin {
        cx.expect_latest_response(&format!("Отпуск пользователя @{} отменен.", username))
            .await
    } else {
        cx.expect_latest_response(PERMISSION_DENIED_MSG).await
    }
}

/// Checks that the newest message is the expected notification and the
/// dividing marker sent earlier sits right before it, proving nothing
/// else arrived in between.
async fn check_notification_after_divider(cx: &ChatContext, expected: &str) -> Result<()> {
    let preceding = cx.message_text(-2).await?;
    ensure(
        preceding == DIVIDING_MESSAGE,
        format!(
            "expected the dividing message before the notification, found '{}'",
            preceding
        ),
    )?;
    cx.expect_latest_response(expected).await
}

async fn check_notification_matches_after_divider(cx: &ChatContext, pattern: &str) -> Result<()> {
    let preceding = cx.message_text(-2).await?;
    ensure(
        preceding == DIVIDING_MESSAGE,
        format!(
            "expected the dividing message before the notification, found '{}'",
            preceding
        ),
    )?;
    cx.expect_latest_response_matches(pattern).await
}

async fn send_work_from_home_request(
    cx: &ChatContext,
    date: &str,
    expect: &str,
    reject: bool,
) -> Result<()> {
    send_to_bot(cx, "работаю из дома").await?;
    cx.expect_latest_response(WFH_DAY_PROMPT).await?;

    send_to_bot(cx, date).await?;
    cx.expect_latest_response(WFH_APPROVAL_PROMPT).await?;

    send_to_bot(cx, "Да, согласован").await?;
    cx.expect_latest_response_matches(&format!(
        "(^Отлично.(.*) Ты работаешь из дома {}.$)",
        expect
    ))
    .await?;

    if reject {
        send_to_bot(cx, "Не работаю из дома").await?;
        cx.expect_latest_response_matches(r"(^Я тебя понял.(.*)$)").await?;
    }
    Ok(())
}

//
// Vacation requests
//

fn sending_request_and_approving_it(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();

        cx.choose_general_channel().await?;
        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        approve_request(cx, &admin, true).await?;
        cancel_approved_request(cx, &admin, true).await
    })
}

fn sending_request_and_rejecting_it(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();

        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        reject_request(cx, &admin, true).await
    })
}

/// The requester gets a direct message from the bot once the request
/// is approved
fn approve_notification(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();
        let bot_name = cx.bot_name().to_string();

        cx.switch_channel(&bot_name).await?;
        cx.send_message(DIVIDING_MESSAGE).await?;
        cx.choose_general_channel().await?;
        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        approve_request(cx, &admin, true).await?;
        cx.switch_channel(&bot_name).await?;
        check_notification_after_divider(cx, "Заявка на отпуск одобрена.").await?;
        cx.choose_general_channel().await?;
        cancel_approved_request(cx, &admin, true).await
    })
}

fn reject_notification(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();
        let bot_name = cx.bot_name().to_string();

        cx.switch_channel(&bot_name).await?;
        cx.send_message(DIVIDING_MESSAGE).await?;
        cx.choose_general_channel().await?;
        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        reject_request(cx, &admin, true).await?;
        cx.switch_channel(&bot_name).await?;
        check_notification_after_divider(cx, "Заявка на отпуск отклонена.").await
    })
}

fn cancel_notification(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();
        let bot_name = cx.bot_name().to_string();

        cx.choose_general_channel().await?;
        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        approve_request(cx, &admin, true).await?;
        cx.switch_channel(&bot_name).await?;
        cx.send_message(DIVIDING_MESSAGE).await?;
        cx.choose_general_channel().await?;
        cancel_approved_request(cx, &admin, true).await?;
        cx.switch_channel(&bot_name).await?;
        check_notification_after_divider(
            cx,
            &format!(
                "Упс, пользователь @{} только что отменил твою заявку на отпуск.",
                admin
            ),
        )
        .await
    })
}

/// A vacation ending on Friday silently grows to cover the weekend
fn for_adding_weekends_to_vacation(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();

        send_to_bot(cx, "хочу в отпуск").await?;
        cx.expect_latest_response(FROM_MSG).await?;

        let (start_date, end_date) = pre_weekend_dates();
        send_to_bot(cx, &start_date).await?;
        cx.expect_latest_response(TO_MSG).await?;

        send_to_bot(cx, &end_date).await?;
        cx.expect_latest_response_matches(VACATION_LENGTH_PATTERN).await?;

        // Clean up the half-open request without verifying the answers
        send_to_bot(cx, "да").await?;
        send_to_bot(cx, &format!("отклонить заявку @{}", admin)).await
    })
}

fn vacation_notification_in_channel(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();

        cx.switch_channel(LEAVE_CHANNEL).await?;
        cx.send_message(DIVIDING_MESSAGE).await?;
        cx.choose_general_channel().await?;
        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        cx.switch_channel(LEAVE_CHANNEL).await?;
        check_notification_matches_after_divider(
            cx,
            &format!("Пользователь @{} хочет в отпуск с .*", admin),
        )
        .await?;
        cx.choose_general_channel().await?;
        approve_request(cx, &admin, true).await?;
        cancel_approved_request(cx, &admin, true).await
    })
}

fn receiving_approval_in_channel(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();

        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        cx.switch_channel(LEAVE_CHANNEL).await?;
        cx.send_message(DIVIDING_MESSAGE).await?;
        cx.choose_general_channel().await?;
        approve_request(cx, &admin, true).await?;
        cx.switch_channel(LEAVE_CHANNEL).await?;
        check_notification_after_divider(
            cx,
            &format!(
                "Заявка на отпуск пользователя @{0} была одобрена пользователем @{0}.",
                admin
            ),
        )
        .await?;
        cx.choose_general_channel().await?;
        cancel_approved_request(cx, &admin, true).await
    })
}

fn receiving_reject_in_channel(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();

        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        cx.switch_channel(LEAVE_CHANNEL).await?;
        cx.send_message(DIVIDING_MESSAGE).await?;
        cx.choose_general_channel().await?;
        reject_request(cx, &admin, true).await?;
        cx.switch_channel(LEAVE_CHANNEL).await?;
        check_notification_after_divider(
            cx,
            &format!(
                "Заявка на отпуск пользователя @{0} была отклонена пользователем @{0}.",
                admin
            ),
        )
        .await
    })
}

fn cancel_notification_in_channel(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();

        cx.choose_general_channel().await?;
        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        approve_request(cx, &admin, true).await?;
        cx.switch_channel(LEAVE_CHANNEL).await?;
        cx.send_message(DIVIDING_MESSAGE).await?;
        cx.choose_general_channel().await?;
        cancel_approved_request(cx, &admin, true).await?;
        cx.switch_channel(LEAVE_CHANNEL).await?;
        check_notification_after_divider(
            cx,
            &format!(
                "Пользователь @{0} отменил заявку на отпуск пользователя @{0}.",
                admin
            ),
        )
        .await
    })
}

fn sending_request_and_approving_it_without_permission(
    cx: &mut ChatContext,
) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let test_user = cx.test_username().to_string();

        cx.logout().await?;
        cx.login(true).await?;
        cx.choose_general_channel().await?;

        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        approve_request(cx, &test_user, false).await?;

        cx.logout().await?;
        cx.login(false).await?;
        cx.switch_channel(LEAVE_CHANNEL).await?;
        approve_request(cx, &test_user, true).await?;
        cancel_approved_request(cx, &test_user, true).await
    })
}

fn sending_request_and_rejecting_it_without_permission(
    cx: &mut ChatContext,
) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let test_user = cx.test_username().to_string();

        cx.logout().await?;
        cx.login(true).await?;
        cx.choose_general_channel().await?;

        send_leave_request(cx).await?;
        input_start_date(cx).await?;
        input_end_date(cx).await?;
        confirm_dates(cx, true).await?;
        reject_request(cx, &test_user, false).await?;

        cx.logout().await?;
        cx.login(false).await?;
        cx.switch_channel(LEAVE_CHANNEL).await?;
        reject_request(cx, &test_user, true).await
    })
}

//
// Work from home
//

fn sending_work_from_home_request_for_wrong_date(
    cx: &mut ChatContext,
) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;

        send_to_bot(cx, "работаю из дома").await?;
        cx.expect_latest_response(WFH_DAY_PROMPT).await?;

        // The Sunday after next, always past the two-week window
        let weekday = Local::now().weekday().num_days_from_monday();
        let later_than_2_weeks_ahead = days_ahead(i64::from(13 - weekday));
        send_to_bot(cx, &later_than_2_weeks_ahead).await?;
        cx.expect_latest_response(
            "Нельзя запланировать день работы из дома больше, чем на две недели вперед.",
        )
        .await?;

        send_to_bot(cx, &days_ahead(-1)).await?;
        cx.expect_latest_response(
            "Нельзя запланировать день работы из дома больше, чем на две недели вперед.",
        )
        .await?;

        send_to_bot(cx, "сегодня").await?;
        cx.expect_latest_response(WFH_APPROVAL_PROMPT).await?;

        send_to_bot(cx, "Нет, не согласован").await?;
        cx.expect_latest_response(
            "Тогда сначала согласуй, а потом пробуй еще раз (ты знаешь где меня найти).",
        )
        .await
    })
}

fn sending_work_from_home_request_for_dd_mm(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;
        send_work_from_home_request(cx, &days_ahead(5), &days_ahead_full(5), true).await
    })
}

fn sending_work_from_home_request_for_tomorrow(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;
        send_work_from_home_request(cx, "завтра", &days_ahead_full(1), true).await
    })
}

fn sending_work_from_home_request_for_today(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;
        send_work_from_home_request(cx, "сегодня", &days_ahead_full(0), true).await
    })
}

fn sending_work_from_home_request_when_previous_one_is_approved(
    cx: &mut ChatContext,
) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;

        let expect = days_ahead_full(0);
        send_work_from_home_request(cx, "сегодня", &expect, false).await?;

        send_to_bot(cx, "работаю из дома").await?;
        cx.expect_latest_response(&format!(
            "Ты уже работаешь из дома {}. Если хочешь все отменить, скажи 'не работаю из дома' 😉.",
            expect
        ))
        .await
    })
}

fn cancelling_approved_work_from_home_request(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;

        send_to_bot(cx, "не работаю из дома").await?;
        cx.expect_latest_response_matches(r"(^Я тебя понял(.*)$)").await?;

        send_to_bot(cx, "не работаю из дома").await?;
        cx.expect_latest_response(
            "У тебя не запланирован день работы из дома, который можно было бы отменить, а прошлого не вернешь...",
        )
        .await
    })
}

//
// Time off
//

fn sending_time_off_request_from_regular_user(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let test_user = cx.test_username().to_string();

        cx.logout().await?;
        cx.login(true).await?;
        cx.choose_general_channel().await?;

        send_to_bot(cx, &format!("{} хочет отгул", test_user)).await?;
        cx.expect_latest_response(PERMISSION_DENIED_MSG).await?;

        cx.logout().await?;
        cx.login(false).await
    })
}

fn sending_time_off_request_from_admin(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();
        let test_user = cx.test_username().to_string();

        cx.choose_general_channel().await?;

        send_to_bot(cx, &format!("{} хочет отгул", test_user)).await?;
        cx.expect_latest_response(&format!("Когда @{} хочет взять отгул?", test_user))
            .await?;

        send_to_bot(cx, &format!("{} хочет отгул", test_user)).await?;
        cx.expect_latest_response(&format!(
            "Дaвай по порядку. Какого числа @{} хочет взять отгул?",
            test_user
        ))
        .await?;

        // Naming someone else mid-dialog does not switch the subject
        send_to_bot(cx, &format!("{} хочет отгул", admin)).await?;
        cx.expect_latest_response(&format!(
            "Дaвай по порядку. Какого числа @{} хочет взять отгул?",
            test_user
        ))
        .await?;

        let today = days_ahead(0);
        let today_full = days_ahead_full(0);
        let tomorrow = days_ahead(1);

        send_to_bot(cx, &today).await?;
        cx.expect_latest_response(&format!(
            "Отлично. Значит @{} берет отгул {}. Какой это будет отгул?\nС отработкой\nЗа свой счет\nВ счет отпуска\nОтмена",
            test_user, today
        ))
        .await?;

        send_to_bot(cx, &tomorrow).await?;
        cx.expect_latest_response(&format!(
            "Давай по порядку. @{} берет отгул *{}*. Какой это будет отгул?\nС отработкой\nЗа свой счет\nВ счет отпуска\nОтмена",
            test_user, today_full
        ))
        .await?;

        send_to_bot(cx, "С отработкой").await?;
        cx.expect_latest_response(&format!(
            "Отлично. Значит @{} берет отгул с отработкой {}.",
            test_user, today_full
        ))
        .await?;

        send_to_bot(cx, "С отработкой").await?;
        cx.expect_latest_response(
            "Я не знал, что пользователь собирался брать отгул. Если хочешь сообщить об отгуле, скажи @username хочет отгул.",
        )
        .await
    })
}

//
// Sick leave
//

fn sending_ill_request_without_working_from_home_and_interrupting_it(
    cx: &mut ChatContext,
) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;

        send_to_bot(cx, "болею").await?;
        cx.expect_latest_response(ILL_WFH_PROMPT).await?;

        send_to_bot(cx, "Болею и не работаю").await?;
        cx.expect_latest_response(ILL_APPROVAL_PROMPT).await?;

        send_to_bot(cx, "Нет, они не предупреждены, что я болею").await?;
        cx.expect_latest_response("Тогда сначала предупреди, а потом вернись и повтори все снова!")
            .await
    })
}

fn sending_ill_request_with_working_from_home_and_interrupting_it(
    cx: &mut ChatContext,
) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;

        send_to_bot(cx, "болею").await?;
        cx.expect_latest_response(ILL_WFH_PROMPT).await?;

        send_to_bot(cx, "Болею и работаю").await?;
        cx.expect_latest_response(ILL_APPROVAL_PROMPT).await?;

        send_to_bot(cx, "Нет, они не предупреждены, что я болею").await?;
        cx.expect_latest_response("Тогда сначала предупреди, а потом вернись и повтори все снова!")
            .await
    })
}

fn sending_ill_request(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let admin = cx.config().admin_username.clone();

        cx.choose_general_channel().await?;

        send_to_bot(cx, "болею").await?;
        cx.expect_latest_response(ILL_WFH_PROMPT).await?;

        send_to_bot(cx, "Болею и работаю").await?;
        cx.expect_latest_response(ILL_APPROVAL_PROMPT).await?;

        send_to_bot(cx, "Да, они предупреждены, что я болею").await?;
        cx.expect_latest_response_matches(
            r"(^Ok\. Выздоравливай поскорее\.(.*)Когда ты выйдешь на работу, скажи мне `я не болею`\.$)",
        )
        .await?;

        cx.switch_channel(LEAVE_CHANNEL).await?;
        cx.expect_latest_response(&format!("@{} болеет и работает из дома", admin))
            .await
    })
}

fn sending_ill_request_when_previous_one_is_approved(
    cx: &mut ChatContext,
) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;

        send_to_bot(cx, "болею").await?;
        cx.expect_latest_response("Я уже слышал, что ты болеешь. 🤔").await
    })
}

fn cancelling_approved_ill_request(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        cx.choose_general_channel().await?;

        send_to_bot(cx, "не болею").await?;
        cx.expect_latest_response_matches(r"(^Рад видеть тебя снова!(.*)$)").await?;

        send_to_bot(cx, "не болею").await?;
        cx.expect_latest_response("Я ничего не знал о твоей болезни. 🤔").await
    })
}
