//! Chat-side UI flows
//!
//! Selector-level counterparts of what a person does in the app: the login
//! form, the sidebar, the message composer and the hover actions on
//! rendered messages. Element lookups honor the session's implicit wait, so
//! a missing element only comes back empty after the timeout.

use std::path::Path;

use thirtyfour::prelude::*;
use thirtyfour::Key;
use tokio::time::sleep;
use tracing::debug;

use crate::common::{ensure, Error, Result};
use crate::harness::retry::{poll_until, Matcher, DEFAULT_ATTEMPTS, POLL_INTERVAL};

use super::ChatContext;

/// CSS selector of every rendered message body
pub const MESSAGE_BODY: &str = "div.body.color-primary-font-color";

impl ChatContext {
    /// Log in through the login form, as the admin or as the test user
    pub async fn login(&self, use_test_user: bool) -> Result<()> {
        let (username, password) = if use_test_user {
            (
                self.config.test_user.username.as_str(),
                self.config.test_user.password.as_str(),
            )
        } else {
            (
                self.config.admin_username.as_str(),
                self.config.admin_password.as_str(),
            )
        };
        debug!("logging in as '{}'", username);

        self.fill(By::Name("emailOrUsername"), username).await?;
        self.fill(By::Name("pass"), password).await?;

        let buttons = self
            .driver()
            .find_all(By::Css(".rc-button.rc-button--primary.login"))
            .await?;
        ensure(!buttons.is_empty(), "the login button is missing")?;
        buttons[0].click().await?;

        let welcome = self
            .driver()
            .find_all(By::XPath("//*[text()='Welcome to Rocket.Chat!']"))
            .await?;
        ensure(!welcome.is_empty(), "the welcome screen never showed up")
    }

    /// Log out through the avatar menu
    pub async fn logout(&self) -> Result<()> {
        let avatars = self.driver().find_all(By::Css(".avatar")).await?;
        ensure(!avatars.is_empty(), "the avatar button is missing")?;
        avatars[0].click().await?;

        let entries = self
            .driver()
            .find_all(By::Css(".rc-popover__item.js-action"))
            .await?;
        let Some(logout_btn) = entries.last() else {
            return Err(Error::assertion("the account menu has no entries"));
        };
        logout_btn.click().await?;
        Ok(())
    }

    /// Open the sidebar entry whose label is exactly `channel_name`
    ///
    /// Sidebar rows sit under overlay layers, so the click goes through JS.
    pub async fn switch_channel(&self, channel_name: &str) -> Result<()> {
        debug!("switching to channel '{}'", channel_name);
        let entries = self
            .driver()
            .find_all(By::Css("div.sidebar-item__ellipsis"))
            .await?;
        ensure(!entries.is_empty(), "the sidebar has no channel entries")?;

        let mut matching = Vec::new();
        for entry in entries {
            if entry.text().await? == channel_name {
                matching.push(entry);
            }
        }
        ensure(
            matching.len() == 1,
            format!(
                "expected exactly one sidebar entry named '{}', found {}",
                channel_name,
                matching.len()
            ),
        )?;

        self.js_click(&matching[0]).await
    }

    pub async fn choose_general_channel(&self) -> Result<()> {
        self.switch_channel("general").await
    }

    /// Type a message into the composer and click send
    pub async fn send_message(&self, text: &str) -> Result<()> {
        debug!("sending message '{}'", text);
        self.fill(By::Name("msg"), text).await?;

        let send_buttons = self
            .driver()
            .find_all(By::Css(
                "svg.rc-icon.rc-input__icon-svg.rc-input__icon-svg--send",
            ))
            .await?;
        ensure(!send_buttons.is_empty(), "the send button is missing")?;
        send_buttons[0].click().await?;
        Ok(())
    }

    /// Fetch a rendered message body by position; negative positions count
    /// from the newest message backwards
    pub async fn get_message_by_number(&self, number: isize) -> Result<WebElement> {
        let mut messages = self.driver().find_all(By::Css(MESSAGE_BODY)).await?;
        let Some(index) = resolve_index(messages.len(), number) else {
            return Err(Error::assertion(format!(
                "only {} messages are rendered, cannot address message {}",
                messages.len(),
                number
            )));
        };
        Ok(messages.swap_remove(index))
    }

    /// Text of the message at `number`, newest-relative when negative
    pub async fn message_text(&self, number: isize) -> Result<String> {
        Ok(self.get_message_by_number(number).await?.text().await?)
    }

    /// Poll the newest `count` messages until every one satisfies `expected`
    ///
    /// Mid-render reads come back stale; such attempts retry immediately.
    pub async fn check_latest_response_with_retries(
        &self,
        expected: &Matcher,
        count: usize,
        attempts: u32,
    ) -> Result<bool> {
        for _ in 0..attempts {
            let messages = self.driver().find_all(By::Css(MESSAGE_BODY)).await?;
            if messages.len() < count {
                sleep(POLL_INTERVAL).await;
                continue;
            }

            let mut texts = Vec::with_capacity(count);
            let mut stale = false;
            for message in &messages[messages.len() - count..] {
                match message.text().await {
                    Ok(text) => texts.push(text),
                    Err(_) => {
                        stale = true;
                        break;
                    }
                }
            }
            if stale {
                continue;
            }

            if texts.iter().all(|text| expected.matches(text)) {
                return Ok(true);
            }
            sleep(POLL_INTERVAL).await;
        }
        Ok(false)
    }

    /// Require the newest message to read exactly `expected`
    pub async fn expect_latest_response(&self, expected: &str) -> Result<()> {
        let matcher = Matcher::exact(expected);
        let matched = self
            .check_latest_response_with_retries(&matcher, 1, DEFAULT_ATTEMPTS)
            .await?;
        ensure(matched, format!("the newest message never read {}", matcher))
    }

    /// Require the newest message to match the anchored pattern `expected`
    pub async fn expect_latest_response_matches(&self, expected: &str) -> Result<()> {
        let matcher = Matcher::pattern(expected)?;
        let matched = self
            .check_latest_response_with_retries(&matcher, 1, DEFAULT_ATTEMPTS)
            .await?;
        ensure(matched, format!("the newest message never matched {}", matcher))
    }

    /// Require each of the newest `count` messages to match the pattern
    pub async fn expect_latest_responses_match(&self, expected: &str, count: usize) -> Result<()> {
        let matcher = Matcher::pattern(expected)?;
        let matched = self
            .check_latest_response_with_retries(&matcher, count, DEFAULT_ATTEMPTS)
            .await?;
        ensure(
            matched,
            format!("the last {} messages should all match {}", count, matcher),
        )
    }

    /// Poll the element at `position` within `selector` until its text
    /// equals `expected`; negative positions count from the end
    pub async fn check_element_value_with_retries(
        &self,
        selector: &str,
        position: isize,
        expected: &str,
        attempts: u32,
    ) -> Result<bool> {
        for _ in 0..attempts {
            let elements = self.driver().find_all(By::Css(selector)).await?;
            ensure(
                !elements.is_empty(),
                format!("no elements match '{}'", selector),
            )?;

            let Some(index) = resolve_index(elements.len(), position) else {
                return Err(Error::assertion(format!(
                    "'{}' matches {} elements, cannot address element {}",
                    selector,
                    elements.len(),
                    position
                )));
            };
            if let Ok(text) = elements[index].text().await {
                if text == expected {
                    return Ok(true);
                }
            }
            sleep(POLL_INTERVAL).await;
        }
        Ok(false)
    }

    /// Whether no modal dialog is currently rendered
    pub async fn modal_window_closed(&self) -> Result<bool> {
        let windows = self
            .driver()
            .find_all(By::ClassName("rc-modal__content-text"))
            .await?;
        Ok(windows.is_empty())
    }

    /// Replace the newest message's text through its edit action
    pub async fn edit_latest_message(&self, new_text: &str) -> Result<()> {
        self.message_action("Edit").await?;

        let composer = self.driver().find(By::Name("msg")).await?;
        composer.clear().await?;
        composer.send_keys(new_text).await?;
        composer.send_keys(enter_key()).await?;
        Ok(())
    }

    /// Delete the newest message, accepting the warning dialog
    pub async fn delete_latest_message(&self) -> Result<()> {
        self.message_action("Delete").await?;
        self.confirm_modal().await?;

        let closed = poll_until(DEFAULT_ATTEMPTS, || self.modal_window_closed()).await?;
        ensure(closed, "the delete confirmation dialog never closed")
    }

    pub async fn pin_latest_message(&self) -> Result<()> {
        self.message_action("Pin Message").await
    }

    pub async fn unpin_latest_message(&self) -> Result<()> {
        self.message_action("Unpin Message").await
    }

    /// Message texts currently listed in the pinned-messages panel
    ///
    /// Opens the panel through the room kebab menu and toggles it back shut
    /// so the message list stays unobstructed for the following cases.
    pub async fn pinned_messages(&self) -> Result<Vec<String>> {
        self.toggle_pinned_panel().await?;

        let bodies = self
            .driver()
            .find_all(By::Css(".flex-tab div.body"))
            .await?;
        let mut texts = Vec::with_capacity(bodies.len());
        for body in &bodies {
            texts.push(body.text().await?);
        }

        self.toggle_pinned_panel().await?;
        Ok(texts)
    }

    /// Upload a file through the hidden file input and confirm the dialog
    pub async fn upload_file(&self, path: &Path, description: &str) -> Result<()> {
        let inputs = self
            .driver()
            .find_all(By::Css("input[type='file']"))
            .await?;
        ensure(!inputs.is_empty(), "the file input is missing")?;
        inputs[0].send_keys(path.to_string_lossy().as_ref()).await?;

        self.fill(By::Id("file-description"), description).await?;
        self.confirm_modal().await
    }

    /// Open the newest message's action menu and pick the entry labeled
    /// `label`
    async fn message_action(&self, label: &str) -> Result<()> {
        let menus = self
            .driver()
            .find_all(By::Css(".message-actions__menu"))
            .await?;
        let Some(menu) = menus.last() else {
            return Err(Error::assertion("no message action menu is rendered"));
        };
        self.js_click(menu).await?;

        let entries = self
            .driver()
            .find_all(By::Css(".rc-popover__item"))
            .await?;
        for entry in &entries {
            if entry.text().await? == label {
                entry.click().await?;
                return Ok(());
            }
        }
        Err(Error::assertion(format!(
            "the message menu has no '{}' entry",
            label
        )))
    }

    async fn toggle_pinned_panel(&self) -> Result<()> {
        let kebabs = self
            .driver()
            .find_all(By::Css(".rc-room-actions__action.js-more"))
            .await?;
        ensure(!kebabs.is_empty(), "the room kebab menu is missing")?;
        kebabs[0].click().await?;

        let entries = self
            .driver()
            .find_all(By::Css(".rc-popover__item"))
            .await?;
        for entry in &entries {
            if entry.text().await? == "Pinned Messages" {
                entry.click().await?;
                return Ok(());
            }
        }
        Err(Error::assertion(
            "the room menu has no 'Pinned Messages' entry",
        ))
    }

    /// Accept the currently open confirmation dialog
    async fn confirm_modal(&self) -> Result<()> {
        let buttons = self
            .driver()
            .find_all(By::Css(".rc-modal .js-confirm"))
            .await?;
        ensure(!buttons.is_empty(), "the confirmation dialog is missing")?;
        buttons[0].click().await?;
        Ok(())
    }

    pub(crate) async fn fill(&self, by: By, value: &str) -> Result<()> {
        crate::browser::fill_field(self.driver(), by, value).await
    }

    pub(crate) async fn js_click(&self, element: &WebElement) -> Result<()> {
        crate::browser::js_click(self.driver(), element).await
    }
}

pub(crate) fn enter_key() -> String {
    char::from(Key::Enter).to_string()
}

/// Translate a possibly negative position into a list index
fn resolve_index(len: usize, number: isize) -> Option<usize> {
    let wanted = number.unsigned_abs();
    let index = if number < 0 {
        len.checked_sub(wanted)?
    } else {
        number as usize
    };
    (index < len).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_index_counts_from_the_tail() {
        assert_eq!(resolve_index(5, -1), Some(4));
        assert_eq!(resolve_index(5, -5), Some(0));
        assert_eq!(resolve_index(5, 0), Some(0));
        assert_eq!(resolve_index(5, 3), Some(3));
    }

    #[test]
    fn test_resolve_index_rejects_out_of_range_positions() {
        assert_eq!(resolve_index(2, -3), None);
        assert_eq!(resolve_index(2, 2), None);
        assert_eq!(resolve_index(0, 0), None);
        assert_eq!(resolve_index(0, -1), None);
    }

    #[test]
    fn test_enter_key_is_the_webdriver_enter_codepoint() {
        assert_eq!(enter_key(), "\u{e007}");
    }
}
