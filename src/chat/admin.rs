//! Admin-panel flows
//!
//! The sidebar option menu opens Administration; everything here clicks
//! through the panes under it.

use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::debug;

use crate::common::{ensure, Error, Result, TestUser};
use crate::harness::retry::POLL_INTERVAL;

use super::ui::enter_key;
use super::ChatContext;

/// Server release the suites are written against
pub const RC_VERSION: &str = "0.70";

// The info pane renders its table well after the route switches
const VERSION_ATTEMPTS: u32 = 60;

impl ChatContext {
    /// Require the server to be the Rocket.Chat release the suites target
    pub async fn check_version(&self) -> Result<()> {
        self.open_admin_panel().await?;

        let info_links = self
            .driver()
            .find_all(By::Css("a.sidebar-item__link[aria-label='Info']"))
            .await?;
        ensure(!info_links.is_empty(), "the admin sidebar has no Info entry")?;
        self.js_click(&info_links[0]).await?;

        let version = self.read_version_with_retries(VERSION_ATTEMPTS).await?;
        ensure(!version.is_empty(), "the info pane never showed a version")?;
        ensure(
            version == RC_VERSION,
            format!("expected Rocket.Chat {}, found {}", RC_VERSION, version),
        )?;

        self.close_admin_panel().await
    }

    /// Create an account through Administration → Users
    pub async fn create_user_via_admin(&self, user: &TestUser) -> Result<()> {
        debug!("creating user '{}' through the admin panel", user.username);
        self.open_admin_panel().await?;

        let users_links = self
            .driver()
            .find_all(By::Css("a.sidebar-item__link[aria-label='Users']"))
            .await?;
        ensure(!users_links.is_empty(), "the admin sidebar has no Users entry")?;
        self.js_click(&users_links[0]).await?;

        let add_buttons = self
            .driver()
            .find_all(By::Css("button[aria-label='Add User']"))
            .await?;
        ensure(!add_buttons.is_empty(), "the Add User button is missing")?;
        add_buttons[0].click().await?;

        self.fill(By::Css("input#name"), &user.full_name).await?;
        self.fill(By::Css("input#username"), &user.username).await?;
        self.fill(By::Css("input#email"), &user.email).await?;

        // Mark the address verified so no confirmation mail goes out
        let switches = self
            .driver()
            .find_all(By::Css("label.rc-switch__label"))
            .await?;
        ensure(!switches.is_empty(), "the user form has no switches")?;
        switches[0].click().await?;

        self.fill(By::Css("input#password"), &user.password).await?;

        let welcome_boxes = self
            .driver()
            .find_all(By::Css("label[for='sendWelcomeEmail']"))
            .await?;
        ensure(
            !welcome_boxes.is_empty(),
            "the welcome email checkbox is missing",
        )?;
        welcome_boxes[0].click().await?;

        let save_buttons = self
            .driver()
            .find_all(By::Css(".rc-button.rc-button--primary.save"))
            .await?;
        ensure(!save_buttons.is_empty(), "the save button is missing")?;
        save_buttons[0].click().await?;

        self.close_admin_panel().await
    }

    /// Create a public channel from the sidebar plus menu
    pub async fn create_channel(&self, name: &str) -> Result<()> {
        debug!("creating channel '{}'", name);
        let plus_buttons = self
            .driver()
            .find_all(By::Css(
                ".rc-icon.sidebar__toolbar-button-icon.sidebar__toolbar-button-icon--plus",
            ))
            .await?;
        ensure(
            !plus_buttons.is_empty(),
            "the create-channel button is missing",
        )?;
        plus_buttons[0].click().await?;

        let inputs = self
            .driver()
            .find_all(By::Css(".rc-input__element"))
            .await?;
        ensure(!inputs.is_empty(), "the channel name input is missing")?;
        inputs[0].clear().await?;
        inputs[0].send_keys(name).await?;
        inputs[0].send_keys(enter_key()).await?;
        Ok(())
    }

    /// Open the admin panel through the sidebar option menu
    pub(crate) async fn open_admin_panel(&self) -> Result<()> {
        let options = self
            .driver()
            .find_all(By::Css(
                ".sidebar__toolbar-button.rc-tooltip.rc-tooltip--down.js-button",
            ))
            .await?;
        let Some(options_btn) = options.last() else {
            return Err(Error::assertion("the sidebar toolbar is missing"));
        };
        options_btn.click().await?;

        let entries = self
            .driver()
            .find_all(By::Css(".rc-popover__item-text"))
            .await?;
        ensure(!entries.is_empty(), "the option menu is empty")?;
        entries[0].click().await?;
        Ok(())
    }

    pub(crate) async fn close_admin_panel(&self) -> Result<()> {
        let close_buttons = self
            .driver()
            .find_all(By::Css("button[data-action='close']"))
            .await?;
        ensure(
            !close_buttons.is_empty(),
            "the admin panel close button is missing",
        )?;
        close_buttons[0].click().await?;
        Ok(())
    }

    async fn read_version_with_retries(&self, attempts: u32) -> Result<String> {
        for _ in 0..attempts {
            let rows = self.driver().find_all(By::Css(".admin-table-row")).await?;
            ensure(!rows.is_empty(), "the info pane has no rows")?;

            // The row reads "Version 0.70.4" once fully rendered
            let row_text = rows[0].text().await?;
            if let Some(version) = major_minor(&row_text) {
                return Ok(version);
            }
            sleep(POLL_INTERVAL).await;
        }
        Ok(String::new())
    }
}

fn major_minor(row_text: &str) -> Option<String> {
    let full = row_text.split_whitespace().nth(1)?;
    Some(full.split('.').take(2).collect::<Vec<_>>().join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_minor_trims_the_patch_level() {
        assert_eq!(major_minor("Version 0.70.4").as_deref(), Some("0.70"));
        assert_eq!(major_minor("Version 1.0").as_deref(), Some("1.0"));
        assert_eq!(major_minor("Version 1").as_deref(), Some("1"));
    }

    #[test]
    fn test_major_minor_rejects_half_rendered_rows() {
        assert_eq!(major_minor("Version"), None);
        assert_eq!(major_minor(""), None);
        assert_eq!(major_minor("   "), None);
    }
}
