//! Readiness probe: block until the bot account shows up as online
//!
//! CI runs this between starting the bot container and launching the
//! suites. It logs in, searches the sidebar for the bot and watches the
//! conversation header until the presence badge leaves `offline`.

use futures_util::future::BoxFuture;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::browser::{fill_field, BrowserSession};
use crate::common::{ensure, BrowserConfig, Result};
use crate::harness::retry::POLL_INTERVAL;
use crate::harness::Harness;

use super::{conclude, race_interrupt};

pub const LABEL: &str = "wait until bot is online";

const MAGNIFIER_ICON: &str =
    ".rc-icon.sidebar__toolbar-button-icon.sidebar__toolbar-button-icon--magnifier";
const SEARCH_INPUT: &str = ".rc-input__element";
const SEARCH_RESULT: &str = ".sidebar-item.popup-item";
const PRESENCE_BADGE: &str = ".rc-header__visual-status";

#[derive(Debug)]
pub struct PresenceConfig {
    pub server_url: String,
    pub username: String,
    pub password: String,
    pub bot_name: String,
    /// Seconds to keep watching the presence badge
    pub wait_secs: u32,
    pub browser: BrowserConfig,
}

/// Browser-only context; the probe runs before any admin credentials
/// are worth verifying over REST.
pub struct PresenceContext {
    session: BrowserSession,
    config: PresenceConfig,
}

impl PresenceContext {
    pub async fn close(self) -> Result<()> {
        self.session.close().await
    }
}

pub async fn run_presence_suite(config: PresenceConfig) -> i32 {
    println!("Starting {}", LABEL);

    let mut harness = Harness::new(LABEL);
    harness.schedule("if_bot_is_online", if_bot_is_online);

    let session = match BrowserSession::open(&config.browser, &config.server_url).await {
        Ok(session) => session,
        Err(e) => {
            error!("browser connection failed: {}", e);
            println!("\nFailed to connect with browser.");
            return crate::harness::report::EXIT_FAILURE;
        }
    };

    let mut cx = PresenceContext { session, config };
    let outcome = race_interrupt(&harness, &mut cx).await;
    if let Err(e) = cx.close().await {
        warn!("browser teardown failed: {}", e);
    }
    conclude(outcome)
}

fn if_bot_is_online(cx: &mut PresenceContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let driver = cx.session.driver();

        fill_field(driver, By::Name("emailOrUsername"), &cx.config.username).await?;
        fill_field(driver, By::Name("pass"), &cx.config.password).await?;
        driver
            .find(By::Css(".rc-button.rc-button--primary.login"))
            .await?
            .click()
            .await?;

        let magnifiers = driver.find_all(By::Css(MAGNIFIER_ICON)).await?;
        ensure(!magnifiers.is_empty(), "the sidebar search button is missing")?;
        magnifiers[0].click().await?;

        fill_field(driver, By::Css(SEARCH_INPUT), &cx.config.bot_name).await?;

        let results = driver.find_all(By::Css(SEARCH_RESULT)).await?;
        ensure(
            !results.is_empty(),
            format!("the search turned up nothing for '{}'", cx.config.bot_name),
        )?;
        results[0].click().await?;

        let mut is_online = false;
        for _ in 0..cx.config.wait_secs {
            let badges = driver.find_all(By::Css(PRESENCE_BADGE)).await?;
            let Some(badge) = badges.first() else {
                sleep(POLL_INTERVAL).await;
                continue;
            };
            match badge.text().await {
                Ok(status) if status.to_lowercase() != "offline" => {
                    is_online = true;
                    break;
                }
                Ok(_) => sleep(POLL_INTERVAL).await,
                // The badge re-renders on status flips; re-query it
                Err(_) => continue,
            }
        }
        ensure(
            is_online,
            format!(
                "the bot '{}' stayed offline for {} seconds",
                cx.config.bot_name, cx.config.wait_secs
            ),
        )
    })
}
