//! First-boot provisioning: walk the setup wizard, then create the bot
//! account, its permissions and the rooms the other suites expect
//!
//! Runs once against a fresh server, before any other suite. The REST
//! client connects lazily in the last case because the admin account it
//! authenticates with is created by the wizard itself.

use futures_util::future::BoxFuture;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::api::ApiClient;
use crate::browser::{fill_field, js_click, BrowserSession};
use crate::common::{ensure, Error, Result, TestConfig};
use crate::harness::retry::POLL_INTERVAL;
use crate::harness::Harness;

use super::{conclude, race_interrupt};

pub const LABEL: &str = "setup wizard init";

const BOT_PASSWORD: &str = "pass";

const FORM_HEADER: &str = ".setup-wizard-forms__header-title";
const NEXT_BUTTON: &str = ".rc-button.rc-button--primary.setup-wizard-forms__footer-next";
const REGISTER_RADIO: &str = ".setup-wizard-forms__content-register-radio";
const FINAL_TITLE: &str = ".setup-wizard-info__content-title.setup-wizard-final__box-title";
const FINISH_BUTTON: &str = ".rc-button.rc-button--primary.js-finish";

const BOT_PERMISSIONS: [&str; 1] = ["view-full-other-user-info"];

const REQUIRED_GROUPS: [&str; 2] = ["hr", "leave-coordination"];

pub struct WizardContext {
    session: BrowserSession,
    config: TestConfig,
    wait_secs: u32,
}

impl WizardContext {
    pub async fn close(self) -> Result<()> {
        self.session.close().await
    }
}

pub async fn run_wizard_suite(config: TestConfig, wait_secs: u32) -> i32 {
    println!("Starting {}", LABEL);

    let mut harness = Harness::new(LABEL);
    harness.schedule("administrator_info", administrator_info);
    harness.schedule("organisation_info", organisation_info);
    harness.schedule("server_information", server_information);
    harness.schedule("server_registration", server_registration);
    harness.schedule("fin", fin);
    harness.schedule("creating_bot_account", creating_bot_account);
    harness.schedule("adding_permissions_to_bot", adding_permissions_to_bot);
    harness.schedule("create_necessary_rooms", create_necessary_rooms);

    let session = match BrowserSession::open(&config.browser, &config.server_url).await {
        Ok(session) => session,
        Err(e) => {
            error!("browser connection failed: {}", e);
            println!("\nFailed to connect with browser.");
            return crate::harness::report::EXIT_FAILURE;
        }
    };

    let mut cx = WizardContext {
        session,
        config,
        wait_secs,
    };
    let outcome = race_interrupt(&harness, &mut cx).await;
    if let Err(e) = cx.close().await {
        warn!("browser teardown failed: {}", e);
    }
    conclude(outcome)
}

/// Poll the given title element until it shows the expected step header
async fn wait_for_step(cx: &WizardContext, header: &str, selector: &str) -> Result<bool> {
    let driver = cx.session.driver();
    for _ in 0..cx.wait_secs {
        let titles = driver.find_all(By::Css(selector)).await?;
        let Some(title) = titles.first() else {
            sleep(POLL_INTERVAL).await;
            continue;
        };
        match title.text().await {
            Ok(text) if text.to_lowercase() == header => return Ok(true),
            Ok(_) => sleep(POLL_INTERVAL).await,
            Err(_) => continue,
        }
    }
    Ok(false)
}

async fn click_next(driver: &WebDriver) -> Result<()> {
    let buttons = driver.find_all(By::Css(NEXT_BUTTON)).await?;
    ensure(!buttons.is_empty(), "the wizard next button is missing")?;
    buttons[0].click().await?;
    Ok(())
}

fn administrator_info(cx: &mut WizardContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let driver = cx.session.driver();

        let headers = driver.find_all(By::Css(FORM_HEADER)).await?;
        ensure(!headers.is_empty(), "the setup wizard header is missing")?;
        let title = headers[0].text().await?;
        ensure(
            "admin info".contains(&title.to_lowercase()),
            format!("unexpected wizard step '{}'", title),
        )?;

        let admin = &cx.config.admin_username;
        fill_field(driver, By::Name("registration-name"), admin).await?;
        fill_field(driver, By::Name("registration-username"), admin).await?;
        fill_field(
            driver,
            By::Name("registration-email"),
            &format!("{}@mail.ru", admin),
        )
        .await?;
        fill_field(driver, By::Name("registration-pass"), &cx.config.admin_password).await?;

        click_next(driver).await
    })
}

fn organisation_info(cx: &mut WizardContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        ensure(
            wait_for_step(cx, "organization info", FORM_HEADER).await?,
            "the wizard never reached the organization info step",
        )?;
        click_next(cx.session.driver()).await
    })
}

fn server_information(cx: &mut WizardContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        ensure(
            wait_for_step(cx, "server info", FORM_HEADER).await?,
            "the wizard never reached the server info step",
        )?;
        click_next(cx.session.driver()).await
    })
}

fn server_registration(cx: &mut WizardContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        ensure(
            wait_for_step(cx, "register server", FORM_HEADER).await?,
            "the wizard never reached the register server step",
        )?;

        let driver = cx.session.driver();

        // The last radio keeps the server standalone
        let plans = driver.find_all(By::Css(REGISTER_RADIO)).await?;
        let Some(standalone) = plans.last() else {
            return Err(Error::assertion("the registration choices are missing"));
        };
        standalone.click().await?;

        click_next(driver).await
    })
}

fn fin(cx: &mut WizardContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        ensure(
            wait_for_step(cx, "your workspace is ready to use 🎉", FINAL_TITLE).await?,
            "the wizard never reported the workspace as ready",
        )?;

        let driver = cx.session.driver();
        let buttons = driver.find_all(By::Css(FINISH_BUTTON)).await?;
        ensure(!buttons.is_empty(), "the wizard finish button is missing")?;
        buttons[0].click().await?;
        Ok(())
    })
}

fn creating_bot_account(cx: &mut WizardContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let driver = cx.session.driver();
        let bot_name = cx.config.bot_name.as_str();

        let toolbar = driver
            .find_all(By::Css(
                ".sidebar__toolbar-button.rc-tooltip.rc-tooltip--down.js-button",
            ))
            .await?;
        let Some(options_button) = toolbar.last() else {
            return Err(Error::assertion("the sidebar toolbar is missing"));
        };
        options_button.click().await?;

        driver
            .find(By::Css(".rc-popover__item-text"))
            .await?
            .click()
            .await?;

        let users_links = driver
            .find_all(By::Css(r#"a.sidebar-item__link[aria-label="Users"]"#))
            .await?;
        ensure(!users_links.is_empty(), "the Users pane is missing")?;
        js_click(driver, &users_links[0]).await?;

        driver
            .find(By::Css(r#"button[aria-label="Add User"]"#))
            .await?
            .click()
            .await?;

        fill_field(driver, By::Css("input#name"), bot_name).await?;
        fill_field(driver, By::Css("input#username"), bot_name).await?;
        fill_field(
            driver,
            By::Css("input#email"),
            &format!("{}@mail.ru", bot_name),
        )
        .await?;

        let switches = driver.find_all(By::Css("label.rc-switch__label")).await?;
        ensure(!switches.is_empty(), "the verified switch is missing")?;
        switches[0].click().await?;

        fill_field(driver, By::Css("input#password"), BOT_PASSWORD).await?;

        let switches = driver.find_all(By::Css("label.rc-switch__label")).await?;
        let Some(random_password_switch) = switches.last() else {
            return Err(Error::assertion("the password switch is missing"));
        };
        random_password_switch.click().await?;

        driver
            .find(By::Css(r#"option[value="bot"]"#))
            .await?
            .click()
            .await?;
        driver.find(By::Css("button#addRole")).await?.click().await?;

        // Do not send the welcome email
        driver
            .find(By::Css(r#"label[for="sendWelcomeEmail"]"#))
            .await?
            .click()
            .await?;

        driver
            .find(By::Css(".rc-button.rc-button--primary.save"))
            .await?
            .click()
            .await?;
        Ok(())
    })
}

fn adding_permissions_to_bot(cx: &mut WizardContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let driver = cx.session.driver();

        let permission_links = driver
            .find_all(By::Css(r#"a.sidebar-item__link[aria-label="Permissions"]"#))
            .await?;
        ensure(
            !permission_links.is_empty(),
            "the Permissions pane is missing",
        )?;
        js_click(driver, &permission_links[0]).await?;

        for name in BOT_PERMISSIONS {
            let selector = format!(r#"input.role-permission[name="perm[bot][{}]"]"#, name);
            let checkbox = driver.find(By::Css(&selector)).await?;
            if checkbox.attr("checked").await?.is_none() {
                checkbox.click().await?;
            }
        }

        driver
            .find(By::Css(".sidebar-flex__close-button"))
            .await?
            .click()
            .await?;
        Ok(())
    })
}

fn create_necessary_rooms(cx: &mut WizardContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let api = ApiClient::connect(
            &cx.config.server_url,
            &cx.config.admin_username,
            &cx.config.admin_password,
        )
        .await?;

        for name in REQUIRED_GROUPS {
            api.create_group(name, &[&cx.config.bot_name]).await?;
        }
        Ok(())
    })
}
