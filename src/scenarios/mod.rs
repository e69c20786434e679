//! The scenario suites and their shared runner
//!
//! Every suite binary funnels through [`run_suite`]: print the suite name,
//! connect the REST client and the browser, seed the fixture cases every
//! suite needs, run the schedule and map the outcome to a process exit
//! code. Connection failures never reach the harness; they print their own
//! line and exit with `1`.

pub mod birthday;
pub mod general;
pub mod leave;
pub mod poll;
pub mod presence;
pub mod pug;
pub mod wizard;

use futures_util::future::BoxFuture;
use tracing::{error, warn};

use crate::api::ApiClient;
use crate::browser::BrowserSession;
use crate::chat::ChatContext;
use crate::common::{Error, Result, TestConfig};
use crate::harness::report::{RunReport, EXIT_FAILURE, EXIT_INTERRUPTED};
use crate::harness::Harness;

/// Host the CI compose file publishes the chat server on
pub const DEFAULT_HOST: &str = "http://127.0.0.1:8006";

/// Command-line arguments shared by the scenario suite binaries
#[derive(Debug, clap::Args)]
pub struct ScenarioArgs {
    /// Domain or IP of the Rocket.Chat host
    #[arg(short = 'a', long)]
    pub host: String,

    /// Admin username
    #[arg(short, long)]
    pub username: String,

    /// Admin password
    #[arg(short, long)]
    pub password: String,

    /// Comma-separated rooms that must survive cleanup
    #[arg(long)]
    pub rooms: Option<String>,

    /// Use a running WebDriver server instead of spawning chromedriver
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Run the browser headless
    #[arg(long)]
    pub headless: bool,
}

impl ScenarioArgs {
    pub fn into_config(self) -> TestConfig {
        let mut config = TestConfig::new(self.host, self.username, self.password);
        if let Some(rooms) = &self.rooms {
            config.set_expected_rooms(rooms);
        }
        config.browser.webdriver_url = self.webdriver_url;
        config.browser.headless = self.headless;
        config
    }
}

/// Per-suite knobs for the shared runner
#[derive(Debug, Clone, Copy)]
pub struct SuiteOptions {
    /// Register the disposable test account before the cases run
    pub create_test_user: bool,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            create_test_user: true,
        }
    }
}

/// Run one suite against the server and return the process exit code
pub async fn run_suite(
    label: &str,
    config: TestConfig,
    options: SuiteOptions,
    schedule: fn(&mut Harness<ChatContext>),
) -> i32 {
    println!("Starting {}", label);

    let mut harness = Harness::new(label);
    harness.schedule_pre("login", login_case);
    harness.schedule_pre("check_version", check_version_case);
    if options.create_test_user {
        harness.schedule_pre("create_test_user", create_test_user_case);
        harness.schedule_post("remove_test_user", remove_test_user_case);
    }
    schedule(&mut harness);

    let api = match ApiClient::connect(
        &config.server_url,
        &config.admin_username,
        &config.admin_password,
    )
    .await
    {
        Ok(api) => api,
        Err(Error::ApiLoginFailed { .. }) => {
            println!("Rocket.Chat auth error. Incorrect username or password.");
            return EXIT_FAILURE;
        }
        Err(e) => {
            error!("API connection failed: {}", e);
            println!("Could not connect to Rocket.Chat API.");
            return EXIT_FAILURE;
        }
    };

    let session = match BrowserSession::open(&config.browser, &config.server_url).await {
        Ok(session) => session,
        Err(e) => {
            error!("browser connection failed: {}", e);
            println!("\nFailed to connect with browser.");
            return EXIT_FAILURE;
        }
    };

    let mut cx = ChatContext::new(session, api, config);
    let outcome = race_interrupt(&harness, &mut cx).await;
    if let Err(e) = cx.close().await {
        warn!("browser teardown failed: {}", e);
    }
    conclude(outcome)
}

/// Run the harness unless Ctrl-C lands first
pub(crate) async fn race_interrupt<C>(
    harness: &Harness<C>,
    cx: &mut C,
) -> Option<Result<RunReport>> {
    tokio::select! {
        result = harness.run(cx) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    }
}

/// Map a finished (or interrupted) run to the process exit code
pub(crate) fn conclude(outcome: Option<Result<RunReport>>) -> i32 {
    match outcome {
        None => {
            println!("\nThe process was stopped by pressing Ctrl+C.");
            EXIT_INTERRUPTED
        }
        Some(Ok(run_report)) => run_report.exit_code(),
        Some(Err(e)) => {
            println!("{}", run_failure_message(&e));
            EXIT_FAILURE
        }
    }
}

fn run_failure_message(e: &Error) -> String {
    match e {
        Error::WebDriver(_) => {
            "\nThe process was stopped because the web driver exception has occurred.".to_string()
        }
        Error::Http(_) => "\nThe internet connection was lost".to_string(),
        Error::ApiLoginFailed { message, .. } | Error::ApiRequestFailed { message, .. } => {
            format!("\nAPIError: {}", message)
        }
        other => format!("\n{}", other),
    }
}

fn login_case(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move { cx.login(false).await })
}

fn check_version_case(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move { cx.check_version().await })
}

fn create_test_user_case(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move { cx.create_test_user().await })
}

fn remove_test_user_case(cx: &mut ChatContext) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move { cx.remove_test_user().await })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_failure_messages_name_the_phase() {
        let api_error = Error::api_request_failed("users.list", "totally broken");
        assert_eq!(
            run_failure_message(&api_error),
            "\nAPIError: totally broken"
        );

        let other = Error::Config("bad flag".to_string());
        assert_eq!(
            run_failure_message(&other),
            "\nConfiguration error: bad flag"
        );
    }

    #[test]
    fn test_conclude_maps_outcomes_to_exit_codes() {
        assert_eq!(conclude(None), EXIT_INTERRUPTED);

        let clean = RunReport::new(2);
        assert_eq!(conclude(Some(Ok(clean))), 0);

        let mut failed = RunReport::new(2);
        failed.failed = 1;
        assert_eq!(conclude(Some(Ok(failed))), EXIT_FAILURE);

        let aborted = Error::Config("no display".to_string());
        assert_eq!(conclude(Some(Err(aborted))), EXIT_FAILURE);
    }
}
