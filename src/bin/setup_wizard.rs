//! Walk the first-boot setup wizard and provision the bot account

use clap::Parser;

use chatops_e2e::common::{logging, TestConfig};
use chatops_e2e::scenarios::wizard::run_wizard_suite;
use chatops_e2e::scenarios::DEFAULT_HOST;

const DEFAULT_WAIT_SECS: u32 = 100;

#[derive(Parser)]
#[command(
    name = "setup-wizard",
    about = "Walk the first-boot setup wizard and provision the bot account"
)]
struct Cli {
    /// Domain or IP of the Rocket.Chat host
    #[arg(short = 'a', long)]
    host: Option<String>,

    /// Admin username
    #[arg(short, long)]
    username: String,

    /// Admin password
    #[arg(short, long)]
    password: String,

    /// Seconds to wait for each wizard page to load
    #[arg(short, long)]
    wait: Option<u32>,

    /// Use a running WebDriver server instead of spawning chromedriver
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Run the browser headless
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();

    let host = cli.host.unwrap_or_else(|| {
        eprintln!("Host is not specified. Defaults to {}.", DEFAULT_HOST);
        DEFAULT_HOST.to_string()
    });
    let wait_secs = cli.wait.unwrap_or_else(|| {
        eprintln!(
            "Waiting time is not specified. Defaults to {}.",
            DEFAULT_WAIT_SECS
        );
        DEFAULT_WAIT_SECS
    });

    let mut config = TestConfig::new(host, cli.username, cli.password);
    config.browser.webdriver_url = cli.webdriver_url;
    config.browser.headless = cli.headless;

    let code = run_wizard_suite(config, wait_secs).await;
    std::process::exit(code);
}
