//! End-to-end checks for the vote-or-die poll bot
//!
//! Unlike the other suites this one tolerates a missing host and falls
//! back to the local compose setup, so CI can invoke it with creds only.

use clap::Parser;

use chatops_e2e::common::{logging, TestConfig};
use chatops_e2e::scenarios::{self, poll, DEFAULT_HOST};

#[derive(Parser)]
#[command(name = "vote-or-die-tests", about = "End-to-end checks for the vote-or-die poll bot")]
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

    /// Comma-separated rooms that must survive cleanup
    #[arg(long)]
    rooms: Option<String>,

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

    let mut config = TestConfig::new(host, cli.username, cli.password);
    if let Some(rooms) = &cli.rooms {
        config.set_expected_rooms(rooms);
    }
    config.browser.webdriver_url = cli.webdriver_url;
    config.browser.headless = cli.headless;

    let code = scenarios::run_suite(poll::LABEL, config, poll::OPTIONS, poll::schedule).await;
    std::process::exit(code);
}
