//! Block until the bot account reports online
//!
//! CI runs this after `docker-compose up` so the suites never race the
//! bot container's startup.

use clap::Parser;

use chatops_e2e::common::{logging, BrowserConfig};
use chatops_e2e::scenarios::presence::{run_presence_suite, PresenceConfig};
use chatops_e2e::scenarios::DEFAULT_HOST;

const DEFAULT_WAIT_SECS: u32 = 120;
const DEFAULT_BOT_NAME: &str = "meeseeks";

#[derive(Parser)]
#[command(name = "wait-for-bot", about = "Block until the bot account reports online")]
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

    /// Seconds to keep watching the presence badge
    #[arg(short, long)]
    wait: Option<u32>,

    /// Bot account to watch
    #[arg(short, long)]
    bot: Option<String>,

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
    let bot_name = cli.bot.unwrap_or_else(|| {
        eprintln!(
            "Bot name is not specified. Defaults to {}.",
            DEFAULT_BOT_NAME
        );
        DEFAULT_BOT_NAME.to_string()
    });

    let browser = BrowserConfig {
        webdriver_url: cli.webdriver_url,
        headless: cli.headless,
        ..BrowserConfig::default()
    };

    let config = PresenceConfig {
        server_url: host,
        username: cli.username,
        password: cli.password,
        bot_name,
        wait_secs,
        browser,
    };

    let code = run_presence_suite(config).await;
    std::process::exit(code);
}
