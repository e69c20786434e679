//! End-to-end checks for core Rocket.Chat features

use clap::Parser;

use chatops_e2e::common::logging;
use chatops_e2e::scenarios::{self, general, ScenarioArgs};

#[derive(Parser)]
#[command(name = "rc-tests", about = "End-to-end checks for core Rocket.Chat features")]
struct Cli {
    #[command(flatten)]
    args: ScenarioArgs,
}

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();
    let config = cli.args.into_config();

    let code = scenarios::run_suite(general::LABEL, config, general::OPTIONS, general::schedule).await;
    std::process::exit(code);
}
