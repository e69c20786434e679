//! End-to-end checks for the happy-birthder bot script

use clap::Parser;

use chatops_e2e::common::logging;
use chatops_e2e::scenarios::{self, birthday, ScenarioArgs};

#[derive(Parser)]
#[command(
    name = "happy-birthder-tests",
    about = "End-to-end checks for the happy-birthder bot script"
)]
struct Cli {
    #[command(flatten)]
    args: ScenarioArgs,
}

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();
    let config = cli.args.into_config();

    let code = scenarios::run_suite(birthday::LABEL, config, birthday::OPTIONS, birthday::schedule).await;
    std::process::exit(code);
}
