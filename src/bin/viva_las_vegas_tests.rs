//! End-to-end checks for the viva-las-vegas leave bot

use clap::Parser;

use chatops_e2e::common::logging;
use chatops_e2e::scenarios::{self, leave, ScenarioArgs};

#[derive(Parser)]
#[command(
    name = "viva-las-vegas-tests",
    about = "End-to-end checks for the viva-las-vegas leave bot"
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

    let code = scenarios::run_suite(leave::LABEL, config, leave::OPTIONS, leave::schedule).await;
    std::process::exit(code);
}
