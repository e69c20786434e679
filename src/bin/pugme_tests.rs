//! End-to-end checks for the pugme bot script

use clap::Parser;

use chatops_e2e::common::logging;
use chatops_e2e::scenarios::{self, pug, ScenarioArgs};

#[derive(Parser)]
#[command(name = "pugme-tests", about = "End-to-end checks for the pugme bot script")]
struct Cli {
    #[command(flatten)]
    args: ScenarioArgs,
}

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();
    let config = cli.args.into_config();

    let code = scenarios::run_suite(pug::LABEL, config, pug::OPTIONS, pug::schedule).await;
    std::process::exit(code);
}
