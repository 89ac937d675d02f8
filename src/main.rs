use anyhow::Context;
use clap::Parser;
use cleanfiles::commands::{self, RunOutcome};
use cleanfiles::config::Cli;
use cleanfiles::executor::LinePrompter;
use cleanfiles::Config;
use std::process::ExitCode;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    // Logs go to stderr; stdout carries the prompts and reports
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already set");
    }

    match try_main(cli) {
        Ok(RunOutcome::Completed) => ExitCode::SUCCESS,
        Ok(RunOutcome::Aborted { .. }) => ExitCode::from(2),
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: Cli) -> anyhow::Result<RunOutcome> {
    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli).context("invalid configuration")?;

    let mut prompter = LinePrompter::stdio();
    let report = commands::run(&config, &mut prompter)?;
    Ok(report.outcome)
}
