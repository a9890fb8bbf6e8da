mod commands;
mod output;

use clap::{Parser, Subcommand};
use color_eyre::Result;

#[derive(Parser, Debug)]
#[command(
    name = "stagehand",
    version,
    about = "Run, validate, and plan declarative deployment pipelines"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a pipeline
    Run(commands::run::RunArgs),
    /// Validate a pipeline definition
    Validate(commands::validate::ValidateArgs),
    /// Show what a run would execute, without running anything
    Plan(commands::plan::PlanArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => commands::run::execute(args).await,
        Command::Validate(args) => commands::validate::execute(args),
        Command::Plan(args) => commands::plan::execute(args),
    }
}
