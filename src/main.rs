use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The command to execute
    #[command(subcommand)]
    command: LiquidCommand,
}

#[derive(Parser)]
struct RenderArgs {
    /// Documents to render
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// The path to the configuration file (defaults to undox-liquid.yaml if present)
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Variables files (.yaml, .yml or .json), merged after those in the config
    #[arg(long = "vars", value_name = "FILE")]
    vars: Vec<PathBuf>,

    /// Directory to write rendered documents to (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Evaluate tags inside fenced code blocks
    #[arg(long, default_value = "false")]
    conditions_in_code: bool,
}

#[derive(Parser)]
struct CheckArgs {
    /// Documents to check
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// The path to the configuration file (defaults to undox-liquid.yaml if present)
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum LiquidCommand {
    /// Render documents, resolving template tags
    Render(RenderArgs),

    /// Check documents for tag errors without rendering them
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    logging::init(args.verbose);

    match args.command {
        LiquidCommand::Render(args) => {
            commands::render::run(&args).await?;
        }
        LiquidCommand::Check(args) => {
            commands::check::run(&args).await?;
        }
    }

    Ok(())
}
