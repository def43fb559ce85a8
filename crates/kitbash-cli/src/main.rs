//! Kitbash command line
//!
//! Loads a blueprint catalog and prints costs or raw resource totals.

mod commands;

use clap::{Parser, Subcommand};
use commands::CliError;
use kitbash_core::grade::Grade;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Kitbash - resolve crafting blueprints into raw resources
#[derive(Parser, Debug)]
#[command(name = "kitbash")]
#[command(about = "Resolve crafting blueprints into mind, time and raw resource totals")]
struct Args {
    /// Catalog directory holding resources.* and blueprints.*
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Deepest tree level a traversal may reach (overrides settings.*)
    #[arg(long)]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List blueprints and the grades they define
    List,
    /// Print total mind and time of a blueprint grade
    Cost {
        blueprint: String,
        #[arg(long)]
        grade: Grade,
    },
    /// Print the raw resources a blueprint grade consumes
    Collapse {
        blueprint: String,
        #[arg(long)]
        grade: Grade,
        /// Units to build
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        /// Emit a JSON object instead of text lines
        #[arg(long)]
        json: bool,
    },
}

fn run(args: &Args) -> Result<String, CliError> {
    let mut catalog = kitbash_data::load_catalog(&args.data)?;
    if let Some(max_depth) = args.max_depth {
        catalog.set_max_depth(max_depth);
    }
    tracing::info!(
        dir = %args.data.display(),
        blueprints = catalog.blueprint_names().len(),
        "catalog ready"
    );

    match &args.command {
        Command::List => Ok(commands::list(&catalog)),
        Command::Cost { blueprint, grade } => commands::cost(&catalog, blueprint, *grade),
        Command::Collapse {
            blueprint,
            grade,
            quantity,
            json,
        } => commands::collapse(&catalog, blueprint, *grade, *quantity, *json),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
