pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::filter::FilterArgs;
use commands::replay::ReplayArgs;

#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Storefront filter engine CLI",
    long_about = "Extract shopping filters from agent speech, decode filter packets, filter the catalog, and replay recorded sessions.",
    after_help = "Examples:\n  storefront extract \"Here are some cameras under 5000 rupees.\"\n  storefront filter --category smart-home --sort price_asc\n  storefront replay session.jsonl\n  storefront doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run the free-text extractor over one agent message")]
    Extract {
        #[arg(help = "Agent message text")]
        text: String,
    },
    #[command(about = "Filter the catalog with explicit values and print visible products")]
    Filter(FilterArgs),
    #[command(about = "Decode a [FILTER:...] packet into a complete filter state")]
    Packet {
        #[arg(help = "Raw data-channel message")]
        payload: String,
    },
    #[command(about = "Feed a JSON-lines event file through a filter session")]
    Replay(ReplayArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, catalog availability, and the extractor")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Extract { text } => commands::extract::run(&text),
        Command::Filter(args) => commands::filter::run(args),
        Command::Packet { payload } => commands::packet::run(&payload),
        Command::Replay(args) => commands::replay::run(args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
