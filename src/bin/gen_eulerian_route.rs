//! CLI: Eulerizes a graph description and prints the visited node sequence.

use std::process::ExitCode;

use clap::Parser;

use postman::core::error::PostmanError;
use postman::core::orchestrator;
use postman::io::{format, parser};

#[derive(Parser)]
#[command(name = "gen_eulerian_route")]
#[command(about = "Eulerizes a graph description and prints its visited node sequence")]
struct Cli {
    /// Start vertex id.
    #[arg(short = 's', long = "start")]
    start: Option<u64>,

    /// Goal vertex id.
    #[arg(short = 'g', long = "goal")]
    goal: Option<u64>,

    /// Graph description files.
    #[arg(required = true)]
    files: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let graph: Result<_, PostmanError> = parser::parse_and_merge(&cli.files);
    let graph = graph.map_err(|e| e.to_string())?;
    let solution = orchestrator::run(&graph, cli.start, cli.goal).map_err(|e| e.to_string())?;
    for line in format::format_route(&solution.route) {
        println!("{line}");
    }
    Ok(())
}
