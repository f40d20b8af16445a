//! CLI: Eulerizes one or more graph description files and prints the
//! resulting edge list and alias pairs.

use std::process::ExitCode;

use clap::Parser;

use postman::core::orchestrator;
use postman::io::{format, parser};

#[derive(Parser)]
#[command(name = "gen_eulerian_graph")]
#[command(about = "Eulerizes a graph description and prints its edge list")]
struct Cli {
    /// Start vertex name.
    #[arg(short = 's', long = "start")]
    start: Option<String>,

    /// Goal vertex name.
    #[arg(short = 'g', long = "goal")]
    goal: Option<String>,

    /// List file of data-file paths, one per line.
    #[arg(short = 'l', long = "list")]
    list: Option<String>,

    /// Graph description files.
    #[arg(required = false)]
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
    let paths = collect_paths(&cli.list, &cli.files).map_err(|e| e.to_string())?;
    let graph = parser::parse_and_merge(&paths).map_err(|e| e.to_string())?;

    let (start_id, goal_id) = resolve_endpoints(&cli.start, &cli.goal)?;
    let solution = orchestrator::run(&graph, start_id, goal_id).map_err(|e| e.to_string())?;

    for line in format::format_edge_list(&solution.eulerized) {
        println!("{line}");
    }
    for line in format::format_alias_pairs(&solution.eulerized) {
        println!("{line}");
    }
    Ok(())
}

fn collect_paths(list: &Option<String>, files: &[String]) -> Result<Vec<String>, postman::core::error::PostmanError> {
    let mut paths = files.to_vec();
    if let Some(list_path) = list {
        let mut listed = parser::parse_list_file(std::path::Path::new(list_path))?;
        paths.append(&mut listed);
    }
    Ok(paths)
}

/// Vertex names are only meaningful inside the file(s) they were parsed
/// from; this binary accepts them as literal integer real-vertex ids since
/// the parser assigns ids in first-seen order and that is the only stable
/// external handle to a vertex once parsing has finished.
fn resolve_endpoints(
    start: &Option<String>,
    goal: &Option<String>,
) -> Result<(Option<u64>, Option<u64>), String> {
    let parse_one = |s: &str| -> Result<u64, String> {
        s.parse::<u64>()
            .map_err(|_| format!("-s/-g expects a vertex id, got {s:?}"))
    };
    let start_id = start.as_deref().map(parse_one).transpose()?;
    let goal_id = goal.as_deref().map(parse_one).transpose()?;
    Ok((start_id, goal_id))
}
