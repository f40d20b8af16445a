//! CLI: Eulerizes a graph description and prints a full route comparison
//! report — node/edge counts, optional start/goal, total cost, and an
//! example route rendering.

use std::process::ExitCode;

use clap::Parser;

use postman::core::error::PostmanError;
use postman::core::orchestrator;
use postman::io::{format, parser};

#[derive(Parser)]
#[command(name = "routecomp")]
#[command(about = "Reports an Eulerized graph's route and edge-cost summary")]
struct Cli {
    /// Start vertex id.
    #[arg(short = 's', long = "start")]
    start: Option<u64>,

    /// Goal vertex id.
    #[arg(short = 'g', long = "goal")]
    goal: Option<u64>,

    /// Also print the full Eulerized edge list.
    #[arg(long = "show_edge")]
    show_edge: bool,

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

    let mut nodes: Vec<u64> = graph.graph().vertices().collect();
    nodes.sort_unstable();
    println!("nodes: {}", nodes.len());
    println!("edges: {}", graph.graph().edge_count());
    println!(
        "node list: {}",
        nodes
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );

    if let Some(start) = cli.start {
        println!("start: {start}");
    }
    if let Some(goal) = cli.goal {
        println!("goal: {goal}");
    }

    let solution = orchestrator::run(&graph, cli.start, cli.goal).map_err(|e| e.to_string())?;

    println!("final edge count: {}", solution.eulerized.graph().edge_count());
    println!("total cost: {}", solution.eulerized.get_total_cost());

    if cli.show_edge {
        for line in format::format_edge_list(&solution.eulerized) {
            println!("{line}");
        }
    }

    println!("example route:");
    for line in format::format_route_with_separators(&solution.route) {
        println!("{line}");
    }
    Ok(())
}
