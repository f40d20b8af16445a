/*!
# Orchestrator

Composes the full pipeline: optional start/goal bridge insertion,
Eulerization, and Hierholzer trail construction, returning both the
Eulerized graph (for `gen_eulerian_graph`) and the visited node sequence
(for `gen_eulerian_route` / `routecomp`).
*/

use crate::core::alias_graph::AliasGraph;
use crate::core::edge::Edge;
use crate::core::error::PostmanError;
use crate::core::euler_trail;
use crate::core::eulerization;

/// The two artifacts every CLI binary ultimately needs: the Eulerized graph
/// and the node sequence of its trail.
pub struct Solution {
    pub eulerized: AliasGraph,
    pub route: Vec<u64>,
}

/// Runs the pipeline over `input`. If `start` and `goal` are both given and
/// distinct, a bridge edge is inserted before Eulerization and the resulting
/// circuit is rotated into an open trail from `start` to `goal` afterward.
pub fn run(
    input: &AliasGraph,
    start: Option<u64>,
    goal: Option<u64>,
) -> Result<Solution, PostmanError> {
    if !input.is_connected() {
        return Err(PostmanError::disconnected(
            "input graph must be connected before Eulerization",
        ));
    }

    match (start, goal) {
        (Some(s), Some(g)) if s != g => run_with_bridge(input, s, g),
        (Some(s), _) | (_, Some(s)) => {
            let eulerized = eulerization::eulerize(input)?;
            let circuit = euler_trail::build_circuit(&eulerized)?;
            let route = rotate_to_start(&circuit, eulerized.get_alias_node(s));
            Ok(Solution { eulerized, route })
        }
        (None, None) => {
            let eulerized = eulerization::eulerize(input)?;
            let route = euler_trail::build_circuit(&eulerized)?;
            Ok(Solution { eulerized, route })
        }
    }
}

fn run_with_bridge(input: &AliasGraph, start: u64, goal: u64) -> Result<Solution, PostmanError> {
    let bridge_weight = input.get_total_cost().scale_by(5);
    let mut bridged = input.copy();
    let bridge_edge = Edge::new(start, goal, bridge_weight)
        .expect("bridge weight is 5x a positive total and therefore positive");
    bridged.add_edge(bridge_edge);

    let eulerized_with_bridge = eulerization::eulerize(&bridged)?;
    let circuit = euler_trail::build_circuit(&eulerized_with_bridge)?;

    let start_alias = eulerized_with_bridge.get_alias_node(start);
    let goal_alias = eulerized_with_bridge.get_alias_node(goal);
    let route = euler_trail::rotate_to_bridge(&circuit, start_alias, goal_alias)?;

    let mut eulerized = eulerized_with_bridge;
    eulerized.remove_edge(&bridge_edge);

    Ok(Solution { eulerized, route })
}

/// Rotates a closed circuit (first == last) so it begins at `alias`,
/// preserving direction and still ending with `alias`.
fn rotate_to_start(circuit: &[u64], alias: u64) -> Vec<u64> {
    let Some(pos) = circuit.iter().position(|&v| v == alias) else {
        return circuit.to_vec();
    };
    if pos == 0 {
        return circuit.to_vec();
    }
    let body = &circuit[..circuit.len() - 1];
    let mut rotated: Vec<u64> = body[pos..].to_vec();
    rotated.extend_from_slice(&body[..pos]);
    rotated.push(rotated[0]);
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(u: u64, v: u64, w: &str) -> Edge {
        Edge::new(u, v, w.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_no_start_goal_returns_closed_circuit() {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.add_edge(edge(1, 2, "1"));
        g.add_edge(edge(2, 0, "1"));

        let solution = run(&g, None, None).unwrap();
        assert_eq!(solution.route.first(), solution.route.last());
    }

    /// Square with start=0, goal=2: bridge forces a duplicated path,
    /// and the final trail must start at 0 and end at 2.
    #[test]
    fn test_start_goal_bridge_square() {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.add_edge(edge(1, 2, "1"));
        g.add_edge(edge(2, 3, "1"));
        g.add_edge(edge(3, 0, "1"));

        let solution = run(&g, Some(0), Some(2)).unwrap();
        assert_eq!(solution.route.first(), Some(&0));
        assert_eq!(solution.route.last(), Some(&2));
        assert!(solution.eulerized.is_euler_graph());
    }

    #[test]
    fn test_disconnected_input_rejected() {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.add_edge(edge(2, 3, "1"));
        assert!(matches!(
            run(&g, None, None),
            Err(PostmanError::Disconnected(_))
        ));
    }
}
