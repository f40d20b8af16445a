/*!
# EulerTrail

Hierholzer's algorithm over the alias quotient of an Eulerized [`AliasGraph`]:
repeatedly walks a closed loop from some vertex with remaining incident
edges, then splices that loop into the accumulated route at the first point
they share a vertex. The result is a single closed circuit (or, once the
orchestrator has inserted and later removed a start/goal bridge edge, an
open trail between two chosen vertices).
*/

use crate::core::alias_graph::AliasGraph;
use crate::core::edge::Edge;
use crate::core::error::PostmanError;

/// Builds a closed Eulerian circuit over `graph`'s alias quotient, starting
/// from an arbitrary vertex. `graph` must already satisfy [`AliasGraph::is_euler_graph`].
pub fn build_circuit(graph: &AliasGraph) -> Result<Vec<u64>, PostmanError> {
    if !graph.is_euler_graph() {
        return Err(PostmanError::no_route(
            "graph must be connected with all-even alias degree to build an Eulerian circuit",
        ));
    }
    let Some(start) = graph.edges().next().map(|e| graph.get_alias_node(e.u())) else {
        return Ok(Vec::new());
    };

    let mut remaining: Vec<Edge> = graph.edges().copied().collect();
    let mut route: Vec<u64> = generate_loop_route(graph, &mut remaining, start)?;

    loop {
        let Some(splice_start) = remaining
            .iter()
            .map(|e| graph.get_alias_node(e.u()))
            .find(|alias| route.contains(alias))
        else {
            break;
        };
        let loop_route = generate_loop_route(graph, &mut remaining, splice_start)?;
        splice(&mut route, &loop_route);
    }

    if !remaining.is_empty() {
        return Err(PostmanError::no_route(
            "edges remained unvisited after the trail was assembled",
        ));
    }
    Ok(route)
}

/// Walks edges out of `remaining` starting at `start`'s alias, always
/// continuing with an arbitrary still-unused incident edge, until it returns
/// to `start`. Used edges are removed from `remaining`.
fn generate_loop_route(
    graph: &AliasGraph,
    remaining: &mut Vec<Edge>,
    start: u64,
) -> Result<Vec<u64>, PostmanError> {
    let mut route = vec![start];
    let mut current = start;
    loop {
        let next_idx = remaining.iter().position(|edge| {
            graph.get_alias_node(edge.u()) == current || graph.get_alias_node(edge.v()) == current
        });
        let Some(idx) = next_idx else {
            return Err(PostmanError::no_route(format!(
                "no continuing edge from alias vertex {current}"
            )));
        };
        let edge = remaining.remove(idx);
        let au = graph.get_alias_node(edge.u());
        let av = graph.get_alias_node(edge.v());
        current = if au == current { av } else { au };
        route.push(current);
        if current == start {
            break;
        }
    }
    Ok(route)
}

/// Inserts `loop_route` into `route` at the first index whose vertex matches
/// the loop's start, replacing that single shared vertex with the full loop.
fn splice(route: &mut Vec<u64>, loop_route: &[u64]) {
    let anchor = loop_route[0];
    let Some(pos) = route.iter().position(|&v| v == anchor) else {
        return;
    };
    let mut spliced = route[..pos].to_vec();
    spliced.extend_from_slice(loop_route);
    spliced.extend_from_slice(&route[pos + 1..]);
    *route = spliced;
}

/// Rotates a closed circuit (first and last vertex equal) so it starts at
/// `start`'s alias and ends at `goal`'s alias, by locating the bridge edge
/// between them in the route and cutting there. Used by the orchestrator to
/// turn the bridged circuit back into an open start/goal trail.
pub fn rotate_to_bridge(
    route: &[u64],
    bridge_u: u64,
    bridge_v: u64,
) -> Result<Vec<u64>, PostmanError> {
    let bridge_pos = route
        .windows(2)
        .position(|pair| {
            (pair[0] == bridge_u && pair[1] == bridge_v)
                || (pair[0] == bridge_v && pair[1] == bridge_u)
        })
        .ok_or_else(|| {
            PostmanError::no_route("bridge edge not found in the assembled Eulerian circuit")
        })?;

    let forward_from_v = route[bridge_pos] == bridge_u;
    let cut_after = bridge_pos;
    let mut rotated: Vec<u64> = route[cut_after + 1..route.len() - 1]
        .iter()
        .chain(route[..=cut_after].iter())
        .copied()
        .collect();
    if !forward_from_v {
        rotated.reverse();
    }
    Ok(rotated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(u: u64, v: u64, w: &str) -> Edge {
        Edge::new(u, v, w.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_triangle_circuit_visits_every_edge_once() {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.add_edge(edge(1, 2, "1"));
        g.add_edge(edge(2, 0, "1"));

        let route = build_circuit(&g).unwrap();
        assert_eq!(route.len(), 4);
        assert_eq!(route.first(), route.last());
    }

    /// Two triangles sharing an alias node must both appear in a single
    /// circuit, spliced together at the shared alias.
    #[test]
    fn test_two_triangles_sharing_alias_are_spliced() {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.add_edge(edge(1, 2, "1"));
        g.add_edge(edge(2, 0, "1"));
        g.add_edge(edge(3, 4, "1"));
        g.add_edge(edge(4, 5, "1"));
        g.add_edge(edge(5, 3, "1"));
        g.set_alias_node(0, 6);
        g.set_alias_node(3, 6);

        let route = build_circuit(&g).unwrap();
        assert_eq!(route.len(), 7); // 6 edges + return to start
        assert_eq!(route.first(), route.last());
        assert!(route.contains(&6));
        assert!(route.contains(&1) && route.contains(&2));
        assert!(route.contains(&4) && route.contains(&5));
    }

    #[test]
    fn test_non_eulerian_graph_rejected() {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.add_edge(edge(1, 2, "1"));
        assert!(matches!(build_circuit(&g), Err(PostmanError::NoRoute(_))));
    }

    #[test]
    fn test_rotate_to_bridge_cuts_at_bridge_edge() {
        let route = vec![0, 1, 2, 3, 0];
        let rotated = rotate_to_bridge(&route, 3, 0).unwrap();
        assert_eq!(rotated.first(), Some(&0));
        assert_eq!(rotated.last(), Some(&3));
    }
}
