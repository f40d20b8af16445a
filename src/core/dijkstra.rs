/*!
# Dijkstra

Single-source and point-to-point shortest paths over an [`AliasGraph`],
computed at the **alias** level: every edge endpoint is mapped through
`alias(...)` before it ever reaches the search, so a path through a transfer
point counts as passing through one vertex rather than two.

The search itself is the textbook indexed-heap Dijkstra: the open set lives
in a [`BinaryHeap`] keyed by tentative score, relaxed with strict `<` so
that, given a fixed edge-stream order, ties are broken deterministically in
favor of whichever edge was discovered first.
*/

use std::collections::{HashMap, HashSet};

use crate::core::alias_graph::AliasGraph;
use crate::core::heap::BinaryHeap;
use crate::core::weight::Weight;

/// An alias-level path from source to target, inclusive of both ends.
/// Empty when the target is unreachable.
pub type Path = Vec<u64>;

/// Adjacency at the alias level: alias -> [(neighbor alias, edge weight)].
fn alias_adjacency(graph: &AliasGraph) -> HashMap<u64, Vec<(u64, Weight)>> {
    let mut adjacency: HashMap<u64, Vec<(u64, Weight)>> = HashMap::new();
    for edge in graph.edges() {
        let au = graph.get_alias_node(edge.u());
        let av = graph.get_alias_node(edge.v());
        adjacency.entry(au).or_default().push((av, edge.weight()));
        if au != av {
            adjacency.entry(av).or_default().push((au, edge.weight()));
        }
    }
    adjacency
}

struct SearchResult {
    dist: HashMap<u64, Weight>,
    parent: HashMap<u64, Option<u64>>,
}

/// Runs Dijkstra from `source_alias`, stopping once every alias in
/// `stop_when_found` (if any) has been finalized, or the heap empties.
fn run(
    adjacency: &HashMap<u64, Vec<(u64, Weight)>>,
    source_alias: u64,
    stop_when_found: Option<&HashSet<u64>>,
) -> SearchResult {
    let mut dist: HashMap<u64, Weight> = HashMap::new();
    let mut parent: HashMap<u64, Option<u64>> = HashMap::new();
    let mut finalized: HashSet<u64> = HashSet::new();
    let mut heap = BinaryHeap::new();

    let mut pending: HashSet<u64> = stop_when_found.cloned().unwrap_or_default();
    pending.remove(&source_alias);

    dist.insert(source_alias, Weight::ZERO);
    parent.insert(source_alias, None);
    heap.insert(Weight::ZERO, source_alias)
        .expect("fresh heap has no duplicate satellites");

    while !heap.is_empty() {
        let u = heap.delete_min().expect("heap reported non-empty");
        if finalized.contains(&u) {
            continue;
        }
        finalized.insert(u);
        pending.remove(&u);
        if stop_when_found.is_some() && pending.is_empty() {
            break;
        }

        let best_u = dist[&u];
        let Some(neighbors) = adjacency.get(&u) else {
            continue;
        };
        for &(v, w) in neighbors {
            if finalized.contains(&v) {
                continue;
            }
            let candidate = best_u + w;
            let better = match dist.get(&v) {
                None => true,
                Some(&current) => candidate < current,
            };
            if better {
                dist.insert(v, candidate);
                parent.insert(v, Some(u));
                if heap.contains_satellite(v) {
                    heap.change_key(candidate, v)
                        .expect("v is known to be in the heap");
                } else {
                    heap.insert(candidate, v).expect("v was not yet discovered");
                }
            }
        }
    }

    SearchResult { dist, parent }
}

fn reconstruct(parent: &HashMap<u64, Option<u64>>, source: u64, target: u64) -> Path {
    if !parent.contains_key(&target) {
        return Vec::new();
    }
    let mut path = vec![target];
    let mut cur = target;
    while cur != source {
        match parent.get(&cur).and_then(|p| *p) {
            Some(prev) => {
                path.push(prev);
                cur = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Shortest alias-level path from `s` to `t`, empty if unreachable.
pub fn shortest_path(graph: &AliasGraph, s: u64, t: u64) -> Path {
    let adjacency = alias_adjacency(graph);
    let source = graph.get_alias_node(s);
    let target = graph.get_alias_node(t);
    let mut stop = HashSet::new();
    stop.insert(target);
    let result = run(&adjacency, source, Some(&stop));
    reconstruct(&result.parent, source, target)
}

/// Total weight along the shortest path from `s` to `t`; zero if the path
/// is empty or a single node.
pub fn shortest_length(graph: &AliasGraph, s: u64, t: u64) -> Weight {
    let adjacency = alias_adjacency(graph);
    let source = graph.get_alias_node(s);
    let target = graph.get_alias_node(t);
    let mut stop = HashSet::new();
    stop.insert(target);
    let result = run(&adjacency, source, Some(&stop));
    result.dist.get(&target).copied().unwrap_or(Weight::ZERO)
}

/// One Dijkstra pass from `s`, returning the shortest length to each of
/// `goals` in the same order they were given (not the order they were
/// discovered in).
pub fn single_source_shortest_length(graph: &AliasGraph, s: u64, goals: &[u64]) -> Vec<Weight> {
    let adjacency = alias_adjacency(graph);
    let source = graph.get_alias_node(s);
    let target_aliases: HashSet<u64> = goals.iter().map(|&g| graph.get_alias_node(g)).collect();
    let result = run(&adjacency, source, Some(&target_aliases));
    goals
        .iter()
        .map(|&g| {
            let alias = graph.get_alias_node(g);
            result.dist.get(&alias).copied().unwrap_or(Weight::ZERO)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::edge::Edge;

    fn edge(u: u64, v: u64, w: &str) -> Edge {
        Edge::new(u, v, w.parse().unwrap()).unwrap()
    }

    /// An 8-vertex graph with Dijkstra results pinned down exactly.
    fn seed_graph() -> AliasGraph {
        let mut g = AliasGraph::new();
        for (u, v, w) in [
            (0, 1, "2"),
            (1, 2, "1"),
            (2, 7, "6"),
            (7, 6, "1"),
            (6, 5, "2"),
            (5, 4, "1"),
            (4, 0, "4"),
            (0, 3, "6"),
            (3, 6, "3"),
            (3, 4, "1"),
            (1, 7, "8"),
        ] {
            g.add_edge(edge(u, v, w));
        }
        g
    }

    #[test]
    fn test_seed_shortest_length_and_path() {
        let g = seed_graph();
        assert_eq!(shortest_length(&g, 0, 7).to_string(), "8");
        assert_eq!(shortest_path(&g, 0, 7), vec![0, 4, 5, 6, 7]);
    }

    #[test]
    fn test_seed_single_source_shortest_length() {
        let g = seed_graph();
        let goals: Vec<u64> = (0..8).collect();
        let lengths = single_source_shortest_length(&g, 0, &goals);
        let expected = ["0", "2", "3", "5", "4", "5", "7", "8"];
        let actual: Vec<String> = lengths.iter().map(|w| w.to_string()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_unreachable_returns_empty_path_and_zero_length() {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.add_edge(edge(2, 3, "1"));
        assert!(shortest_path(&g, 0, 3).is_empty());
        assert_eq!(shortest_length(&g, 0, 3), Weight::ZERO);
    }

    #[test]
    fn test_same_source_and_target_is_zero() {
        let g = seed_graph();
        assert_eq!(shortest_length(&g, 0, 0), Weight::ZERO);
        assert_eq!(shortest_path(&g, 0, 0), vec![0]);
    }

    #[test]
    fn test_respects_aliases() {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.add_edge(edge(1, 2, "1"));
        g.add_edge(edge(3, 4, "1"));
        g.set_alias_node(2, 99);
        g.set_alias_node(3, 99);
        // Query using real ids still resolves through the alias internally.
        assert_eq!(shortest_length(&g, 0, 4).to_string(), "3");
    }
}
