/*!
# EulerizationPipeline

Turns an arbitrary connected [`AliasGraph`] into an Eulerian one by
duplicating a minimum-weight set of edges. Pendant branches are stripped
before the expensive odd-vertex matching step (they never benefit from
duplication) and restored afterward; the matching itself runs over the
complete distance graph of the remaining odd-degree aliases.
*/

use std::collections::HashMap;

use crate::core::alias_graph::AliasGraph;
use crate::core::blossom::min_cost_perfect_matching;
use crate::core::dijkstra;
use crate::core::edge::Edge;
use crate::core::error::PostmanError;
use crate::core::graph::Graph;
use crate::core::matching_graph::MatchingGraph;

/// Duplicates a minimum-weight edge set so every vertex ends with even
/// degree, returning the Eulerized alias graph. `source` must already be
/// connected; an empty graph is returned unchanged.
pub fn eulerize(source: &AliasGraph) -> Result<AliasGraph, PostmanError> {
    if source.graph().is_empty() {
        return Ok(source.copy());
    }
    if !source.is_connected() {
        return Err(PostmanError::disconnected(
            "graph must be connected before it can be Eulerized",
        ));
    }

    let initial = source.copy();
    let mut working = source.copy();

    let mut branches: Vec<Graph> = Vec::new();
    loop {
        let branch = strip_one_layer(&mut working);
        if branch.is_empty() {
            break;
        }
        branches.push(branch);
    }

    duplicate_for_odd_vertices(&mut working)?;

    for branch in branches.into_iter().rev() {
        for edge in branch.edges() {
            working.add_edge(*edge);
            working.add_edge(*edge);
        }
    }

    trim_redundancy(&mut working, &initial);

    if !working.is_euler_graph() {
        return Err(PostmanError::eulerization_failed(
            "eulerized graph is not connected with all-even degree after trimming",
        ));
    }
    Ok(working)
}

/// Removes one layer of pendant edges from `working`'s underlying graph and
/// mirrors the removal on its alias map, returning the branch removed.
fn strip_one_layer(working: &mut AliasGraph) -> Graph {
    let mut plain = working.graph().copy();
    let branch = plain.pick_up_branch_and_remove();
    for edge in branch.edges() {
        working.remove_edge(edge);
    }
    branch
}

/// Builds the complete distance graph on the current odd-alias set, solves
/// minimum-cost perfect matching, and duplicates each pair's shortest path.
fn duplicate_for_odd_vertices(working: &mut AliasGraph) -> Result<(), PostmanError> {
    let odd: Vec<u64> = working
        .degree_map()
        .into_iter()
        .filter(|&(_, d)| d % 2 == 1)
        .map(|(v, _)| v)
        .collect();
    if odd.is_empty() {
        return Ok(());
    }
    let mut odd = odd;
    odd.sort_unstable();

    let index_of: HashMap<u64, usize> = odd.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    let mut matching_graph = MatchingGraph::new(odd.len());
    for &source in &odd {
        let lengths = dijkstra::single_source_shortest_length(working, source, &odd);
        let si = index_of[&source];
        for (goal, length) in odd.iter().zip(lengths) {
            let gi = index_of[goal];
            if si != gi && length.is_positive() {
                matching_graph.add_edge(si, gi, length);
            }
        }
    }

    let pairs = min_cost_perfect_matching(matching_graph)?;
    for (ai, bi) in pairs {
        let (a, b) = (odd[ai], odd[bi]);
        let path = dijkstra::shortest_path(working, a, b);
        for window in path.windows(2) {
            let (u, v) = (window[0], window[1]);
            if let Some(edge) = working.get_edge_by_nodes(u, v).copied() {
                working.add_edge(edge);
            }
        }
    }
    Ok(())
}

/// Removes `⌊m/2⌋*2` copies of every edge present beyond its multiplicity in
/// `initial`, i.e. rounds each duplication count down to the nearest even
/// number before subtracting back out: an edge duplicated 3 times only needed
/// 2 of those duplicates to fix parity, the third is waste.
fn trim_redundancy(working: &mut AliasGraph, initial: &AliasGraph) {
    let mut distinct: Vec<Edge> = Vec::new();
    for edge in working.graph().edges() {
        if !distinct.iter().any(|e| e == edge) {
            distinct.push(*edge);
        }
    }
    for edge in distinct {
        let initial_count = initial.graph().get_number_of_edge(&edge);
        let current_count = working.graph().get_number_of_edge(&edge);
        let duplicated = current_count.saturating_sub(initial_count);
        let removable = (duplicated / 2) * 2;
        for _ in 0..removable {
            working.remove_edge(&edge);
        }
    }
}
