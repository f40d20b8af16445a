/*!
# format

Pretty-printers shared by the three CLI binaries: the Eulerized edge list,
alias-pair lines, a de-duplicated route listing, and `routecomp`'s wrapped
`-`/`=` route rendering.
*/

use crate::core::alias_graph::AliasGraph;

/// `u v w` lines, sorted ascending by `(u, v, w)` with `u <= v`.
pub fn format_edge_list(graph: &AliasGraph) -> Vec<String> {
    let mut rows: Vec<(u64, u64, String)> = graph
        .edges()
        .map(|e| {
            let (u, v) = e.sorted_endpoints();
            (u, v, e.weight().to_string())
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
    rows.into_iter()
        .map(|(u, v, w)| format!("{u} {v} {w}"))
        .collect()
}

/// `u v transfer` lines, one per pair within each alias class, sorted.
pub fn format_alias_pairs(graph: &AliasGraph) -> Vec<String> {
    graph
        .alias_pairs()
        .into_iter()
        .map(|(u, v)| format!("{u} {v} transfer"))
        .collect()
}

/// One node per line, collapsing consecutive duplicate entries (the point
/// where one spliced-in loop's closing vertex equals the next segment's
/// opening vertex).
pub fn format_route(route: &[u64]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut last: Option<u64> = None;
    for &node in route {
        if last != Some(node) {
            lines.push(node.to_string());
        }
        last = Some(node);
    }
    lines
}

/// `routecomp`'s route rendering: consecutive nodes are joined by `-`
/// (an edge actually walked); since the accumulated route is already one
/// continuous walk, a `=` only appears where de-duplication would otherwise
/// have collapsed two identical adjacent entries into a single token (a
/// same-node splice point). Wrapped to 10 tokens per line.
pub fn format_route_with_separators(route: &[u64]) -> Vec<String> {
    if route.is_empty() {
        return Vec::new();
    }
    let mut tokens = Vec::new();
    tokens.push(route[0].to_string());
    for window in route.windows(2) {
        let (a, b) = (window[0], window[1]);
        let sep = if a == b { "=" } else { "-" };
        tokens.push(sep.to_string());
        tokens.push(b.to_string());
    }
    tokens
        .chunks(10)
        .map(|chunk| chunk.join(" "))
        .collect()
}
