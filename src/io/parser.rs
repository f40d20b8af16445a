/*!
# Parser

Reads graph description files into an [`AliasGraph`]. A data line has
exactly three whitespace-separated tokens `u v w`: `w == "transfer"` unions
`u` and `v` into the same alias class (transitively, union-find style);
otherwise `w` is a positive decimal edge weight. `#` starts a line comment.
Node names are arbitrary strings; integer ids are assigned in first-seen
order, local to each file.

A list file (`-l`) names one data file per line; each is parsed
independently (its own first-seen-order id space) and merged into one
`AliasGraph`, with every id range offset so merged files can never collide.
*/

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::alias_graph::AliasGraph;
use crate::core::edge::Edge;
use crate::core::error::PostmanError;
use crate::core::weight::Weight;

/// Strips a trailing `#`-comment and surrounding whitespace.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new() -> Self {
        Self { parent: Vec::new() }
    }

    fn ensure(&mut self, id: usize) {
        while self.parent.len() <= id {
            let next = self.parent.len();
            self.parent.push(next);
        }
    }

    fn find(&mut self, id: usize) -> usize {
        self.ensure(id);
        if self.parent[id] != id {
            self.parent[id] = self.find(self.parent[id]);
        }
        self.parent[id]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

struct NodeRegistry {
    ids: HashMap<String, u64>,
    next: u64,
}

impl NodeRegistry {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            next: 0,
        }
    }

    fn id_for(&mut self, name: &str) -> u64 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.next;
        self.next += 1;
        self.ids.insert(name.to_string(), id);
        id
    }
}

/// Parses one data file's text into an `AliasGraph` with an id space
/// starting at `0`.
pub fn parse_source(text: &str) -> Result<AliasGraph, PostmanError> {
    let mut registry = NodeRegistry::new();
    let mut union_find = UnionFind::new();
    let mut edges: Vec<(u64, u64, Weight)> = Vec::new();

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = strip_comment(raw_line);
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 3 {
            return Err(PostmanError::malformed_input(format!(
                "line {}: expected exactly 3 tokens, found {}",
                line_no + 1,
                tokens.len()
            )));
        }
        let u = registry.id_for(tokens[0]);
        let v = registry.id_for(tokens[1]);
        union_find.ensure(u as usize);
        union_find.ensure(v as usize);

        if tokens[2] == "transfer" {
            union_find.union(u as usize, v as usize);
        } else {
            let weight: Weight = tokens[2].parse().map_err(|_| {
                PostmanError::malformed_input(format!(
                    "line {}: {:?} is not a positive decimal weight",
                    line_no + 1,
                    tokens[2]
                ))
            })?;
            edges.push((u, v, weight));
        }
    }

    let mut graph = AliasGraph::new();
    for (u, v, w) in edges {
        graph.add_edge(Edge::new(u, v, w)?);
    }

    let node_count = registry.next as usize;
    let mut classes: HashMap<usize, Vec<u64>> = HashMap::new();
    for id in 0..node_count {
        let root = union_find.find(id);
        classes.entry(root).or_default().push(id as u64);
    }
    let mut next_alias = registry.next;
    let mut roots: Vec<usize> = classes.keys().copied().collect();
    roots.sort_unstable();
    for root in roots {
        let members = &classes[&root];
        if members.len() < 2 {
            continue;
        }
        let alias_id = next_alias;
        next_alias += 1;
        for &member in members {
            graph.set_alias_node(member, alias_id);
        }
    }

    Ok(graph)
}

/// Parses the file at `path` into an `AliasGraph`.
pub fn parse_file(path: &Path) -> Result<AliasGraph, PostmanError> {
    let text = fs::read_to_string(path)?;
    parse_source(&text)
}

/// Parses a list file: one data-file path per line, `#` comments honored.
pub fn parse_list_file(path: &Path) -> Result<Vec<String>, PostmanError> {
    let text = fs::read_to_string(path)?;
    let mut paths = Vec::new();
    for raw_line in text.lines() {
        let line = strip_comment(raw_line);
        if line.is_empty() {
            continue;
        }
        paths.push(line.to_string());
    }
    Ok(paths)
}

/// Parses every file in `paths` in order and merges them into a single
/// `AliasGraph`. Each file keeps its own first-seen-order id space; ids are
/// offset file-to-file so merging never collides real vertex ids.
pub fn parse_and_merge(paths: &[String]) -> Result<AliasGraph, PostmanError> {
    let mut merged = AliasGraph::new();
    let mut offset: u64 = 0;
    for path in paths {
        let text = fs::read_to_string(Path::new(path))?;
        let parsed = parse_source(&text)?;
        let shifted = shift_ids(&parsed, offset);
        let node_span = parsed
            .graph()
            .vertices()
            .chain(parsed.alias_pairs().into_iter().flat_map(|(a, b)| [a, b]))
            .max()
            .map_or(0, |m| m + 1);
        merged.merge(&shifted)?;
        offset += node_span;
    }
    Ok(merged)
}

fn shift_ids(graph: &AliasGraph, offset: u64) -> AliasGraph {
    if offset == 0 {
        return graph.copy();
    }
    let mut shifted = AliasGraph::new();
    for edge in graph.edges() {
        let edge = Edge::new(edge.u() + offset, edge.v() + offset, edge.weight())
            .expect("shifting ids preserves a positive weight");
        shifted.add_edge(edge);
    }
    for (real, reals) in graph.get_alias_dict() {
        for member in reals {
            shifted.set_alias_node(member + offset, real + offset);
        }
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_edges_and_first_seen_ids() {
        let text = "# comment\nA B 2\nB C 1\n";
        let g = parse_source(text).unwrap();
        assert_eq!(g.graph().edge_count(), 2);
        assert!(g.contains_node(0));
        assert!(g.contains_node(1));
        assert!(g.contains_node(2));
    }

    #[test]
    fn test_transfer_lines_union_alias_classes() {
        let text = "A B 1\nC D 1\nA C transfer\n";
        let g = parse_source(text).unwrap();
        // A(0) and C(2) are unioned; both should share a fresh alias id.
        assert_eq!(g.get_alias_node(0), g.get_alias_node(2));
        assert_ne!(g.get_alias_node(0), 0);
    }

    #[test]
    fn test_wrong_token_count_is_malformed() {
        let text = "A B\n";
        assert!(matches!(
            parse_source(text),
            Err(PostmanError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_non_decimal_weight_is_malformed() {
        let text = "A B notanumber\n";
        assert!(matches!(
            parse_source(text),
            Err(PostmanError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_transitive_union_merges_three_nodes() {
        let text = "A B 1\nC D 1\nE F 1\nA C transfer\nC E transfer\n";
        let g = parse_source(text).unwrap();
        let alias_a = g.get_alias_node(0);
        assert_eq!(g.get_alias_node(2), alias_a);
        assert_eq!(g.get_alias_node(4), alias_a);
    }
}
