/*!
# AliasGraph

A [`Graph`] plus a partial map `alias: real -> alias` modeling transfer
points: vertices that are distinct physical places (so edges still connect
the real ids) but share identity for every query whose result depends on
vertex identity — degree, connectivity, neighborhood, the Eulerian property.

Every alias-aware query distinguishes three kinds of argument:
1. a real vertex with no alias entry — behaves exactly like the plain
   `Graph`;
2. a real vertex *with* an alias entry — queries on it directly are
   rejected, since the caller should have queried the alias instead;
3. an alias id (something that appears as a *value* in the alias map) — the
   query is answered over the union of all present reals in its preimage.
*/

use std::collections::{HashMap, HashSet};

use crate::core::edge::Edge;
use crate::core::error::PostmanError;
use crate::core::graph::Graph;
use crate::core::weight::Weight;

#[derive(Debug, Clone, Default)]
pub struct AliasGraph {
    graph: Graph,
    /// real vertex -> alias id.
    alias: HashMap<u64, u64>,
}

impl AliasGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.graph.add_edge(edge);
    }

    /// Removes the first occurrence of `edge`; if that was the last edge
    /// touching a real endpoint, the endpoint also leaves the alias map
    /// (absence from `V(G)` implies absence from the alias map).
    pub fn remove_edge(&mut self, edge: &Edge) -> bool {
        let removed = self.graph.remove_edge(edge);
        if removed {
            for endpoint in [edge.u(), edge.v()] {
                if !self.graph.contains_node(endpoint) {
                    self.alias.remove(&endpoint);
                }
            }
        }
        removed
    }

    pub fn set_alias_node(&mut self, real: u64, alias: u64) {
        self.alias.insert(real, alias);
    }

    /// Returns `real`'s alias, or `real` itself if no alias is defined.
    pub fn get_alias_node(&self, real: u64) -> u64 {
        *self.alias.get(&real).unwrap_or(&real)
    }

    fn has_alias(&self, real: u64) -> bool {
        self.alias.contains_key(&real)
    }

    fn is_alias_id(&self, id: u64) -> bool {
        self.alias.values().any(|&a| a == id)
    }

    /// alias id -> set of real vertices mapped to it.
    pub fn get_alias_dict(&self) -> HashMap<u64, HashSet<u64>> {
        let mut dict: HashMap<u64, HashSet<u64>> = HashMap::new();
        for (&real, &alias) in &self.alias {
            dict.entry(alias).or_default().insert(real);
        }
        dict
    }

    fn preimage(&self, alias: u64) -> HashSet<u64> {
        self.get_alias_dict().remove(&alias).unwrap_or_default()
    }

    /// Expands `n` to the set of real vertices it stands for: its preimage
    /// if it is an alias id, or `{n}` otherwise.
    fn expand(&self, n: u64) -> HashSet<u64> {
        if self.is_alias_id(n) {
            self.preimage(n)
        } else {
            HashSet::from([n])
        }
    }

    pub fn contains_node(&self, n: u64) -> bool {
        if self.graph.contains_node(n) {
            return true;
        }
        self.is_alias_id(n) && self.preimage(n).iter().any(|&r| self.graph.contains_node(r))
    }

    /// See module docs for the three-way dispatch.
    pub fn get_edge_list_by_node(&self, n: u64) -> Vec<&Edge> {
        if self.has_alias(n) {
            return Vec::new();
        }
        if self.is_alias_id(n) {
            let mut seen: HashSet<(u64, u64)> = HashSet::new();
            let mut out = Vec::new();
            for real in self.preimage(n) {
                if !self.graph.contains_node(real) {
                    continue;
                }
                for edge in self.graph.get_edge_list_by_node(real) {
                    if seen.insert(edge.sorted_endpoints()) {
                        out.push(edge);
                    }
                }
            }
            return out;
        }
        self.graph.get_edge_list_by_node(n)
    }

    /// Returns `None` if either argument is itself a real vertex with an
    /// alias defined (spec's documented, stricter contract: callers must
    /// query the alias, not the real id, once one is assigned).
    pub fn get_edge_by_nodes(&self, n1: u64, n2: u64) -> Option<&Edge> {
        if self.has_alias(n1) || self.has_alias(n2) {
            return None;
        }
        let set1 = self.expand(n1);
        let set2 = self.expand(n2);
        for &a in &set1 {
            for &b in &set2 {
                if let Some(edge) = self.graph.get_edge_by_nodes(a, b) {
                    return Some(edge);
                }
            }
        }
        None
    }

    /// Degree per alias-collapsed vertex: every real vertex's degree is
    /// folded into the bucket keyed by its alias (or by itself, if it has
    /// none).
    pub fn degree_map(&self) -> HashMap<u64, u64> {
        let mut degrees: HashMap<u64, u64> = HashMap::new();
        for (real, degree) in self.graph.degree_map() {
            let key = self.get_alias_node(real);
            *degrees.entry(key).or_insert(0) += degree;
        }
        degrees
    }

    /// Replaces every edge `(u, v, w)` with `(alias(u), alias(v), 1)`,
    /// producing the simple multigraph on which connectivity and the
    /// Eulerian property are actually tested.
    fn quotient_graph(&self) -> Graph {
        let mut quotient = Graph::new();
        let unit = Weight::from_int(1);
        for edge in self.graph.edges() {
            let au = self.get_alias_node(edge.u());
            let av = self.get_alias_node(edge.v());
            quotient.add_edge(Edge::new(au, av, unit).expect("unit weight is positive"));
        }
        quotient
    }

    pub fn is_connected(&self) -> bool {
        self.quotient_graph().is_connected()
    }

    pub fn is_euler_graph(&self) -> bool {
        self.quotient_graph().is_euler_graph()
    }

    pub fn get_total_cost(&self) -> Weight {
        self.graph.get_total_cost()
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Unions edges and alias maps; fails if the two alias maps disagree on
    /// a shared real vertex.
    pub fn merge(&mut self, other: &AliasGraph) -> Result<(), PostmanError> {
        for (&real, &alias) in &other.alias {
            if let Some(&existing) = self.alias.get(&real) {
                if existing != alias {
                    return Err(PostmanError::conflicting_alias(format!(
                        "real vertex {real} maps to alias {existing} here but {alias} in the other graph"
                    )));
                }
            }
        }
        self.graph.merge(&other.graph);
        for (&real, &alias) in &other.alias {
            self.alias.insert(real, alias);
        }
        Ok(())
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.edges()
    }

    pub fn alias_pairs(&self) -> Vec<(u64, u64)> {
        let mut pairs = Vec::new();
        for reals in self.get_alias_dict().values() {
            let mut members: Vec<u64> = reals.iter().copied().collect();
            members.sort_unstable();
            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    pairs.push((members[i], members[j]));
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }
}

impl PartialEq for AliasGraph {
    fn eq(&self, other: &Self) -> bool {
        self.graph == other.graph && self.alias == other.alias
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(u: u64, v: u64, w: &str) -> Edge {
        Edge::new(u, v, w.parse().unwrap()).unwrap()
    }

    fn two_triangles_with_shared_alias() -> AliasGraph {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.add_edge(edge(1, 2, "1"));
        g.add_edge(edge(2, 0, "1"));
        g.add_edge(edge(3, 4, "1"));
        g.add_edge(edge(4, 5, "1"));
        g.add_edge(edge(5, 3, "1"));
        g.set_alias_node(0, 6);
        g.set_alias_node(3, 6);
        g
    }

    #[test]
    fn test_alias_quotient_is_connected_and_eulerian() {
        let g = two_triangles_with_shared_alias();
        assert!(g.is_connected());
        assert!(g.is_euler_graph());
    }

    #[test]
    fn test_get_edge_list_by_node_dispatch() {
        let g = two_triangles_with_shared_alias();
        // 0 has an alias defined; querying it directly returns nothing.
        assert!(g.get_edge_list_by_node(0).is_empty());
        // Querying the alias unions both triangles' incident edges at 0 and 3.
        assert_eq!(g.get_edge_list_by_node(6).len(), 4);
        // 1 has no alias, behaves like a plain graph query.
        assert_eq!(g.get_edge_list_by_node(1).len(), 2);
    }

    #[test]
    fn test_get_edge_by_nodes_rejects_keyed_reals() {
        let g = two_triangles_with_shared_alias();
        assert!(g.get_edge_by_nodes(0, 1).is_none());
        assert!(g.get_edge_by_nodes(6, 1).is_some());
    }

    #[test]
    fn test_degree_map_collapses_alias_bucket() {
        let g = two_triangles_with_shared_alias();
        let degrees = g.degree_map();
        assert_eq!(degrees[&6], 4); // degree 2 from each triangle's vertex
        assert_eq!(degrees[&1], 2);
    }

    #[test]
    fn test_alias_entry_removed_when_real_vertex_vanishes() {
        let mut g = AliasGraph::new();
        g.add_edge(edge(0, 1, "1"));
        g.set_alias_node(0, 99);
        assert!(g.remove_edge(&edge(0, 1, "1")));
        assert_eq!(g.get_alias_node(0), 0);
    }

    #[test]
    fn test_merge_detects_conflicting_alias() {
        let mut a = AliasGraph::new();
        a.add_edge(edge(0, 1, "1"));
        a.set_alias_node(0, 10);

        let mut b = AliasGraph::new();
        b.add_edge(edge(0, 2, "1"));
        b.set_alias_node(0, 20);

        assert!(a.merge(&b).is_err());
    }

    #[test]
    fn test_merge_compatible_alias_succeeds() {
        let mut a = AliasGraph::new();
        a.add_edge(edge(0, 1, "1"));
        a.set_alias_node(0, 10);

        let mut b = AliasGraph::new();
        b.add_edge(edge(0, 2, "1"));
        b.set_alias_node(0, 10);

        assert!(a.merge(&b).is_ok());
        assert_eq!(a.graph().edge_count(), 2);
    }

    #[test]
    fn test_alias_pairs_sorted_within_class() {
        let g = two_triangles_with_shared_alias();
        assert_eq!(g.alias_pairs(), vec![(0, 3)]);
    }
}
