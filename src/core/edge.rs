/*!
# Edge

An immutable, unordered weighted edge. Equality and hashing are symmetric in
the two endpoints, so `(u, v, w)` and `(v, u, w)` are the same edge; this
matters once edges are stored in a `HashSet`/`HashMap` for deduplication
during redundancy trim.
*/

use std::hash::{Hash, Hasher};

use crate::core::error::PostmanError;
use crate::core::weight::Weight;

/// A single immutable weighted undirected edge between two vertex ids.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    u: u64,
    v: u64,
    w: Weight,
}

impl Edge {
    /// Builds a new edge; the weight must be strictly positive (endpoints
    /// are trivially non-negative since they're `u64`).
    pub fn new(u: u64, v: u64, w: Weight) -> Result<Self, PostmanError> {
        if !w.is_positive() {
            return Err(PostmanError::invalid_edge(format!(
                "edge ({u}, {v}) has non-positive weight {w}"
            )));
        }
        Ok(Edge { u, v, w })
    }

    pub fn u(&self) -> u64 {
        self.u
    }

    pub fn v(&self) -> u64 {
        self.v
    }

    pub fn weight(&self) -> Weight {
        self.w
    }

    /// Returns the endpoint opposite `from`, if `from` is one of this edge's
    /// endpoints. Self-loops return `from` itself.
    pub fn other(&self, from: u64) -> Option<u64> {
        if self.u == from {
            Some(self.v)
        } else if self.v == from {
            Some(self.u)
        } else {
            None
        }
    }

    pub fn touches(&self, node: u64) -> bool {
        self.u == node || self.v == node
    }

    /// The two endpoints as a sorted pair, used when printing edges in the
    /// `(u, v, w)` with `u <= v` order the CLI output requires.
    pub fn sorted_endpoints(&self) -> (u64, u64) {
        if self.u <= self.v {
            (self.u, self.v)
        } else {
            (self.v, self.u)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.w == other.w
            && ((self.u == other.u && self.v == other.v)
                || (self.u == other.v && self.v == other.u))
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (lo, hi) = self.sorted_endpoints();
        lo.hash(state);
        hi.hash(state);
        self.w.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Weight {
        s.parse().unwrap()
    }

    #[test]
    fn test_symmetric_equality_and_hash() {
        let e1 = Edge::new(1, 2, w("3")).unwrap();
        let e2 = Edge::new(2, 1, w("3")).unwrap();
        assert_eq!(e1, e2);

        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;
        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        e1.hash(&mut h1);
        e2.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_rejects_non_positive_weight() {
        assert!(Edge::new(0, 1, w("0")).is_err());
        assert!(Edge::new(0, 1, w("-1")).is_err());
    }

    #[test]
    fn test_other_endpoint() {
        let e = Edge::new(1, 2, w("3")).unwrap();
        assert_eq!(e.other(1), Some(2));
        assert_eq!(e.other(2), Some(1));
        assert_eq!(e.other(3), None);
    }
}
