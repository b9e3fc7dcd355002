//! Maximum bipartite matching between two copies (left and right) of the same node set.

use crate::{ids::Id, typed_vec::TVec};
use std::collections::VecDeque;

/// Edges go from left nodes to right nodes, both sides are indexed by the same `K`.
pub(crate) struct BipartiteGraph<K: Id> {
    edges: TVec<K, Vec<K>>,
}

/// A matching, stored in both directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Matching<K: Id> {
    pub(crate) left_to_right: TVec<K, Option<K>>,
    pub(crate) right_to_left: TVec<K, Option<K>>,
}

impl<K: Id> Matching<K> {
    pub(crate) fn len(&self) -> usize {
        self.left_to_right.iter().flatten().count()
    }
}

impl<K: Id> BipartiteGraph<K> {
    pub(crate) fn new(nodes: usize) -> Self {
        Self {
            edges: TVec::new_with_size(nodes, Vec::new()),
        }
    }

    pub(crate) fn nodes(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    pub(crate) fn add_edge(&mut self, left: K, right: K) {
        let nodes = self.nodes();
        let (left_ix, right_ix): (usize, usize) = (left.into(), right.into());
        assert!(left_ix < nodes, "left node {left:?} outside graph of {nodes} nodes");
        assert!(right_ix < nodes, "right node {right:?} outside graph of {nodes} nodes");
        self.edges[left].push(right);
    }

    /// Hopcroft-Karp.
    ///
    /// Each phase BFS-layers the graph from every unmatched left node, alternating unmatched
    /// edges rightwards and matched edges leftwards, up to the first layer reaching an unmatched
    /// right node. A DFS restricted to that layering then augments along a maximal set of
    /// vertex-disjoint shortest paths. Stops when a phase finds no augmenting path, at which
    /// point the matching is maximum.
    ///
    /// Nodes and edges are visited in id and insertion order, so the result is deterministic.
    pub(crate) fn calculate(&self) -> Matching<K> {
        assert!(self.nodes() > 0, "matching on an empty graph");

        let mut matching = Matching {
            left_to_right: TVec::new_with_size(self.nodes(), None),
            right_to_left: TVec::new_with_size(self.nodes(), None),
        };
        let mut dist: TVec<K, usize> = TVec::new_with_size(self.nodes(), UNREACHED);

        let mut phases = 0;
        while let Some(augment_len) = self.layer(&matching, &mut dist) {
            phases += 1;
            for left in self.edges.enumerate() {
                if matching.left_to_right[left].is_none() {
                    self.augment(left, augment_len, &mut matching, &mut dist);
                }
            }
        }
        tracing::trace!(
            nodes = self.nodes(),
            matched = matching.len(),
            phases,
            "computed maximum matching"
        );
        assert_eq!(
            matching.len(),
            matching.right_to_left.iter().flatten().count()
        );
        matching
    }

    /// BFS layering. Returns the length of the shortest augmenting path, if any.
    fn layer(&self, matching: &Matching<K>, dist: &mut TVec<K, usize>) -> Option<usize> {
        let mut queue = VecDeque::new();
        for left in self.edges.enumerate() {
            if matching.left_to_right[left].is_none() {
                dist[left] = 0;
                queue.push_back(left);
            } else {
                dist[left] = UNREACHED;
            }
        }

        let mut shortest = UNREACHED;
        while let Some(left) = queue.pop_front() {
            if dist[left] >= shortest {
                continue;
            }
            for &right in &self.edges[left] {
                match matching.right_to_left[right] {
                    None => shortest = shortest.min(dist[left] + 1),
                    Some(next) => {
                        if dist[next] == UNREACHED {
                            dist[next] = dist[left] + 1;
                            queue.push_back(next);
                        }
                    }
                }
            }
        }
        (shortest != UNREACHED).then_some(shortest)
    }

    /// DFS along the layering, flipping edges of the path on success.
    fn augment(
        &self,
        left: K,
        augment_len: usize,
        matching: &mut Matching<K>,
        dist: &mut TVec<K, usize>,
    ) -> bool {
        for &right in &self.edges[left] {
            let found = match matching.right_to_left[right] {
                None => dist[left] + 1 == augment_len,
                Some(next) => {
                    dist[next] == dist[left] + 1
                        && self.augment(next, augment_len, matching, dist)
                }
            };
            if found {
                matching.left_to_right[left] = Some(right);
                matching.right_to_left[right] = Some(left);
                return true;
            }
        }
        // Dead end for the rest of this phase.
        dist[left] = UNREACHED;
        false
    }
}

const UNREACHED: usize = usize::MAX;
