//! Find required indexes given access patterns.
//! In other words, logical indexes to physical indexes.

use crate::{
    Configuration, IndexSelection,
    access_pattern::{AccessPattern, AccessPatternSet},
    chain::{self, Chain},
    diagnostics::{DiagnosticSink, TracingSink},
    error::PlanError,
    ids::{ColumnId, OrderId, PatternId},
    matching::{BipartiteGraph, Matching},
    order::{Order, build_order},
    typed_vec::TVec,
};
use itertools::Itertools as _;

#[cfg(test)]
mod proptest;

/// Where an access pattern is served: the first `prefix` columns of order `order`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub order: OrderId,
    pub prefix: usize,
}

/// Physical indexes for one relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexPlan {
    patterns: AccessPatternSet,
    chains: TVec<OrderId, Chain>,
    orders: TVec<OrderId, Order>,
    assignments: TVec<PatternId, Assignment>,
}

impl IndexPlan {
    fn from_chains(patterns: &AccessPatternSet, chains: TVec<OrderId, Chain>) -> Self {
        let orders = chains.map(|chain| build_order(patterns, chain));

        let mut assignments: TVec<PatternId, Option<Assignment>> =
            TVec::new_with_size(patterns.len(), None);
        for (order, chain) in chains.iter_enumerate() {
            for &id in chain.patterns() {
                let prefix = patterns.get(id).len();
                assert!(assignments[id].is_none(), "{id} assigned twice");
                assignments[id] = Some(Assignment { order, prefix });
            }
        }
        let assignments = assignments.map(|assignment| {
            assignment.expect("all access patterns should be part of some chain")
        });

        for (id, &Assignment { order, prefix }) in assignments.iter_enumerate() {
            let pattern = patterns.get(id);
            assert_eq!(
                orders[order].prefix(prefix),
                pattern,
                "incorrect lexicographical order {order} for {id}"
            );
        }

        Self {
            patterns: patterns.clone(),
            chains,
            orders,
            assignments,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of physical indexes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn patterns(&self) -> &AccessPatternSet {
        &self.patterns
    }

    pub fn orders(&self) -> impl Iterator<Item = (OrderId, &Order)> {
        self.orders.iter_enumerate()
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> &Order {
        &self.orders[id]
    }

    /// The access patterns served by order `id`, by increasing prefix length.
    #[must_use]
    pub fn chain(&self, id: OrderId) -> &Chain {
        &self.chains[id]
    }

    pub fn assignments(&self) -> impl Iterator<Item = (PatternId, Assignment)> + '_ {
        self.assignments
            .iter_enumerate()
            .map(|(id, &assignment)| (id, assignment))
    }

    #[must_use]
    pub fn assignment(&self, id: PatternId) -> Assignment {
        self.assignments[id]
    }

    /// Where to probe for `pattern`, if it was planned for.
    #[must_use]
    pub fn lookup(&self, pattern: AccessPattern) -> Option<Assignment> {
        self.patterns.id_of(pattern).map(|id| self.assignments[id])
    }

    /// Every order extended by the remaining columns of a relation with `arity` columns, in
    /// ascending order, giving one full column permutation per index.
    pub fn permutations(&self, arity: usize) -> Result<Vec<Vec<ColumnId>>, PlanError> {
        if let Some(pattern) = self
            .patterns
            .patterns()
            .find(|pattern| pattern.max_column().is_some_and(|ColumnId(c)| c >= arity))
        {
            return Err(PlanError::ArityTooSmall { pattern, arity });
        }
        Ok(self
            .orders
            .iter()
            .map(|order| order.completed(arity))
            .collect())
    }

    /// One line per index: its columns and the access patterns it serves.
    #[must_use]
    pub fn dbg_summary(&self) -> String {
        self.orders
            .iter_enumerate()
            .map(|(id, order)| {
                let columns = order.columns().iter().map(|c| c.0).join(" ");
                let served = self.chains[id]
                    .patterns()
                    .iter()
                    .map(|&p| self.patterns.get(p))
                    .join(" ");
                format!("{id}: [{columns}] <- {served}")
            })
            .join("\n")
    }
}

/// Plans indexes relation by relation.
///
/// The only state kept between relations is whether the naive mode notice has been emitted.
pub struct IndexPlanner<S = TracingSink> {
    config: Configuration,
    sink: S,
    naive_notice_emitted: bool,
}

impl IndexPlanner {
    #[must_use]
    pub fn new(config: Configuration) -> Self {
        Self::with_sink(config, TracingSink)
    }
}

impl<S: DiagnosticSink> IndexPlanner<S> {
    pub fn with_sink(config: Configuration, sink: S) -> Self {
        Self {
            config,
            sink,
            naive_notice_emitted: false,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Pick a set of orders such that every pattern is a prefix of one of them.
    ///
    /// With [`IndexSelection::Matching`] this is the minimum number of orders.
    pub fn plan(&mut self, patterns: &AccessPatternSet) -> IndexPlan {
        if patterns.is_empty() {
            return IndexPlan::from_chains(patterns, TVec::new());
        }

        let chains = match self.config.index_selection {
            IndexSelection::Naive => {
                if !self.naive_notice_emitted {
                    self.sink.naive_indexes_enabled();
                    self.naive_notice_emitted = true;
                }
                patterns
                    .iter_enumerate()
                    .map(|(id, _)| Chain::singleton(id))
                    .collect()
            }
            IndexSelection::Matching => self.minimum_chains(patterns),
        };

        let plan = IndexPlan::from_chains(patterns, chains);
        tracing::debug!(
            patterns = patterns.len(),
            indexes = plan.len(),
            "selected indexes"
        );
        plan
    }

    /// Minimum chain cover of the strict subset order.
    ///
    /// Reduction: split every access pattern into a left and right node, and connect left `u`
    /// to right `v` whenever `u` is a strict subset of `v`. A maximum matching then picks the
    /// most successor links possible, leaving `n - |matching|` chains.
    fn minimum_chains(&mut self, patterns: &AccessPatternSet) -> TVec<OrderId, Chain> {
        let mut graph = BipartiteGraph::new(patterns.len());
        for (lo, hi) in patterns.subset_edges() {
            graph.add_edge(lo, hi);
        }
        let matching = graph.calculate();
        tracing::debug!(
            patterns = patterns.len(),
            edges = graph.edge_count(),
            matched = matching.len(),
            "matched access patterns"
        );
        self.chains_from_matching(patterns, &matching)
    }

    fn chains_from_matching(
        &mut self,
        patterns: &AccessPatternSet,
        matching: &Matching<PatternId>,
    ) -> TVec<OrderId, Chain> {
        let chain::Decomposition { chains, degenerate } = chain::decompose(patterns, matching);
        if degenerate {
            self.sink.degenerate_partial_order(patterns.len());
        } else {
            assert_eq!(chains.len(), patterns.len() - matching.len());
        }
        for (id, chain) in chains.iter_enumerate() {
            tracing::trace!("{id}: {:?}", chain.patterns());
        }
        chains
    }
}
