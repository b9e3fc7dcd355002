//! Lexicographic column orders built from chains of access patterns.

use crate::{
    access_pattern::{AccessPattern, AccessPatternSet},
    chain::Chain,
    ids::ColumnId,
};
use std::fmt;

/// Lexicographic column order of one physical index.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Order(Vec<ColumnId>);

impl Order {
    /// Bound columns of `pattern`, ascending.
    #[cfg(test)]
    pub(crate) fn of_pattern(pattern: AccessPattern) -> Self {
        Self(pattern.columns().collect())
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnId] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The columns of the first `len` entries.
    ///
    /// # Panics
    /// If `len` is longer than the order.
    #[must_use]
    pub fn prefix(&self, len: usize) -> AccessPattern {
        AccessPattern::from_bits(self.0[..len].iter().fold(0, |acc, &ColumnId(c)| acc | (1 << c)))
    }

    /// Probing this order with a prefix of `pattern.len()` columns serves `pattern`.
    #[must_use]
    pub fn covers(&self, pattern: AccessPattern) -> bool {
        pattern.len() <= self.len() && self.prefix(pattern.len()) == pattern
    }

    /// Append the columns of `pattern` missing from the order, ascending.
    fn extend_with(&mut self, pattern: AccessPattern) {
        let present = self.prefix(self.len());
        self.0.extend(pattern.difference(present).columns());
    }

    /// The order followed by every other column of a relation with `arity` columns.
    pub(crate) fn completed(&self, arity: usize) -> Vec<ColumnId> {
        let present = self.prefix(self.len());
        self.0
            .iter()
            .copied()
            .chain((0..arity).map(ColumnId).filter(|&c| !present.contains(c)))
            .collect()
    }
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|c| c.0)).finish()
    }
}

/// Order whose successive prefixes are the patterns of `chain`.
///
/// Starts from the smallest pattern and appends each larger pattern's new columns in ascending
/// order, so every pattern of the chain is a prefix.
pub(crate) fn build_order(universe: &AccessPatternSet, chain: &Chain) -> Order {
    let mut order = Order::default();
    for &id in chain.patterns() {
        let pattern = universe.get(id);
        order.extend_with(pattern);
        assert!(
            order.len() == pattern.len() && order.covers(pattern),
            "chain {chain:?} is not increasing at {pattern}"
        );
    }
    order
}
