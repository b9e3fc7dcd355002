//! Automatic index selection for Datalog relations.
//!
//! Every access pattern (set of bound columns) used against a relation must be a prefix of some
//! lexicographic column order. [`IndexPlanner`] finds the minimum number of such orders by
//! reducing to a minimum chain cover of the subset order, solved with maximum bipartite matching.

mod access_pattern;
mod chain;
mod diagnostics;
mod error;
mod frontend;
mod ids;
mod index_selection;
mod matching;
mod order;
mod typed_set;
mod typed_vec;

pub use access_pattern::{AccessPattern, AccessPatternSet, MAX_COLUMNS};
pub use chain::Chain;
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::{ParseError, PlanError};
pub use frontend::{Relation, parse_relations};
pub use ids::{ColumnId, OrderId, PatternId};
pub use index_selection::{Assignment, IndexPlan, IndexPlanner};
pub use order::Order;

/// How indexes are chosen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum IndexSelection {
    /// Share indexes between access patterns, using as few as possible.
    #[default]
    Matching,
    /// One index per access pattern.
    Naive,
}

/// Settings for an [`IndexPlanner`], passed in by the caller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Configuration {
    pub index_selection: IndexSelection,
}
