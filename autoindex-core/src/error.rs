use crate::access_pattern::{AccessPattern, MAX_COLUMNS};
use thiserror::Error;

/// Invalid input to the planner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A column id does not fit in the access pattern bit set.
    #[error(
        "column {column} is out of range, relations have at most {max} columns",
        max = MAX_COLUMNS
    )]
    ColumnOutOfRange { column: usize },

    /// An access pattern mentions a column the relation does not have.
    #[error("access pattern {pattern} does not fit a relation of arity {arity}")]
    ArityTooSmall { pattern: AccessPattern, arity: usize },
}

/// Malformed relation description, see [`crate::parse_relations`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected `name/arity: {{cols}} ...`, found {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("line {line}: malformed access pattern {text:?}")]
    MalformedPattern { line: usize, text: String },

    #[error("line {line}: relation {name} declared twice")]
    DuplicateRelation { line: usize, name: String },

    #[error("line {line}: {source}")]
    Plan {
        line: usize,
        #[source]
        source: PlanError,
    },
}
