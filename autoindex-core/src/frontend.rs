//! Text format for relations and their access patterns.
//!
//! ```text
//! # name/arity: patterns
//! edge/2: {0} {1} {0,1}
//! path/3: {} {0,2}
//! ```

use crate::{
    access_pattern::{AccessPattern, AccessPatternSet},
    error::{ParseError, PlanError},
    ids::PatternId,
};
use regex::Regex;
use std::collections::BTreeSet;

/// A relation and the access patterns used against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub name: String,
    pub arity: usize,
    pub patterns: AccessPatternSet,
}

pub fn parse_relations(source: &str) -> Result<Vec<Relation>, ParseError> {
    let header = Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_.\-]*)\s*/\s*([0-9]+)\s*:(.*)$")
        .expect("relation header regex");
    let pattern = Regex::new(r"\{([^{}]*)\}").expect("access pattern regex");

    let mut names = BTreeSet::new();
    let mut relations = Vec::new();
    for (i, text) in source.lines().enumerate() {
        let line = i + 1;
        let text = text.split_once('#').map_or(text, |(code, _comment)| code);
        if text.trim().is_empty() {
            continue;
        }

        let malformed_line = || ParseError::MalformedLine {
            line,
            text: text.trim().to_string(),
        };
        let captures = header.captures(text).ok_or_else(malformed_line)?;
        let name = captures[1].to_string();
        let arity: usize = captures[2].parse().map_err(|_| malformed_line())?;
        let rest = &captures[3];

        if pattern.replace_all(rest, "").trim() != "" {
            return Err(ParseError::MalformedPattern {
                line,
                text: rest.trim().to_string(),
            });
        }

        let mut patterns = AccessPatternSet::new();
        for pattern_captures in pattern.captures_iter(rest) {
            let malformed_pattern = || ParseError::MalformedPattern {
                line,
                text: pattern_captures[0].to_string(),
            };
            let columns = pattern_captures[1]
                .split(',')
                .map(str::trim)
                .filter(|column| !column.is_empty())
                .map(|column| column.parse::<usize>().map_err(|_| malformed_pattern()))
                .collect::<Result<Vec<usize>, ParseError>>()?;
            let access_pattern = AccessPattern::from_columns(columns)
                .map_err(|source| ParseError::Plan { line, source })?;
            if access_pattern.max_column().is_some_and(|column| column.0 >= arity) {
                return Err(ParseError::Plan {
                    line,
                    source: PlanError::ArityTooSmall {
                        pattern: access_pattern,
                        arity,
                    },
                });
            }
            let _: PatternId = patterns.add_pattern(access_pattern);
        }

        if !names.insert(name.clone()) {
            return Err(ParseError::DuplicateRelation { line, name });
        }
        relations.push(Relation {
            name,
            arity,
            patterns,
        });
    }
    Ok(relations)
}
