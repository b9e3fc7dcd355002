//! Access patterns: the sets of columns a join or scan binds when probing a relation.

use crate::{
    error::PlanError,
    ids::{ColumnId, PatternId},
    typed_set::TSet,
};
use std::fmt;

/// Access patterns are `u64` bit sets, so a relation has at most this many columns.
pub const MAX_COLUMNS: usize = u64::BITS as usize;

/// Bit set of columns, bit `i` set means column `i` is bound.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AccessPattern(u64);

impl AccessPattern {
    /// Full scan, no bound columns.
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Duplicate columns are allowed and collapse.
    pub fn from_columns(columns: impl IntoIterator<Item = usize>) -> Result<Self, PlanError> {
        columns.into_iter().try_fold(Self::EMPTY, |acc, column| {
            if column >= MAX_COLUMNS {
                return Err(PlanError::ColumnOutOfRange { column });
            }
            Ok(Self(acc.0 | (1 << column)))
        })
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Number of bound columns, which is also the prefix length serving this pattern.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn contains(self, ColumnId(column): ColumnId) -> bool {
        column < MAX_COLUMNS && self.0 & (1 << column) != 0
    }

    /// Bound columns in ascending order.
    pub fn columns(self) -> impl Iterator<Item = ColumnId> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let column = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(ColumnId(column))
        })
    }

    /// Largest bound column, if any.
    #[must_use]
    pub fn max_column(self) -> Option<ColumnId> {
        (!self.is_empty()).then(|| ColumnId((u64::BITS - 1 - self.0.leading_zeros()) as usize))
    }

    /// `self` binds a proper subset of the columns bound by `other`.
    #[must_use]
    pub const fn is_strict_subset_of(self, other: Self) -> bool {
        self.0 != other.0 && self.0 & !other.0 == 0
    }

    /// Columns in `self` that are not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, ColumnId(column)) in self.columns().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{column}")?;
        }
        write!(f, "}}")
    }
}
impl fmt::Debug for AccessPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// The distinct access patterns used against one relation.
///
/// Ids are handed out in insertion order and adding an existing pattern returns its old id.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccessPatternSet {
    patterns: TSet<PatternId, AccessPattern>,
}

impl AccessPatternSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pattern(&mut self, pattern: AccessPattern) -> PatternId {
        self.patterns.insert(pattern)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, id: PatternId) -> AccessPattern {
        self.patterns.as_tvec()[id]
    }

    #[must_use]
    pub fn id_of(&self, pattern: AccessPattern) -> Option<PatternId> {
        self.patterns.get(&pattern)
    }

    pub fn patterns(&self) -> impl Iterator<Item = AccessPattern> + '_ {
        self.patterns.as_tvec().iter().copied()
    }

    pub fn iter_enumerate(&self) -> impl Iterator<Item = (PatternId, AccessPattern)> + '_ {
        self.patterns
            .as_tvec()
            .iter_enumerate()
            .map(|(id, &pattern)| (id, pattern))
    }

    /// Every strictly comparable pair `(u, v)` with `u` a strict subset of `v`.
    ///
    /// Quadratic in the number of patterns, which is small per relation.
    pub fn subset_edges(&self) -> impl Iterator<Item = (PatternId, PatternId)> + '_ {
        self.iter_enumerate().flat_map(move |(lo, lo_pattern)| {
            self.iter_enumerate()
                .filter(move |&(_, hi_pattern)| lo_pattern.is_strict_subset_of(hi_pattern))
                .map(move |(hi, _)| (lo, hi))
        })
    }
}

impl fmt::Debug for AccessPatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.patterns.as_tvec(), f)
    }
}

impl Extend<AccessPattern> for AccessPatternSet {
    fn extend<T: IntoIterator<Item = AccessPattern>>(&mut self, iter: T) {
        self.patterns.extend(iter);
    }
}
impl FromIterator<AccessPattern> for AccessPatternSet {
    fn from_iter<T: IntoIterator<Item = AccessPattern>>(iter: T) -> Self {
        Self {
            patterns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AccessPattern, AccessPatternSet, MAX_COLUMNS};
    use crate::{error::PlanError, ids::ColumnId};
    use expect_test::expect;
    use itertools::Itertools as _;

    fn pattern(columns: &[usize]) -> AccessPattern {
        AccessPattern::from_columns(columns.iter().copied()).unwrap()
    }

    #[test]
    fn columns_ascending() {
        let p = pattern(&[5, 0, 3, 3]);
        assert_eq!(p.len(), 3);
        assert_eq!(
            p.columns().collect_vec(),
            [ColumnId(0), ColumnId(3), ColumnId(5)]
        );
        assert_eq!(p.max_column(), Some(ColumnId(5)));
        assert_eq!(AccessPattern::EMPTY.max_column(), None);
        expect!["{0,3,5}"].assert_eq(&p.to_string());
        expect!["{}"].assert_eq(&AccessPattern::EMPTY.to_string());
    }

    #[test]
    fn widest_column() {
        let p = pattern(&[MAX_COLUMNS - 1]);
        assert!(p.contains(ColumnId(MAX_COLUMNS - 1)));
        assert!(!p.contains(ColumnId(MAX_COLUMNS)));
        assert_eq!(p.max_column(), Some(ColumnId(MAX_COLUMNS - 1)));
        assert_eq!(
            AccessPattern::from_columns([1, MAX_COLUMNS]),
            Err(PlanError::ColumnOutOfRange {
                column: MAX_COLUMNS
            })
        );
        expect!["column 64 is out of range, relations have at most 64 columns"].assert_eq(
            &AccessPattern::from_columns([MAX_COLUMNS])
                .unwrap_err()
                .to_string(),
        );
    }

    #[test]
    fn strict_subset() {
        let a = pattern(&[0]);
        let ab = pattern(&[0, 1]);
        let b = pattern(&[1]);
        assert!(a.is_strict_subset_of(ab));
        assert!(!ab.is_strict_subset_of(a));
        assert!(!a.is_strict_subset_of(a));
        assert!(!a.is_strict_subset_of(b));
        assert!(AccessPattern::EMPTY.is_strict_subset_of(a));
        assert!(!AccessPattern::EMPTY.is_strict_subset_of(AccessPattern::EMPTY));
        assert_eq!(ab.difference(a), b);
    }

    #[test]
    fn duplicates_collapse() {
        let mut set = AccessPatternSet::new();
        let first = set.add_pattern(pattern(&[1, 2]));
        let second = set.add_pattern(pattern(&[0]));
        let again = set.add_pattern(pattern(&[2, 1]));
        assert_eq!(first, again);
        assert_eq!(set.len(), 2);
        assert_eq!(set.id_of(pattern(&[0])), Some(second));
        assert_eq!(second.0, 1);
        assert_eq!(set.id_of(pattern(&[3])), None);
        expect!["{ap0: {1,2}, ap1: {0}}"].assert_eq(&format!("{set:?}"));
    }

    #[test]
    fn subset_edges() {
        let set: AccessPatternSet = [&[0][..], &[0, 1], &[1], &[1, 2]]
            .into_iter()
            .map(pattern)
            .collect();
        expect!["ap0 < ap1, ap2 < ap1, ap2 < ap3"].assert_eq(
            &set.subset_edges()
                .map(|(lo, hi)| format!("{lo} < {hi}"))
                .join(", "),
        );
    }
}
