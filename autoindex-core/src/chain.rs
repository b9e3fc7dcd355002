//! Minimum chain cover from a maximum matching (Dilworth).

use crate::{
    access_pattern::AccessPatternSet,
    ids::{OrderId, PatternId},
    matching::Matching,
    typed_vec::TVec,
};

/// Access patterns that are totally ordered by strict inclusion, smallest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain(pub(crate) Vec<PatternId>);

impl Chain {
    pub(crate) fn singleton(id: PatternId) -> Self {
        Self(vec![id])
    }

    #[must_use]
    pub fn patterns(&self) -> &[PatternId] {
        &self.0
    }
}

pub(crate) struct Decomposition {
    pub(crate) chains: TVec<OrderId, Chain>,
    /// Every node was matched on the left, which a strict partial order can not produce.
    pub(crate) degenerate: bool,
}

/// Split `universe` into chains following the matched edges.
///
/// `matching.left_to_right[lo] == Some(hi)` means `hi` follows `lo` in a chain. Left-unmatched
/// patterns are maximal within their chain and seed one chain each, which is then walked
/// backwards through `right_to_left`.
pub(crate) fn decompose(
    universe: &AccessPatternSet,
    matching: &Matching<PatternId>,
) -> Decomposition {
    assert!(!universe.is_empty());
    assert_eq!(universe.len(), matching.left_to_right.len());

    let seeds: Vec<PatternId> = matching
        .left_to_right
        .iter_enumerate()
        .filter_map(|(id, next)| next.is_none().then_some(id))
        .collect();

    if seeds.is_empty() {
        return Decomposition {
            chains: universe
                .iter_enumerate()
                .map(|(id, _)| Chain::singleton(id))
                .collect(),
            degenerate: true,
        };
    }

    let chains: TVec<OrderId, Chain> = seeds
        .into_iter()
        .map(|seed| {
            let mut chain = vec![seed];
            let mut current = seed;
            while let Some(prev) = matching.right_to_left[current] {
                chain.push(prev);
                current = prev;
            }
            chain.reverse();
            Chain(chain)
        })
        .collect();

    let mut seen: TVec<PatternId, bool> = matching.left_to_right.new_same_size();
    for chain in &chains {
        for &id in chain.patterns() {
            assert!(!seen[id], "{id} appears in two chains");
            seen[id] = true;
        }
    }
    assert!(
        seen.iter().all(|&x| x),
        "chains do not cover every access pattern"
    );

    Decomposition {
        chains,
        degenerate: false,
    }
}
