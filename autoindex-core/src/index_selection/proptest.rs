use super::IndexPlanner;
use crate::{
    Configuration, IndexSelection,
    access_pattern::{AccessPattern, AccessPatternSet},
    ids::PatternId,
    order::Order,
    typed_vec::TVec,
};
use proptest::prelude::*;

const COLUMNS: u32 = 5;

fn patterns_strategy(max_len: usize) -> impl Strategy<Value = AccessPatternSet> {
    proptest::collection::vec(0..(1_u64 << COLUMNS), 1..=max_len)
        .prop_map(|masks| masks.into_iter().map(AccessPattern::from_bits).collect())
}

/// Size of the largest set of pairwise incomparable patterns, by trying every subset.
fn largest_antichain(patterns: &AccessPatternSet) -> usize {
    let patterns: Vec<AccessPattern> = patterns.patterns().collect();
    (0_u32..1 << patterns.len())
        .filter(|subset| {
            let members: Vec<AccessPattern> = (0..patterns.len())
                .filter(|i| subset & (1 << i) != 0)
                .map(|i| patterns[i])
                .collect();
            members.iter().all(|a| {
                members
                    .iter()
                    .all(|b| !a.is_strict_subset_of(*b) && !b.is_strict_subset_of(*a))
            })
        })
        .map(u32::count_ones)
        .max()
        .unwrap_or(0) as usize
}

fn plan(patterns: &AccessPatternSet, index_selection: IndexSelection) -> super::IndexPlan {
    IndexPlanner::with_sink(Configuration { index_selection }, Vec::<String>::new())
        .plan(patterns)
}

proptest! {
    #[test]
    fn chains_partition_patterns(patterns in patterns_strategy(12)) {
        let plan = plan(&patterns, IndexSelection::Matching);
        let mut seen: TVec<PatternId, usize> = TVec::new_with_size(patterns.len(), 0);
        for (order, _) in plan.orders() {
            let chain = plan.chain(order).patterns();
            prop_assert!(!chain.is_empty());
            for window in chain.windows(2) {
                prop_assert!(patterns.get(window[0]).is_strict_subset_of(patterns.get(window[1])));
            }
            for &id in chain {
                seen[id] += 1;
                prop_assert_eq!(plan.assignment(id).order, order);
            }
        }
        prop_assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn minimum_number_of_orders(patterns in patterns_strategy(8)) {
        let plan = plan(&patterns, IndexSelection::Matching);
        prop_assert_eq!(plan.len(), largest_antichain(&patterns));
    }

    #[test]
    fn prefixes_cover_patterns(patterns in patterns_strategy(12)) {
        let plan = plan(&patterns, IndexSelection::Matching);
        for (id, assignment) in plan.assignments() {
            let pattern = patterns.get(id);
            prop_assert_eq!(assignment.prefix, pattern.len());
            prop_assert_eq!(plan.order(assignment.order).prefix(assignment.prefix), pattern);
            prop_assert_eq!(plan.lookup(pattern), Some(assignment));
        }
        for (_, order) in plan.orders() {
            let mut columns = order.columns().to_vec();
            columns.sort_unstable();
            columns.dedup();
            prop_assert_eq!(columns.len(), order.len());
        }
    }

    #[test]
    fn same_input_same_plan(patterns in patterns_strategy(12)) {
        prop_assert_eq!(
            plan(&patterns, IndexSelection::Matching),
            plan(&patterns, IndexSelection::Matching)
        );
    }

    #[test]
    fn naive_is_one_order_per_pattern(patterns in patterns_strategy(12)) {
        let plan = plan(&patterns, IndexSelection::Naive);
        prop_assert_eq!(plan.len(), patterns.len());
        for (id, pattern) in patterns.iter_enumerate() {
            let assignment = plan.assignment(id);
            prop_assert_eq!(plan.order(assignment.order), &Order::of_pattern(pattern));
        }
    }

    #[test]
    fn never_worse_than_naive(patterns in patterns_strategy(12)) {
        let matching = plan(&patterns, IndexSelection::Matching);
        prop_assert!(matching.len() <= patterns.len());
    }
}
