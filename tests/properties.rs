//! Property tests: random instances checked against the blocking-pair law.
//!
//! Roommate results are cross-checked against an exhaustive search over every
//! perfect matching, so a reported `NoStableSolution` is verified too.

use proptest::prelude::*;
use stable_matching::{
    solve_marriage, solve_roommates, Key, Matching, MatchingAnalysis, MatchingError, Preferences,
};

const BETA_OFFSET: i64 = 100;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A complete marriage instance with `n` participants per side. Alpha keys are
/// `0..n`, beta keys `100..100 + n`.
fn arb_marriage() -> impl Strategy<Value = (Preferences, Preferences)> {
    (1usize..7)
        .prop_flat_map(|n| {
            let ranking = Just((0..n as i64).collect::<Vec<_>>()).prop_shuffle();
            (
                prop::collection::vec(ranking.clone(), n),
                prop::collection::vec(ranking, n),
            )
        })
        .prop_map(|(alpha_lists, beta_lists)| {
            let alpha: Preferences = alpha_lists
                .into_iter()
                .enumerate()
                .map(|(i, list)| {
                    let list: Vec<i64> = list.into_iter().map(|j| j + BETA_OFFSET).collect();
                    (i as i64, list)
                })
                .collect();
            let beta: Preferences = beta_lists
                .into_iter()
                .enumerate()
                .map(|(j, list)| (j as i64 + BETA_OFFSET, list))
                .collect();
            (alpha, beta)
        })
}

/// A complete roommates instance with an even number of participants, up to 8.
fn arb_roommates() -> impl Strategy<Value = Preferences> {
    (1usize..=4)
        .prop_flat_map(|half| {
            let n = half * 2;
            (0..n as i64)
                .map(|i| {
                    let others: Vec<i64> = (0..n as i64).filter(|&j| j != i).collect();
                    Just(others).prop_shuffle()
                })
                .collect::<Vec<_>>()
        })
        .prop_map(|lists| {
            lists
                .into_iter()
                .enumerate()
                .map(|(i, list)| (i as i64, list))
                .collect::<Preferences>()
        })
}

/// A permutation of `0..n` for reordering a table's entries.
fn arb_order(n: usize) -> impl Strategy<Value = Vec<usize>> {
    Just((0..n).collect::<Vec<_>>()).prop_shuffle()
}

/// Every perfect matching of the given participants.
fn perfect_matchings(keys: &[Key]) -> Vec<Matching> {
    fn extend(remaining: &[Key], current: &mut Vec<(Key, Key)>, out: &mut Vec<Matching>) {
        let Some((first, rest)) = remaining.split_first() else {
            out.push(
                current
                    .iter()
                    .flat_map(|(a, b)| [(a.clone(), b.clone()), (b.clone(), a.clone())])
                    .collect(),
            );
            return;
        };
        for (i, partner) in rest.iter().enumerate() {
            let mut next = rest.to_vec();
            next.remove(i);
            current.push((first.clone(), partner.clone()));
            extend(&next, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    extend(keys, &mut Vec::new(), &mut out);
    out
}

fn stable_matching_exists(prefs: &Preferences) -> bool {
    let keys: Vec<Key> = prefs.keys().cloned().collect();
    perfect_matchings(&keys)
        .iter()
        .any(|m| MatchingAnalysis::is_stable_roommates(prefs, m))
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Gale-Shapley always finds a complete, symmetric matching with no blocking pair.
    #[test]
    fn marriage_is_complete_and_stable((alpha, beta) in arb_marriage()) {
        let matching = solve_marriage(&alpha, &beta).unwrap();

        prop_assert_eq!(matching.len(), alpha.len() + beta.len());
        prop_assert!(matching.is_symmetric());
        prop_assert!(
            MatchingAnalysis::is_stable_marriage(&alpha, &beta, &matching),
            "blocking pairs: {:?}",
            MatchingAnalysis::blocking_pairs_marriage(&alpha, &beta, &matching)
        );
    }

    /// The proposer-optimal matching does not depend on entry order.
    #[test]
    fn marriage_is_order_independent(
        ((alpha, beta), alpha_order, beta_order) in arb_marriage().prop_flat_map(|(alpha, beta)| {
            let (na, nb) = (alpha.len(), beta.len());
            (Just((alpha, beta)), arb_order(na), arb_order(nb))
        })
    ) {
        let baseline = solve_marriage(&alpha, &beta).unwrap();
        let shuffled = solve_marriage(alpha.permuted(&alpha_order), beta.permuted(&beta_order)).unwrap();
        prop_assert!(baseline.same_pairs(&shuffled));
    }

    /// Either a stable matching is returned, or none exists at all.
    #[test]
    fn roommates_agree_with_exhaustive_search(prefs in arb_roommates()) {
        let exists = stable_matching_exists(&prefs);
        match solve_roommates(&prefs) {
            Ok(matching) => {
                prop_assert!(exists);
                prop_assert_eq!(matching.len(), prefs.len());
                prop_assert!(matching.is_symmetric());
                prop_assert!(
                    MatchingAnalysis::is_stable_roommates(&prefs, &matching),
                    "blocking pairs: {:?}",
                    MatchingAnalysis::blocking_pairs_roommates(&prefs, &matching)
                );
            }
            Err(MatchingError::NoStableSolution) => prop_assert!(!exists),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    /// Solvability does not depend on entry order.
    #[test]
    fn roommates_solvability_is_order_independent(
        (prefs, order) in arb_roommates().prop_flat_map(|prefs| {
            let n = prefs.len();
            (Just(prefs), arb_order(n))
        })
    ) {
        let baseline = solve_roommates(&prefs);
        let shuffled = solve_roommates(prefs.permuted(&order));
        prop_assert_eq!(baseline.is_ok(), shuffled.is_ok());
        if let Ok(matching) = shuffled {
            prop_assert!(MatchingAnalysis::is_stable_roommates(&prefs, &matching));
        }
    }
}
