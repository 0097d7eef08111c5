// analysis.rs - Stability audits of a matching against the input preferences
use crate::key::Key;
use crate::matching::Matching;
use crate::preferences::Preferences;
use rustc_hash::FxHashMap as HashMap;

/// Analysis tools for solved matchings
pub struct MatchingAnalysis;

/// Two participants not matched to each other who both prefer each other to
/// their current partners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockingPair {
    pub first: Key,
    pub second: Key,
}

impl MatchingAnalysis {
    /// Every blocking pair `(alpha, beta)` of a marriage matching.
    pub fn blocking_pairs_marriage(
        alpha: &Preferences,
        beta: &Preferences,
        matching: &Matching,
    ) -> Vec<BlockingPair> {
        let mut blocking = Vec::new();
        for (a, list) in alpha.iter() {
            for b in list {
                if matching.get(a) == Some(b) {
                    continue;
                }
                let a_wants = prefers(list, b, matching.get(a));
                let b_wants = beta
                    .get(b)
                    .map_or(false, |b_list| prefers(b_list, a, matching.get(b)));
                if a_wants && b_wants {
                    blocking.push(BlockingPair {
                        first: a.clone(),
                        second: b.clone(),
                    });
                }
            }
        }
        blocking
    }

    /// Every blocking pair of a roommates matching, each reported once with
    /// its members in table order.
    pub fn blocking_pairs_roommates(prefs: &Preferences, matching: &Matching) -> Vec<BlockingPair> {
        let position: HashMap<&Key, usize> = prefs.keys().enumerate().map(|(i, k)| (k, i)).collect();

        let mut blocking = Vec::new();
        for (a, list) in prefs.iter() {
            for b in list {
                if position.get(b).map_or(true, |&pb| pb <= position[a]) {
                    continue;
                }
                if matching.get(a) == Some(b) {
                    continue;
                }
                let a_wants = prefers(list, b, matching.get(a));
                let b_wants = prefs
                    .get(b)
                    .map_or(false, |b_list| prefers(b_list, a, matching.get(b)));
                if a_wants && b_wants {
                    blocking.push(BlockingPair {
                        first: a.clone(),
                        second: b.clone(),
                    });
                }
            }
        }
        blocking
    }

    pub fn is_stable_marriage(alpha: &Preferences, beta: &Preferences, matching: &Matching) -> bool {
        Self::blocking_pairs_marriage(alpha, beta, matching).is_empty()
    }

    pub fn is_stable_roommates(prefs: &Preferences, matching: &Matching) -> bool {
        Self::blocking_pairs_roommates(prefs, matching).is_empty()
    }
}

/// True if `candidate` ranks strictly above `current` in `list`. Being
/// unmatched is worse than any listed candidate.
fn prefers(list: &[Key], candidate: &Key, current: Option<&Key>) -> bool {
    let rank = |k: &Key| list.iter().position(|x| x == k);
    match (rank(candidate), current.and_then(rank)) {
        (Some(c), Some(m)) => c < m,
        (Some(_), None) => true,
        _ => false,
    }
}
