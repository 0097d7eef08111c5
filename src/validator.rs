// validator.rs - Structural checks on raw preference input
//!
//! Runs before any participant exists and never mutates its input. The checks
//! run in a fixed order and stop at the first failure:
//!
//! 1. every value is a list (`InputShape`)
//! 2. the table and every list are non-empty (`EmptyInput`)
//! 3. roommates only: the key count is even (`Cardinality`)
//! 4. keys and list entries are all integers or all strings (`TypeConsistency`)
//! 5. marriage only: both sides have the same size (`SideSizes`)
//! 6. every list is exactly the expected partner set (`Symmetry`)

use crate::error::{MatchingError, Result};
use crate::key::{Key, KeyKind};
use crate::preferences::{Preferences, RawPreferences, RawValue};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// Validates raw input and returns it in typed form.
pub struct Validator;

impl Validator {
    /// Validates a marriage pair. Each side's lists must name exactly the
    /// other side's keys.
    pub fn validate_marriage(
        alpha: &RawPreferences,
        beta: &RawPreferences,
    ) -> Result<(Preferences, Preferences)> {
        let alpha_kind = Self::check_structure(alpha, false)?;
        let beta_kind = Self::check_structure(beta, false)?;
        if alpha_kind != beta_kind {
            let entry = alpha.keys().next().map(|k| k.to_string()).unwrap_or_default();
            let value = beta.keys().next().map(|k| k.to_string()).unwrap_or_default();
            return Err(MatchingError::type_consistency(entry, value));
        }
        if alpha.len() != beta.len() {
            return Err(MatchingError::SideSizes {
                alpha: alpha.len(),
                beta: beta.len(),
            });
        }

        let alpha = typed(alpha);
        let beta = typed(beta);
        check_symmetry(&alpha, |_| beta.keys().cloned().collect())?;
        check_symmetry(&beta, |_| alpha.keys().cloned().collect())?;
        Ok((alpha, beta))
    }

    /// Validates a roommates table. Each list must name every other key.
    pub fn validate_roommates(prefs: &RawPreferences) -> Result<Preferences> {
        Self::check_structure(prefs, true)?;

        let prefs = typed(prefs);
        let keys: Vec<Key> = prefs.keys().cloned().collect();
        check_symmetry(&prefs, |own| keys.iter().filter(|k| *k != own).cloned().collect())?;
        Ok(prefs)
    }

    /// Checks 1 to 4 and returns the table's key kind.
    fn check_structure(table: &RawPreferences, require_even: bool) -> Result<KeyKind> {
        // 1. shape
        for (key, value) in table.iter() {
            if value.as_list().is_none() {
                return Err(MatchingError::input_shape(key.to_string()));
            }
        }

        // 2. presence
        if table.is_empty() {
            return Err(MatchingError::empty_table());
        }
        for (key, value) in table.iter() {
            if value.as_list().map_or(true, |list| list.is_empty()) {
                return Err(MatchingError::empty_list(key.to_string()));
            }
        }

        // 3. cardinality
        if require_even && table.len() % 2 != 0 {
            return Err(MatchingError::cardinality(table.len()));
        }

        // 4. kinds
        let mut anchor = None;
        for (key, value) in table.iter() {
            check_kind(key, key, &mut anchor)?;
            for item in value.as_list().unwrap_or_default() {
                check_kind(key, item, &mut anchor)?;
            }
        }
        anchor.ok_or_else(MatchingError::empty_table)
    }
}

fn check_kind(entry: &RawValue, value: &RawValue, anchor: &mut Option<KeyKind>) -> Result<()> {
    let kind = match value.as_key() {
        Some(key) => key.kind(),
        None => return Err(MatchingError::type_consistency(entry.to_string(), value.to_string())),
    };
    match anchor {
        Some(expected) if *expected != kind => Err(MatchingError::type_consistency(
            entry.to_string(),
            value.to_string(),
        )),
        Some(_) => Ok(()),
        None => {
            *anchor = Some(kind);
            Ok(())
        }
    }
}

/// Converts a table that passed checks 1 to 4.
fn typed(raw: &RawPreferences) -> Preferences {
    raw.iter()
        .filter_map(|(key, value)| {
            let key = key.as_key()?;
            let list: Vec<Key> = value.as_list()?.iter().filter_map(RawValue::as_key).collect();
            Some((key, list))
        })
        .collect()
}

fn check_symmetry<F>(prefs: &Preferences, expected_for: F) -> Result<()>
where
    F: Fn(&Key) -> Vec<Key>,
{
    for (key, actual) in prefs.iter() {
        let mut expected = expected_for(key);
        let mut sorted = actual.to_vec();
        expected.sort();
        sorted.sort();
        if expected == sorted {
            continue;
        }

        let expected_set: HashSet<&Key> = expected.iter().collect();
        let actual_set: HashSet<&Key> = actual.iter().collect();
        let mut counts: HashMap<&Key, usize> = HashMap::default();
        for k in actual {
            *counts.entry(k).or_insert(0) += 1;
        }

        let mut extra = Vec::new();
        let mut duplicated = Vec::new();
        for k in actual {
            if !expected_set.contains(k) && !extra.contains(k) {
                extra.push(k.clone());
            }
            if counts[k] > 1 && !duplicated.contains(k) {
                duplicated.push(k.clone());
            }
        }
        let missing = expected_for(key)
            .into_iter()
            .filter(|k| !actual_set.contains(k))
            .collect();

        return Err(MatchingError::Symmetry {
            key: key.clone(),
            extra,
            missing,
            duplicated,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences;

    fn ints(pairs: &[(i64, &[i64])]) -> RawPreferences {
        let mut raw = RawPreferences::new();
        for (k, list) in pairs {
            raw.insert(*k, list.to_vec());
        }
        raw
    }

    #[test]
    fn test_valid_roommates() {
        let raw = ints(&[(1, &[2, 3, 4]), (2, &[3, 4, 1]), (3, &[4, 1, 2]), (4, &[1, 2, 3])]);
        let prefs = Validator::validate_roommates(&raw).unwrap();
        assert_eq!(prefs.len(), 4);
        assert_eq!(prefs.get(&Key::Int(2)).unwrap(), &[Key::Int(3), Key::Int(4), Key::Int(1)]);
    }

    #[test]
    fn test_value_not_a_list() {
        let raw = RawPreferences::from_json_str(r#"{"1": {"foo": "bar"}, "2": ["1"]}"#).unwrap();
        let err = Validator::validate_roommates(&raw).unwrap_err();
        assert!(matches!(err, MatchingError::InputShape { ref entry } if entry == "1"));
        assert!(err.is_invalid_preferences());
    }

    #[test]
    fn test_empty_table() {
        let err = Validator::validate_roommates(&RawPreferences::new()).unwrap_err();
        assert!(matches!(err, MatchingError::EmptyInput { entry: None }));
    }

    #[test]
    fn test_empty_list() {
        let raw = ints(&[(1, &[]), (2, &[3, 4, 1]), (3, &[4, 1, 2]), (4, &[1, 2, 3])]);
        let err = Validator::validate_roommates(&raw).unwrap_err();
        assert!(matches!(err, MatchingError::EmptyInput { entry: Some(ref e) } if e == "1"));
    }

    #[test]
    fn test_odd_roommates() {
        let raw = ints(&[(1, &[2, 3]), (2, &[3, 1]), (3, &[1, 2])]);
        let err = Validator::validate_roommates(&raw).unwrap_err();
        assert!(matches!(err, MatchingError::Cardinality { count: 3 }));
    }

    #[test]
    fn test_cardinality_precedes_kind_check() {
        let raw = RawPreferences::new()
            .with(1, vec![2.5, 3.0])
            .with(2, vec![1.0, 3.0])
            .with(3, vec![1.0, 2.0]);
        let err = Validator::validate_roommates(&raw).unwrap_err();
        assert!(matches!(err, MatchingError::Cardinality { count: 3 }));
    }

    #[test]
    fn test_float_keys() {
        let raw = RawPreferences::new()
            .with(1.0, vec![2, 3, 4])
            .with(2.0, vec![3, 4, 1])
            .with(3.0, vec![4, 1, 2])
            .with(4.0, vec![1, 2, 3]);
        let err = Validator::validate_roommates(&raw).unwrap_err();
        assert!(matches!(err, MatchingError::TypeConsistency { ref entry, .. } if entry == "1.0"));
    }

    #[test]
    fn test_mixed_kinds() {
        let raw = RawPreferences::new()
            .with(1, vec![RawValue::from("B"), RawValue::Int(3), RawValue::Int(4)])
            .with("B", vec![3, 4, 1])
            .with(3, vec![RawValue::Int(4), RawValue::Int(1), RawValue::from("B")])
            .with(4, vec![RawValue::Int(1), RawValue::from("B"), RawValue::Int(3)]);
        let err = Validator::validate_roommates(&raw).unwrap_err();
        assert!(matches!(
            err,
            MatchingError::TypeConsistency { ref entry, ref value } if entry == "1" && value == "B"
        ));
    }

    #[test]
    fn test_missing_partner() {
        let raw = ints(&[(1, &[2, 3]), (2, &[3, 4, 1]), (3, &[4, 1, 2]), (4, &[1, 2, 3])]);
        match Validator::validate_roommates(&raw).unwrap_err() {
            MatchingError::Symmetry { key, extra, missing, .. } => {
                assert_eq!(key, Key::Int(1));
                assert!(extra.is_empty());
                assert_eq!(missing, vec![Key::Int(4)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_partner() {
        let raw = ints(&[(1, &[2, 4, 3, 9]), (2, &[3, 4, 1]), (3, &[4, 1, 2]), (4, &[1, 2, 3])]);
        let err = Validator::validate_roommates(&raw).unwrap_err();
        assert!(err.to_string().starts_with("Entry 1 has invalid preferences."));
        match err {
            MatchingError::Symmetry { extra, missing, .. } => {
                assert_eq!(extra, vec![Key::Int(9)]);
                assert!(missing.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicated_partner() {
        let raw = ints(&[(1, &[2, 2, 3]), (2, &[3, 4, 1]), (3, &[4, 1, 2]), (4, &[1, 2, 3])]);
        match Validator::validate_roommates(&raw).unwrap_err() {
            MatchingError::Symmetry { duplicated, missing, .. } => {
                assert_eq!(duplicated, vec![Key::Int(2)]);
                assert_eq!(missing, vec![Key::Int(4)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_preference_is_extra() {
        let raw = ints(&[(1, &[1, 2]), (2, &[1, 1])]);
        match Validator::validate_roommates(&raw).unwrap_err() {
            MatchingError::Symmetry { key, extra, .. } => {
                assert_eq!(key, Key::Int(1));
                assert_eq!(extra, vec![Key::Int(1)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_marriage_with_odd_sides() {
        let alpha = ints(&[(1, &[4, 5, 6]), (2, &[5, 6, 4]), (3, &[6, 4, 5])]);
        let beta = ints(&[(4, &[1, 2, 3]), (5, &[2, 3, 1]), (6, &[3, 1, 2])]);
        let (a, b) = Validator::validate_marriage(&alpha, &beta).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_marriage_checks_both_directions() {
        let alpha = RawPreferences::from(preferences! { 1 => [3, 4], 2 => [4, 3] });
        let beta = RawPreferences::from(preferences! { 3 => [1, 2], 4 => [2, 5] });
        match Validator::validate_marriage(&alpha, &beta).unwrap_err() {
            MatchingError::Symmetry { key, extra, missing, .. } => {
                assert_eq!(key, Key::Int(4));
                assert_eq!(extra, vec![Key::Int(5)]);
                assert_eq!(missing, vec![Key::Int(1)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_marriage_sides_share_one_kind() {
        let alpha = RawPreferences::from(preferences! { "A" => ["B"] });
        let beta = RawPreferences::from(preferences! { 1 => [2] });
        match Validator::validate_marriage(&alpha, &beta).unwrap_err() {
            MatchingError::TypeConsistency { entry, value } => {
                assert_eq!(entry, "A");
                assert_eq!(value, "1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_marriage_sides_must_match_in_size() {
        let alpha = RawPreferences::from(preferences! { 1 => [3, 4, 5], 2 => [5, 4, 3] });
        let beta = RawPreferences::from(preferences! { 3 => [1, 2], 4 => [2, 1], 5 => [1, 2] });
        let err = Validator::validate_marriage(&alpha, &beta).unwrap_err();
        assert!(matches!(err, MatchingError::SideSizes { alpha: 2, beta: 3 }));
    }

    #[test]
    fn test_marriage_empty_side() {
        let alpha = RawPreferences::new();
        let beta = RawPreferences::from(preferences! { 3 => [1, 2] });
        let err = Validator::validate_marriage(&alpha, &beta).unwrap_err();
        assert!(matches!(err, MatchingError::EmptyInput { entry: None }));
    }
}
