// preferences.rs - Raw and validated preference input
//!
//! Both mappings keep insertion order. Participant and output order follow it,
//! so results are reproducible for a given input.

use crate::error::{MatchingError, Result};
use crate::key::Key;
use rustc_hash::FxHashMap as HashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A loosely typed input value, as it arrives before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i64),
    Str(String),
    List(Vec<RawValue>),
    /// Anything else: floats, booleans, null, nested objects.
    Other(serde_json::Value),
}

impl RawValue {
    /// Returns the value as a `Key` when it is an integer or string scalar.
    pub fn as_key(&self) -> Option<Key> {
        match self {
            RawValue::Int(i) => Some(Key::Int(*i)),
            RawValue::Str(s) => Some(Key::Str(s.clone())),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => RawValue::Str(s),
            serde_json::Value::Number(n) if n.is_i64() => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => RawValue::Other(serde_json::Value::Number(n)),
            },
            serde_json::Value::Array(items) => {
                RawValue::List(items.into_iter().map(RawValue::from_json).collect())
            }
            other => RawValue::Other(other),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Str(s) => f.write_str(s),
            RawValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            RawValue::Other(value) => write!(f, "{}", value),
        }
    }
}

impl From<Key> for RawValue {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(i) => RawValue::Int(i),
            Key::Str(s) => RawValue::Str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Str(value.to_string())
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(value as i64)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Other(serde_json::json!(value))
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Unvalidated preference input: an ordered mapping of raw keys to raw values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPreferences {
    entries: Vec<(RawValue, RawValue)>,
}

impl RawPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<RawValue>, value: impl Into<RawValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<RawValue>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RawValue, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &RawValue> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Parses a JSON document. The root must be an object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }
}

impl TryFrom<serde_json::Value> for RawPreferences {
    type Error = MatchingError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => {
                let mut raw = RawPreferences::new();
                for (key, value) in map {
                    raw.insert(RawValue::Str(key), RawValue::from_json(value));
                }
                Ok(raw)
            }
            _ => Err(MatchingError::not_a_mapping()),
        }
    }
}

impl From<Preferences> for RawPreferences {
    fn from(prefs: Preferences) -> Self {
        let entries = prefs
            .entries
            .into_iter()
            .map(|(k, list)| {
                let list = RawValue::List(list.into_iter().map(RawValue::from).collect());
                (RawValue::from(k), list)
            })
            .collect();
        Self { entries }
    }
}

impl From<&Preferences> for RawPreferences {
    fn from(prefs: &Preferences) -> Self {
        RawPreferences::from(prefs.clone())
    }
}

/// Typed preference lists keyed by participant, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    entries: Vec<(Key, Vec<Key>)>,
    positions: HashMap<Key, usize>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a preference list. An existing key keeps its position and gets the new list.
    pub fn insert<K, I>(&mut self, key: K, list: I)
    where
        K: Into<Key>,
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let key = key.into();
        let list: Vec<Key> = list.into_iter().map(Into::into).collect();
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 = list,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, list));
            }
        }
    }

    pub fn with<K, I>(mut self, key: K, list: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        self.insert(key, list);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Key) -> Option<&[Key]> {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &[Key])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Returns a copy with the entries reordered by `order`, which must be a
    /// permutation of `0..len()`. Preference lists themselves are untouched.
    pub fn permuted(&self, order: &[usize]) -> Self {
        let mut out = Preferences::new();
        for &i in order {
            if let Some((k, list)) = self.entries.get(i) {
                out.insert(k.clone(), list.iter().cloned());
            }
        }
        out
    }
}

impl<K, V> FromIterator<(K, V)> for Preferences
where
    K: Into<Key>,
    V: IntoIterator,
    V::Item: Into<Key>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut prefs = Preferences::new();
        for (k, v) in iter {
            prefs.insert(k, v);
        }
        prefs
    }
}

impl Serialize for Preferences {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, list) in &self.entries {
            map.serialize_entry(k, list)?;
        }
        map.end()
    }
}
