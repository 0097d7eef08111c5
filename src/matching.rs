// matching.rs - Solver output
use crate::key::Key;
use rustc_hash::FxHashMap as HashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A solved matching: every participant mapped to its partner, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    pairs: Vec<(Key, Key)>,
    index: HashMap<Key, usize>,
}

impl Matching {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, participant: Key, partner: Key) {
        self.index.insert(participant.clone(), self.pairs.len());
        self.pairs.push((participant, partner));
    }

    /// The partner matched with `participant`.
    pub fn get(&self, participant: &Key) -> Option<&Key> {
        self.index.get(participant).map(|&i| &self.pairs[i].1)
    }

    /// Convenience lookup accepting anything convertible into a `Key`.
    pub fn partner_of(&self, participant: impl Into<Key>) -> Option<&Key> {
        self.get(&participant.into())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Key)> {
        self.pairs.iter().map(|(a, b)| (a, b))
    }

    pub fn pairs(&self) -> &[(Key, Key)] {
        &self.pairs
    }

    /// True if every entry's partner maps back to it.
    pub fn is_symmetric(&self) -> bool {
        self.pairs
            .iter()
            .all(|(a, b)| self.get(b).map_or(false, |back| back == a))
    }

    /// Compares the mapping itself, ignoring entry order.
    pub fn same_pairs(&self, other: &Matching) -> bool {
        self.len() == other.len() && self.iter().all(|(a, b)| other.get(a) == Some(b))
    }
}

impl<K: Into<Key>, V: Into<Key>> FromIterator<(K, V)> for Matching {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut matching = Matching::new();
        for (k, v) in iter {
            matching.push(k.into(), v.into());
        }
        matching
    }
}

impl Serialize for Matching {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (k, v) in &self.pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
