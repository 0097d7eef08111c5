// participant.rs - Participants and their ranked preference sequences
use crate::arena::{ParticipantId, TableId};
use crate::key::Key;
use smallvec::SmallVec;

/// A participant's ranked list of candidates; index 0 is the most preferred.
///
/// The sequence is filled once when its table is linked and afterwards only
/// shrinks. Entries are never inserted or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSequence {
    entries: SmallVec<[ParticipantId; 8]>,
}

impl PreferenceSequence {
    pub fn new(entries: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<ParticipantId> {
        self.entries.first().copied()
    }

    #[inline]
    pub fn second(&self) -> Option<ParticipantId> {
        self.entries.get(1).copied()
    }

    #[inline]
    pub fn last(&self) -> Option<ParticipantId> {
        self.entries.last().copied()
    }

    /// Position of `id` in the sequence, lower is better.
    #[inline]
    pub fn rank_of(&self, id: ParticipantId) -> Option<usize> {
        self.entries.iter().position(|&e| e == id)
    }

    #[inline]
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.rank_of(id).is_some()
    }

    /// True if `candidate` is ranked strictly better than `incumbent`.
    /// A candidate that is not in the sequence is never preferred.
    pub fn prefers(&self, candidate: ParticipantId, incumbent: ParticipantId) -> bool {
        match (self.rank_of(candidate), self.rank_of(incumbent)) {
            (Some(c), Some(i)) => c < i,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Every entry ranked strictly worse than `id`, in rank order.
    pub fn ranked_below(&self, id: ParticipantId) -> SmallVec<[ParticipantId; 8]> {
        match self.rank_of(id) {
            Some(rank) => self.entries[rank + 1..].iter().copied().collect(),
            None => SmallVec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.entries.iter().copied()
    }

    /// Removes `id`, returning whether it was present. Only the arena calls
    /// this, always paired with the reverse removal.
    pub(crate) fn remove(&mut self, id: ParticipantId) -> bool {
        match self.rank_of(id) {
            Some(rank) => {
                self.entries.remove(rank);
                true
            }
            None => false,
        }
    }
}

/// One member of a preference table.
#[derive(Debug, Clone)]
pub struct Participant {
    key: Key,
    table: TableId,
    pub(crate) preferences: PreferenceSequence,
    pub(crate) accepted_from: Option<ParticipantId>,
}

impl Participant {
    pub(crate) fn new(key: Key, table: TableId) -> Self {
        Self {
            key,
            table,
            preferences: PreferenceSequence::default(),
            accepted_from: None,
        }
    }

    #[inline]
    pub fn key(&self) -> &Key {
        &self.key
    }

    #[inline]
    pub fn table(&self) -> TableId {
        self.table
    }

    #[inline]
    pub fn preferences(&self) -> &PreferenceSequence {
        &self.preferences
    }

    /// The participant whose proposal this participant currently holds.
    #[inline]
    pub fn accepted_from(&self) -> Option<ParticipantId> {
        self.accepted_from
    }
}
