// table.rs - Preference tables
use crate::arena::{ParticipantId, TableId};
use crate::key::Key;
use rustc_hash::FxHashMap as HashMap;

/// Where a table resolves the keys found in its members' preference lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartnerResolution {
    /// Roommates: preferences name members of the same table.
    SelfReferencing,
    /// Marriage: preferences name members of the partner table.
    External(TableId),
}

/// An ordered set of participants, addressed by key.
///
/// Member order is the input's key order and drives every deterministic
/// choice a phase makes ("first unmatched", "first with several entries").
#[derive(Debug, Clone, Default)]
pub struct PreferenceTable {
    members: Vec<ParticipantId>,
    lookup: HashMap<Key, ParticipantId>,
    partners: Option<PartnerResolution>,
}

impl PreferenceTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_member(&mut self, key: Key, id: ParticipantId) {
        self.lookup.insert(key, id);
        self.members.push(id);
    }

    pub(crate) fn set_partners(&mut self, partners: PartnerResolution) {
        self.partners = Some(partners);
    }

    #[inline]
    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn find(&self, key: &Key) -> Option<ParticipantId> {
        self.lookup.get(key).copied()
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.partners.is_some()
    }

    #[inline]
    pub fn partners(&self) -> Option<PartnerResolution> {
        self.partners
    }

    /// The table whose members hold this table's proposals. `own_id` is this
    /// table's handle in the arena.
    pub fn acceptor_table(&self, own_id: TableId) -> Option<TableId> {
        match self.partners? {
            PartnerResolution::SelfReferencing => Some(own_id),
            PartnerResolution::External(other) => Some(other),
        }
    }
}
