//arena.rs
use crate::error::{MatchingError, Result};
use crate::key::Key;
use crate::participant::{Participant, PreferenceSequence};
use crate::preferences::Preferences;
use crate::table::{PartnerResolution, PreferenceTable};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a participant owned by a `MatchingArena`.
    pub struct ParticipantId;
    /// Handle to a preference table owned by a `MatchingArena`.
    pub struct TableId;
}

/// Owner of every participant and table of one solve call.
///
/// Participants refer to each other only through `ParticipantId` handles, so
/// acceptance and rejection are handle updates with no ownership cycles.
#[derive(Debug, Default)]
pub struct MatchingArena {
    participants: SlotMap<ParticipantId, Participant>,
    tables: SlotMap<TableId, PreferenceTable>,
}

impl MatchingArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table of participant shells, one per key, in key order.
    /// The shells carry no preferences until the table is linked.
    pub fn create_table<I>(&mut self, keys: I) -> TableId
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let table_id = self.tables.insert(PreferenceTable::new());
        let mut table = PreferenceTable::new();
        for key in keys {
            let key = key.into();
            let id = self.participants.insert(Participant::new(key.clone(), table_id));
            table.push_member(key, id);
        }
        self.tables[table_id] = table;
        table_id
    }

    /// Links a roommates table: preference keys resolve within the table itself.
    pub fn link_self(&mut self, table: TableId, prefs: &Preferences) -> Result<()> {
        self.fill_preferences(table, table, prefs)?;
        self.table_mut(table)?.set_partners(PartnerResolution::SelfReferencing);
        Ok(())
    }

    /// Links a marriage pair: each table's preference keys resolve in the other.
    pub fn link_pair(
        &mut self,
        alpha: TableId,
        beta: TableId,
        alpha_prefs: &Preferences,
        beta_prefs: &Preferences,
    ) -> Result<()> {
        self.fill_preferences(alpha, beta, alpha_prefs)?;
        self.fill_preferences(beta, alpha, beta_prefs)?;
        self.table_mut(alpha)?.set_partners(PartnerResolution::External(beta));
        self.table_mut(beta)?.set_partners(PartnerResolution::External(alpha));
        Ok(())
    }

    fn fill_preferences(&mut self, table: TableId, partner: TableId, prefs: &Preferences) -> Result<()> {
        let own = self.table(table)?;
        if own.is_linked() {
            return Err(MatchingError::consistency_violation("table is already linked"));
        }
        let resolver = self.table(partner)?;

        let mut resolved = Vec::with_capacity(prefs.len());
        for (key, list) in prefs.iter() {
            let id = own.find(key).ok_or_else(|| {
                MatchingError::consistency_violation(format!("no participant for key {}", key))
            })?;
            let sequence = list
                .iter()
                .map(|k| {
                    resolver.find(k).ok_or_else(|| {
                        MatchingError::consistency_violation(format!(
                            "preference {} of {} does not resolve",
                            k, key
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            resolved.push((id, sequence));
        }

        if resolved.len() != own.len() {
            return Err(MatchingError::consistency_violation(format!(
                "{} preference lists for {} participants",
                resolved.len(),
                own.len()
            )));
        }

        for (id, sequence) in resolved {
            let participant = self.participant_mut(id)?;
            participant.preferences = PreferenceSequence::new(sequence);
        }
        Ok(())
    }

    pub fn table(&self, id: TableId) -> Result<&PreferenceTable> {
        self.tables
            .get(id)
            .ok_or_else(|| MatchingError::consistency_violation("unknown table handle"))
    }

    fn table_mut(&mut self, id: TableId) -> Result<&mut PreferenceTable> {
        self.tables
            .get_mut(id)
            .ok_or_else(|| MatchingError::consistency_violation("unknown table handle"))
    }

    /// Returns the table only once its preferences are linked; phases go
    /// through here so they never observe a half-built table.
    pub fn linked_table(&self, id: TableId) -> Result<&PreferenceTable> {
        let table = self.table(id)?;
        if !table.is_linked() {
            return Err(MatchingError::Unlinked);
        }
        Ok(table)
    }

    pub fn participant(&self, id: ParticipantId) -> Result<&Participant> {
        self.participants
            .get(id)
            .ok_or_else(|| MatchingError::consistency_violation("unknown participant handle"))
    }

    fn participant_mut(&mut self, id: ParticipantId) -> Result<&mut Participant> {
        self.participants
            .get_mut(id)
            .ok_or_else(|| MatchingError::consistency_violation("unknown participant handle"))
    }

    #[inline]
    pub fn preferences(&self, id: ParticipantId) -> Result<&PreferenceSequence> {
        Ok(&self.participant(id)?.preferences)
    }

    /// The key of a participant, for narration and output.
    pub fn key(&self, id: ParticipantId) -> Key {
        match self.participants.get(id) {
            Some(p) => p.key().clone(),
            None => Key::Str(format!("{:?}", id)),
        }
    }

    /// Records that `acceptor` now holds `proposer`'s proposal.
    pub(crate) fn accept(&mut self, acceptor: ParticipantId, proposer: ParticipantId) -> Result<()> {
        self.participant(proposer)?;
        self.participant_mut(acceptor)?.accepted_from = Some(proposer);
        Ok(())
    }

    /// Removes `a` and `b` from each other's preference sequences and drops
    /// any held proposal between them. This is the only way a sequence shrinks.
    pub(crate) fn reject_mutually(&mut self, a: ParticipantId, b: ParticipantId) -> Result<()> {
        self.participant(a)?;
        self.participant(b)?;
        for (this, other) in [(a, b), (b, a)] {
            let participant = self.participant_mut(this)?;
            participant.preferences.remove(other);
            if participant.accepted_from == Some(other) {
                participant.accepted_from = None;
            }
        }
        Ok(())
    }

    /// The participant in `proposer`'s remaining list that holds its proposal.
    pub fn current_acceptor(&self, proposer: ParticipantId) -> Result<Option<ParticipantId>> {
        for candidate in self.preferences(proposer)?.iter() {
            if self.participant(candidate)?.accepted_from == Some(proposer) {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Members of `table` whose proposal no one on the accepting side holds,
    /// in table order. The answer comes from the acceptors' back-pointers.
    pub fn unmatched(&self, table: TableId) -> Result<SmallVec<[ParticipantId; 8]>> {
        let proposers = self.linked_table(table)?;
        let acceptor_table = proposers
            .acceptor_table(table)
            .ok_or(MatchingError::Unlinked)?;
        let acceptors = self.linked_table(acceptor_table)?;

        let mut held = rustc_hash::FxHashSet::default();
        for &id in acceptors.members() {
            if let Some(proposer) = self.participant(id)?.accepted_from {
                held.insert(proposer);
            }
        }

        Ok(proposers
            .members()
            .iter()
            .copied()
            .filter(|id| !held.contains(id))
            .collect())
    }

    /// Stable means no member's preference list is exhausted.
    pub fn is_stable(&self, table: TableId) -> Result<bool> {
        for &id in self.linked_table(table)?.members() {
            if self.preferences(id)?.is_empty() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Complete means every member has exactly one remaining preference.
    pub fn is_complete(&self, table: TableId) -> Result<bool> {
        for &id in self.linked_table(table)?.members() {
            if self.preferences(id)?.len() != 1 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The remaining preference lists of `table`, keyed and ordered like the input.
    pub fn remaining_preferences(&self, table: TableId) -> Result<Preferences> {
        let mut out = Preferences::new();
        for &id in self.linked_table(table)?.members() {
            let list: Vec<Key> = self.preferences(id)?.iter().map(|p| self.key(p)).collect();
            out.insert(self.key(id), list);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences;

    fn roommates() -> (MatchingArena, TableId) {
        let prefs = preferences! {
            "A" => ["B", "C", "D"],
            "B" => ["C", "A", "D"],
            "C" => ["A", "B", "D"],
            "D" => ["A", "B", "C"],
        };
        let mut arena = MatchingArena::new();
        let table = arena.create_table(prefs.keys().cloned());
        arena.link_self(table, &prefs).unwrap();
        (arena, table)
    }

    fn id(arena: &MatchingArena, table: TableId, key: &str) -> ParticipantId {
        arena.table(table).unwrap().find(&Key::from(key)).unwrap()
    }

    #[test]
    fn test_unlinked_table_is_not_exposed() {
        let mut arena = MatchingArena::new();
        let table = arena.create_table(["A", "B"]);
        assert_eq!(arena.table(table).unwrap().partners(), None);
        assert!(matches!(arena.linked_table(table), Err(MatchingError::Unlinked)));

        let empty = arena.create_table(Vec::<Key>::new());
        assert!(arena.table(empty).unwrap().is_empty());
        assert!(!arena.table(table).unwrap().is_empty());
        assert!(matches!(arena.unmatched(table), Err(MatchingError::Unlinked)));
    }

    #[test]
    fn test_link_twice_is_rejected() {
        let (mut arena, table) = roommates();
        let prefs = arena.remaining_preferences(table).unwrap();
        assert!(matches!(
            arena.link_self(table, &prefs),
            Err(MatchingError::ConsistencyViolation { .. })
        ));
    }

    #[test]
    fn test_link_resolves_in_order() {
        let (arena, table) = roommates();
        assert_eq!(
            arena.table(table).unwrap().partners(),
            Some(PartnerResolution::SelfReferencing)
        );
        let snapshot = arena.remaining_preferences(table).unwrap();
        assert_eq!(
            snapshot.get(&Key::from("B")).unwrap(),
            &[Key::from("C"), Key::from("A"), Key::from("D")]
        );
        let keys: Vec<_> = snapshot.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_link_pair_resolves_across_tables() {
        let alpha = preferences! { 1 => [3, 4], 2 => [4, 3] };
        let beta = preferences! { 3 => [2, 1], 4 => [1, 2] };
        let mut arena = MatchingArena::new();
        let a = arena.create_table(alpha.keys().cloned());
        let b = arena.create_table(beta.keys().cloned());
        arena.link_pair(a, b, &alpha, &beta).unwrap();

        let one = arena.table(a).unwrap().find(&Key::Int(1)).unwrap();
        let three = arena.table(b).unwrap().find(&Key::Int(3)).unwrap();
        assert_eq!(arena.preferences(one).unwrap().first(), Some(three));
        assert_eq!(arena.participant(three).unwrap().table(), b);
        assert_eq!(arena.table(a).unwrap().acceptor_table(a), Some(b));
        assert_eq!(arena.table(a).unwrap().partners(), Some(PartnerResolution::External(b)));
        assert_eq!(arena.table(b).unwrap().partners(), Some(PartnerResolution::External(a)));
    }

    #[test]
    fn test_reject_mutually_is_symmetric() {
        let (mut arena, table) = roommates();
        let a = id(&arena, table, "A");
        let b = id(&arena, table, "B");

        arena.accept(b, a).unwrap();
        arena.reject_mutually(a, b).unwrap();

        assert!(!arena.preferences(a).unwrap().contains(b));
        assert!(!arena.preferences(b).unwrap().contains(a));
        assert_eq!(arena.participant(b).unwrap().accepted_from(), None);
    }

    #[test]
    fn test_unmatched_uses_acceptor_back_pointers() {
        let (mut arena, table) = roommates();
        let a = id(&arena, table, "A");
        let b = id(&arena, table, "B");

        assert_eq!(arena.unmatched(table).unwrap().len(), 4);
        arena.accept(b, a).unwrap();
        let unmatched = arena.unmatched(table).unwrap();
        assert_eq!(unmatched.len(), 3);
        assert!(!unmatched.contains(&a));
        assert_eq!(arena.current_acceptor(a).unwrap(), Some(b));
    }

    #[test]
    fn test_stability_and_completion() {
        let (mut arena, table) = roommates();
        assert!(arena.is_stable(table).unwrap());
        assert!(!arena.is_complete(table).unwrap());

        let a = id(&arena, table, "A");
        let d = id(&arena, table, "D");
        for key in ["B", "C"] {
            let other = id(&arena, table, key);
            arena.reject_mutually(d, other).unwrap();
        }
        arena.reject_mutually(d, a).unwrap();
        assert!(!arena.is_stable(table).unwrap());
    }
}
