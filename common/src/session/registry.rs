use super::GameSession;
use crate::identifiers::GameId;
use std::collections::HashMap;

/// What a registry mutation did, for forwarding to derived views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryChange {
    Added(GameId),
    Updated(GameId),
    Removed(GameId),
}

impl RegistryChange {
    pub fn game_id(&self) -> GameId {
        match *self {
            RegistryChange::Added(id)
            | RegistryChange::Updated(id)
            | RegistryChange::Removed(id) => id,
        }
    }
}

struct Entry {
    seq: u64,
    session: GameSession,
}

/// Live, order-preserving collection of session records. Order is
/// announce order; updates keep a record's position and sequence
/// number stable. Records are created and destroyed only here.
pub struct SessionRegistry {
    entries: Vec<Entry>,
    index: HashMap<GameId, usize>,
    next_seq: u64,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Inserts a new record or replaces the fields of an existing one.
    pub fn upsert(&mut self, session: GameSession) -> RegistryChange {
        let id = session.id;
        if let Some(&position) = self.index.get(&id) {
            self.entries[position].session = session;
            RegistryChange::Updated(id)
        } else {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.entries.push(Entry { seq, session });
            self.index.insert(id, self.entries.len() - 1);
            RegistryChange::Added(id)
        }
    }

    /// Mutates a record in place, reporting an update if it exists.
    pub fn update<F>(&mut self, id: GameId, mutate: F) -> Option<RegistryChange>
    where
        F: FnOnce(&mut GameSession),
    {
        let &position = self.index.get(&id)?;
        mutate(&mut self.entries[position].session);
        Some(RegistryChange::Updated(id))
    }

    pub fn remove(&mut self, id: GameId) -> Option<RegistryChange> {
        let position = self.index.remove(&id)?;
        self.entries.remove(position);
        for entry in &self.entries[position..] {
            if let Some(stored) = self.index.get_mut(&entry.session.id) {
                *stored -= 1;
            }
        }
        Some(RegistryChange::Removed(id))
    }

    pub fn get(&self, id: GameId) -> Option<&GameSession> {
        self.index
            .get(&id)
            .map(|&position| &self.entries[position].session)
    }

    /// Monotone announce-order key for a record. Views use this to
    /// keep derived collections in backing order.
    pub fn seq_of(&self, id: GameId) -> Option<u64> {
        self.index.get(&id).map(|&position| self.entries[position].seq)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameSession> {
        self.entries.iter().map(|entry| &entry.session)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GameStatus;

    fn session(id: u32, title: &str) -> GameSession {
        GameSession {
            id: GameId::new(id),
            title: title.to_string(),
            host: "host".to_string(),
            map_name: "delta_crossing".to_string(),
            featured_mod: "vanilla".to_string(),
            num_players: 1,
            max_players: 4,
            min_rating: 0,
            max_rating: 3000,
            password_protected: false,
            teams: vec![],
            status: GameStatus::Open,
        }
    }

    #[test]
    fn test_upsert_reports_added_then_updated() {
        let mut registry = SessionRegistry::new();
        assert_eq!(
            registry.upsert(session(1, "first")),
            RegistryChange::Added(GameId::new(1))
        );
        assert_eq!(
            registry.upsert(session(1, "renamed")),
            RegistryChange::Updated(GameId::new(1))
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(GameId::new(1)).unwrap().title, "renamed");
    }

    #[test]
    fn test_iteration_preserves_announce_order() {
        let mut registry = SessionRegistry::new();
        registry.upsert(session(3, "c"));
        registry.upsert(session(1, "a"));
        registry.upsert(session(2, "b"));
        registry.upsert(session(1, "a2"));

        let titles: Vec<&str> = registry.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a2", "b"]);
    }

    #[test]
    fn test_update_mutates_in_place() {
        let mut registry = SessionRegistry::new();
        registry.upsert(session(1, "a"));
        let seq_before = registry.seq_of(GameId::new(1)).unwrap();

        let change = registry.update(GameId::new(1), |s| s.num_players = 3);
        assert_eq!(change, Some(RegistryChange::Updated(GameId::new(1))));
        assert_eq!(registry.get(GameId::new(1)).unwrap().num_players, 3);
        assert_eq!(registry.seq_of(GameId::new(1)), Some(seq_before));
    }

    #[test]
    fn test_remove_fixes_index_of_later_entries() {
        let mut registry = SessionRegistry::new();
        registry.upsert(session(1, "a"));
        registry.upsert(session(2, "b"));
        registry.upsert(session(3, "c"));

        assert_eq!(
            registry.remove(GameId::new(2)),
            Some(RegistryChange::Removed(GameId::new(2)))
        );
        assert_eq!(registry.remove(GameId::new(2)), None);
        assert_eq!(registry.get(GameId::new(3)).unwrap().title, "c");

        let ids: Vec<u32> = registry.iter().map(|s| s.id.value()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_seq_is_monotone_across_removals() {
        let mut registry = SessionRegistry::new();
        registry.upsert(session(1, "a"));
        registry.upsert(session(2, "b"));
        registry.remove(GameId::new(2));
        registry.upsert(session(4, "d"));

        assert!(registry.seq_of(GameId::new(4)).unwrap() > registry.seq_of(GameId::new(1)).unwrap());
    }
}
