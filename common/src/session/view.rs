use super::{GameFilter, RegistryChange, SessionRegistry};
use crate::identifiers::GameId;
use std::collections::HashMap;

/// Predicate-filtered, always-current view over a `SessionRegistry`,
/// plus the at-most-one selection its detail pane binds to.
///
/// Visible entries are kept sorted by the registry's sequence numbers,
/// so iteration order always equals backing order. Single-record
/// changes are applied by binary search instead of rescanning the
/// registry; only `set_filter` recomputes the whole visible set.
pub struct FilteredGameView {
    filter: GameFilter,
    /// (seq, id), sorted by seq.
    visible: Vec<(u64, GameId)>,
    /// seq of every currently visible id.
    seqs: HashMap<GameId, u64>,
    selected: Option<GameId>,
}

impl FilteredGameView {
    pub fn new(filter: GameFilter) -> Self {
        Self {
            filter,
            visible: Vec::new(),
            seqs: HashMap::new(),
            selected: None,
        }
    }

    /// Replaces the predicate and recomputes the visible set against
    /// every current record. A selection that fell out of the view is
    /// cleared.
    pub fn set_filter(&mut self, registry: &SessionRegistry, filter: GameFilter) {
        self.filter = filter;
        self.visible.clear();
        self.seqs.clear();
        for session in registry.iter() {
            let Some(seq) = registry.seq_of(session.id) else {
                continue;
            };
            if self.filter.matches(session) {
                self.visible.push((seq, session.id));
                self.seqs.insert(session.id, seq);
            }
        }
        if let Some(selected) = self.selected
            && !self.seqs.contains_key(&selected)
        {
            self.selected = None;
        }
    }

    /// Re-evaluates inclusion for the single record named by `change`.
    /// Inclusion is re-checked on every update, not only on status
    /// changes, so membership always reflects current field values.
    pub fn apply(&mut self, registry: &SessionRegistry, change: RegistryChange) {
        match change {
            RegistryChange::Added(id) | RegistryChange::Updated(id) => {
                let included = registry
                    .get(id)
                    .map(|session| self.filter.matches(session))
                    .unwrap_or(false);
                match registry.seq_of(id) {
                    Some(seq) if included => self.insert(seq, id),
                    _ => self.evict(id),
                }
            }
            RegistryChange::Removed(id) => {
                self.evict(id);
            }
        }
    }

    fn insert(&mut self, seq: u64, id: GameId) {
        if self.seqs.contains_key(&id) {
            return;
        }
        let position = self
            .visible
            .binary_search_by_key(&seq, |&(s, _)| s)
            .unwrap_or_else(|p| p);
        self.visible.insert(position, (seq, id));
        self.seqs.insert(id, seq);
    }

    fn evict(&mut self, id: GameId) {
        if let Some(seq) = self.seqs.remove(&id)
            && let Ok(position) = self.visible.binary_search_by_key(&seq, |&(s, _)| s)
        {
            self.visible.remove(position);
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Updates the selection. `None` collapses the detail pane.
    pub fn select(&mut self, id: Option<GameId>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<GameId> {
        self.selected
    }

    pub fn visible(&self) -> impl Iterator<Item = GameId> + '_ {
        self.visible.iter().map(|&(_, id)| id)
    }

    pub fn is_visible(&self, id: GameId) -> bool {
        self.seqs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{GameSession, GameStatus};

    fn session(id: u32, status: GameStatus, password_protected: bool) -> GameSession {
        GameSession {
            id: GameId::new(id),
            title: format!("game {}", id),
            host: format!("host {}", id),
            map_name: "delta_crossing".to_string(),
            featured_mod: "vanilla".to_string(),
            num_players: 1,
            max_players: 8,
            min_rating: 0,
            max_rating: 3000,
            password_protected,
            teams: vec![],
            status,
        }
    }

    fn tracked_upsert(
        registry: &mut SessionRegistry,
        view: &mut FilteredGameView,
        s: GameSession,
    ) {
        let change = registry.upsert(s);
        view.apply(registry, change);
    }

    fn visible_ids(view: &FilteredGameView) -> Vec<u32> {
        view.visible().map(|id| id.value()).collect()
    }

    #[test]
    fn test_set_filter_recomputes_whole_visible_set() {
        let mut registry = SessionRegistry::new();
        registry.upsert(session(1, GameStatus::Open, false));
        registry.upsert(session(2, GameStatus::Playing, false));
        registry.upsert(session(3, GameStatus::Open, true));
        registry.upsert(session(4, GameStatus::Closed, false));

        let mut view = FilteredGameView::new(GameFilter::open_games());
        view.set_filter(&registry, GameFilter::open_games());
        assert_eq!(visible_ids(&view), vec![1, 3]);

        view.set_filter(
            &registry,
            GameFilter::open_games().and(&GameFilter::without_password()),
        );
        assert_eq!(visible_ids(&view), vec![1]);

        // Relaxing the predicate brings excluded records back.
        view.set_filter(&registry, GameFilter::open_games());
        assert_eq!(visible_ids(&view), vec![1, 3]);
    }

    #[test]
    fn test_visible_order_matches_backing_order() {
        let mut registry = SessionRegistry::new();
        let mut view = FilteredGameView::new(GameFilter::open_games());

        tracked_upsert(&mut registry, &mut view, session(7, GameStatus::Open, false));
        tracked_upsert(&mut registry, &mut view, session(2, GameStatus::Playing, false));
        tracked_upsert(&mut registry, &mut view, session(5, GameStatus::Open, false));
        tracked_upsert(&mut registry, &mut view, session(1, GameStatus::Open, false));

        assert_eq!(visible_ids(&view), vec![7, 5, 1]);

        // A record flipping to Open re-enters at its backing position,
        // not at the end.
        let change = registry.update(GameId::new(2), |s| s.status = GameStatus::Open).unwrap();
        view.apply(&registry, change);
        assert_eq!(visible_ids(&view), vec![7, 2, 5, 1]);
    }

    #[test]
    fn test_single_field_mutation_reevaluates_only_that_record() {
        let mut registry = SessionRegistry::new();
        let mut view = FilteredGameView::new(GameFilter::open_games());
        for id in 1..=4 {
            tracked_upsert(&mut registry, &mut view, session(id, GameStatus::Open, false));
        }

        let change = registry.update(GameId::new(2), |s| s.status = GameStatus::Playing).unwrap();
        view.apply(&registry, change);
        assert_eq!(visible_ids(&view), vec![1, 3, 4]);

        // A mutation that does not affect inclusion leaves membership
        // and order untouched.
        let change = registry.update(GameId::new(3), |s| s.num_players = 7).unwrap();
        view.apply(&registry, change);
        assert_eq!(visible_ids(&view), vec![1, 3, 4]);
    }

    #[test]
    fn test_membership_reflects_current_field_values() {
        let mut registry = SessionRegistry::new();
        let mut view = FilteredGameView::new(
            GameFilter::open_games().and(&GameFilter::without_password()),
        );
        tracked_upsert(&mut registry, &mut view, session(1, GameStatus::Open, false));
        assert!(view.is_visible(GameId::new(1)));

        // Non-status mutation still triggers re-evaluation.
        let change = registry
            .update(GameId::new(1), |s| s.password_protected = true)
            .unwrap();
        view.apply(&registry, change);
        assert!(!view.is_visible(GameId::new(1)));
    }

    #[test]
    fn test_removed_record_leaves_view_and_clears_selection() {
        let mut registry = SessionRegistry::new();
        let mut view = FilteredGameView::new(GameFilter::open_games());
        tracked_upsert(&mut registry, &mut view, session(1, GameStatus::Open, false));
        tracked_upsert(&mut registry, &mut view, session(2, GameStatus::Open, false));

        view.select(Some(GameId::new(2)));
        let change = registry.remove(GameId::new(2)).unwrap();
        view.apply(&registry, change);

        assert_eq!(visible_ids(&view), vec![1]);
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn test_selection_cleared_when_filter_excludes_it() {
        let mut registry = SessionRegistry::new();
        registry.upsert(session(1, GameStatus::Open, true));
        registry.upsert(session(2, GameStatus::Open, false));

        let mut view = FilteredGameView::new(GameFilter::open_games());
        view.set_filter(&registry, GameFilter::open_games());
        view.select(Some(GameId::new(1)));

        view.set_filter(
            &registry,
            GameFilter::open_games().and(&GameFilter::without_password()),
        );
        assert_eq!(view.selected(), None);

        view.select(Some(GameId::new(2)));
        view.set_filter(&registry, GameFilter::open_games());
        assert_eq!(view.selected(), Some(GameId::new(2)));
    }

    #[test]
    fn test_select_none_clears_selection() {
        let mut registry = SessionRegistry::new();
        let mut view = FilteredGameView::new(GameFilter::open_games());
        tracked_upsert(&mut registry, &mut view, session(1, GameStatus::Open, false));

        view.select(Some(GameId::new(1)));
        assert_eq!(view.selected(), Some(GameId::new(1)));
        view.select(None);
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn test_duplicate_apply_is_idempotent() {
        let mut registry = SessionRegistry::new();
        let mut view = FilteredGameView::new(GameFilter::open_games());
        let change = registry.upsert(session(1, GameStatus::Open, false));
        view.apply(&registry, change);
        view.apply(&registry, RegistryChange::Updated(GameId::new(1)));

        assert_eq!(visible_ids(&view), vec![1]);
    }
}
