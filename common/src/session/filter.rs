use super::{GameSession, GameStatus};
use std::sync::Arc;

/// Pure inclusion predicate over a session record, composable with
/// logical AND. Cloning shares the underlying closure.
#[derive(Clone)]
pub struct GameFilter(Arc<dyn Fn(&GameSession) -> bool + Send + Sync>);

impl GameFilter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&GameSession) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn matches(&self, session: &GameSession) -> bool {
        (self.0)(session)
    }

    pub fn and(&self, other: &GameFilter) -> GameFilter {
        let left = self.clone();
        let right = other.clone();
        GameFilter::new(move |session| left.matches(session) && right.matches(session))
    }

    /// Sessions still accepting players.
    pub fn open_games() -> Self {
        GameFilter::new(|session| session.status == GameStatus::Open)
    }

    pub fn without_password() -> Self {
        GameFilter::new(|session| !session.password_protected)
    }
}

impl std::fmt::Debug for GameFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GameFilter")
    }
}
