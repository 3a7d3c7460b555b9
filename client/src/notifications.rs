use crate::state::ClientCommand;
use common::{GameId, GameSession};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// What clicking a notification button does, besides dismissing it.
#[derive(Debug, Clone)]
pub enum UiAction {
    /// Re-enter the join flow at the preconditions step.
    ResumeJoin {
        game_id: GameId,
        password: Option<String>,
        rating_confirmed: bool,
    },
    Send(ClientCommand),
    /// Log a report of the failure for later triage.
    Report(String),
}

#[derive(Debug, Clone)]
pub struct NotificationAction {
    pub label: String,
    pub action: Option<UiAction>,
}

impl NotificationAction {
    pub fn new(label: &str, action: UiAction) -> Self {
        Self {
            label: label.to_string(),
            action: Some(action),
        }
    }

    pub fn dismiss(label: &str) -> Self {
        Self {
            label: label.to_string(),
            action: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub text: String,
    pub severity: Severity,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    pub fn new(title: &str, text: String, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            text,
            severity,
            actions: vec![NotificationAction::dismiss("OK")],
        }
    }

    pub fn with_actions(mut self, actions: Vec<NotificationAction>) -> Self {
        self.actions = actions;
        self
    }
}

/// Confirmation required before joining a game whose rating bounds the
/// player falls outside of. Confirming resumes the join with the
/// rating check satisfied; cancelling does nothing further.
pub fn rating_confirmation(
    session: &GameSession,
    player_rating: i32,
    password: Option<String>,
) -> Notification {
    Notification::new(
        "Rating out of bounds",
        format!(
            "\"{}\" expects a rating between {} and {}; yours is {}. Join anyway?",
            session.title, session.min_rating, session.max_rating, player_rating
        ),
        Severity::Info,
    )
    .with_actions(vec![
        NotificationAction::new(
            "Join",
            UiAction::ResumeJoin {
                game_id: session.id,
                password,
                rating_confirmed: true,
            },
        ),
        NotificationAction::dismiss("Cancel"),
    ])
}

/// Join failure reported by the server. Never retried automatically.
pub fn join_failed(game_id: GameId, title: &str, reason: &str) -> Notification {
    Notification::new(
        "Could not join game",
        format!("Joining \"{}\" failed: {}", title, reason),
        Severity::Error,
    )
    .with_actions(vec![
        NotificationAction::new(
            "Retry",
            UiAction::ResumeJoin {
                game_id,
                password: None,
                rating_confirmed: false,
            },
        ),
        NotificationAction::new(
            "Report",
            UiAction::Report(format!("join {} failed: {}", game_id, reason)),
        ),
        NotificationAction::dismiss("Dismiss"),
    ])
}

pub fn map_unavailable(map_name: &str) -> Notification {
    Notification::new(
        "Map preview unavailable",
        format!("No details found for map \"{}\".", map_name),
        Severity::Warn,
    )
}

/// Queue of user-facing notifications, shared between the lobby task
/// (which raises them) and the UI (which renders and dismisses them).
#[derive(Clone)]
pub struct NotificationService {
    inner: Arc<Mutex<Queue>>,
}

struct Queue {
    next_id: u64,
    entries: Vec<(u64, Notification)>,
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Queue {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn add(&self, notification: Notification) {
        let mut queue = self.inner.lock().unwrap();
        let id = queue.next_id;
        queue.next_id += 1;
        queue.entries.push((id, notification));
    }

    pub fn snapshot(&self) -> Vec<(u64, Notification)> {
        self.inner.lock().unwrap().entries.clone()
    }

    pub fn dismiss(&self, id: u64) {
        let mut queue = self.inner.lock().unwrap();
        queue.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::GameStatus;

    fn session() -> GameSession {
        GameSession {
            id: GameId::new(42),
            title: "Canis 4v4".to_string(),
            host: "IronWarden".to_string(),
            map_name: "canis_river".to_string(),
            featured_mod: "vanilla".to_string(),
            num_players: 5,
            max_players: 8,
            min_rating: 800,
            max_rating: 1500,
            password_protected: false,
            teams: vec![],
            status: GameStatus::Open,
        }
    }

    #[test]
    fn test_queue_add_snapshot_dismiss() {
        let service = NotificationService::new();
        assert!(service.is_empty());

        service.add(map_unavailable("canis_river"));
        service.add(map_unavailable("twin_mesas"));
        let entries = service.snapshot();
        assert_eq!(entries.len(), 2);
        assert_ne!(entries[0].0, entries[1].0);

        service.dismiss(entries[0].0);
        assert_eq!(service.snapshot().len(), 1);
        assert_eq!(service.snapshot()[0].0, entries[1].0);
    }

    #[test]
    fn test_rating_confirmation_carries_confirmed_resume() {
        let notification = rating_confirmation(&session(), 1600, None);
        assert_eq!(notification.severity, Severity::Info);
        assert_eq!(notification.actions.len(), 2);

        let join = &notification.actions[0];
        assert_eq!(join.label, "Join");
        match join.action {
            Some(UiAction::ResumeJoin {
                game_id,
                rating_confirmed,
                ..
            }) => {
                assert_eq!(game_id, GameId::new(42));
                assert!(rating_confirmed);
            }
            _ => panic!("join action must resume the join flow"),
        }

        let cancel = &notification.actions[1];
        assert_eq!(cancel.label, "Cancel");
        assert!(cancel.action.is_none());
    }

    #[test]
    fn test_join_failed_offers_retry_report_dismiss() {
        let notification = join_failed(GameId::new(7), "Canis 4v4", "game is full");
        assert_eq!(notification.severity, Severity::Error);
        let labels: Vec<&str> = notification
            .actions
            .iter()
            .map(|a| a.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Retry", "Report", "Dismiss"]);
        assert!(matches!(
            notification.actions[0].action,
            Some(UiAction::ResumeJoin {
                rating_confirmed: false,
                ..
            })
        ));
    }
}
