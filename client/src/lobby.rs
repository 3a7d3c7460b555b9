use crate::notifications::{self, NotificationService};
use crate::server::{LobbyServer, ServerEvent};
use crate::state::{ClientCommand, SharedState};
use common::{RegistryChange, log};
use tokio::sync::mpsc;

/// Runs the lobby connection on the background runtime: commands come
/// in from the UI, events come in from the server, and every applied
/// event is followed by a repaint request so the eframe thread picks
/// it up.
pub async fn lobby_task<S: LobbyServer>(
    mut server: S,
    shared_state: SharedState,
    notifications: NotificationService,
    mut command_rx: mpsc::UnboundedReceiver<ClientCommand>,
) {
    loop {
        tokio::select! {
            command = command_rx.recv() => {
                match command {
                    Some(ClientCommand::JoinGame { game_id, password }) => {
                        log!("Requesting join of game {}", game_id);
                        server.join_game(game_id, password).await;
                    }
                    Some(ClientCommand::CreateGame(request)) => {
                        log!("Requesting new game \"{}\"", request.title);
                        server.create_game(request).await;
                    }
                    Some(ClientCommand::RefreshGames) => {
                        server.refresh().await;
                    }
                    Some(ClientCommand::Disconnect) => {
                        server.disconnect().await;
                        shared_state.set_should_close();
                        shared_state.request_repaint();
                        break;
                    }
                    None => break,
                }
            }

            event = server.next_event() => {
                match event {
                    Some(event) => {
                        apply_server_event(&shared_state, &notifications, event);
                        shared_state.request_repaint();
                    }
                    None => {
                        shared_state.set_error("Lobby connection lost".to_string());
                        shared_state.set_should_close();
                        shared_state.request_repaint();
                        break;
                    }
                }
            }
        }
    }

    log!("Lobby task finished");
}

/// Applies one server event to the shared state. Split out of the
/// select loop so the event handling is testable without a runtime.
pub fn apply_server_event(
    shared_state: &SharedState,
    notifications: &NotificationService,
    event: ServerEvent,
) {
    match event {
        ServerEvent::Welcome { player } => {
            log!("Connected as {} (rating {})", player.name, player.rating);
            shared_state.add_activity(format!("Signed in as {}", player.name));
            shared_state.set_player(player);
        }

        ServerEvent::GameTypes(types) => {
            shared_state.set_game_types(types);
        }

        ServerEvent::GameInfo(session) => {
            let title = session.title.clone();
            let host = session.host.clone();
            let change = shared_state.with_games(|games| {
                let change = games.registry.upsert(session);
                games.view.apply(&games.registry, change);
                change
            });
            if matches!(change, RegistryChange::Added(_)) {
                shared_state.add_activity(format!("\"{}\" hosted by {}", title, host));
            }
        }

        ServerEvent::GameRemoved(game_id) => {
            shared_state.with_games(|games| {
                if let Some(change) = games.registry.remove(game_id) {
                    games.view.apply(&games.registry, change);
                }
            });
        }

        ServerEvent::JoinSucceeded { game_id } => {
            // A success answering a selection the player already moved
            // away from is stale; drop it instead of acting on it.
            let still_selected =
                shared_state.with_games(|games| games.view.selected() == Some(game_id));
            if !still_selected {
                log!("Ignoring stale join result for game {}", game_id);
                return;
            }
            let title = shared_state
                .with_games(|games| games.registry.get(game_id).map(|s| s.title.clone()))
                .unwrap_or_else(|| game_id.to_string());
            shared_state.add_activity(format!("Joined \"{}\"", title));
            log!("Join of game {} accepted; launch is delegated to the game runner", game_id);
        }

        ServerEvent::JoinFailed { game_id, reason } => {
            log!("Join of game {} failed: {}", game_id, reason);
            let title = shared_state
                .with_games(|games| games.registry.get(game_id).map(|s| s.title.clone()))
                .unwrap_or_else(|| game_id.to_string());
            notifications.add(notifications::join_failed(game_id, &title, &reason));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::PlayerInfo;
    use common::{GameFilter, GameId, GameSession, GameStatus};

    fn session(id: u32, status: GameStatus) -> GameSession {
        GameSession {
            id: GameId::new(id),
            title: format!("game {}", id),
            host: "host".to_string(),
            map_name: "twin_mesas".to_string(),
            featured_mod: "vanilla".to_string(),
            num_players: 2,
            max_players: 6,
            min_rating: 0,
            max_rating: 3000,
            password_protected: false,
            teams: vec![],
            status,
        }
    }

    fn setup() -> (SharedState, NotificationService) {
        common::logger::init_logger(None);
        (
            SharedState::new(GameFilter::open_games()),
            NotificationService::new(),
        )
    }

    #[test]
    fn test_welcome_sets_player_and_activity() {
        let (state, notifications) = setup();
        apply_server_event(
            &state,
            &notifications,
            ServerEvent::Welcome {
                player: PlayerInfo {
                    name: "IronWarden".to_string(),
                    rating: 1340,
                },
            },
        );
        assert_eq!(state.player().unwrap().name, "IronWarden");
        assert!(state.activity().iter().any(|l| l.contains("IronWarden")));
    }

    #[test]
    fn test_game_info_flows_into_filtered_view() {
        let (state, notifications) = setup();
        apply_server_event(&state, &notifications, ServerEvent::GameInfo(session(1, GameStatus::Open)));
        apply_server_event(&state, &notifications, ServerEvent::GameInfo(session(2, GameStatus::Playing)));

        let visible: Vec<u32> =
            state.with_games(|g| g.view.visible().map(|id| id.value()).collect());
        assert_eq!(visible, vec![1]);

        // The running game flipping back to Open becomes visible at its
        // backing position.
        apply_server_event(&state, &notifications, ServerEvent::GameInfo(session(2, GameStatus::Open)));
        let visible: Vec<u32> =
            state.with_games(|g| g.view.visible().map(|id| id.value()).collect());
        assert_eq!(visible, vec![1, 2]);
    }

    #[test]
    fn test_game_removed_clears_record_and_selection() {
        let (state, notifications) = setup();
        apply_server_event(&state, &notifications, ServerEvent::GameInfo(session(1, GameStatus::Open)));
        state.with_games(|g| g.view.select(Some(GameId::new(1))));

        apply_server_event(&state, &notifications, ServerEvent::GameRemoved(GameId::new(1)));
        state.with_games(|g| {
            assert!(g.registry.is_empty());
            assert_eq!(g.view.selected(), None);
        });
    }

    #[test]
    fn test_stale_join_success_is_dropped() {
        let (state, notifications) = setup();
        apply_server_event(&state, &notifications, ServerEvent::GameInfo(session(1, GameStatus::Open)));
        apply_server_event(&state, &notifications, ServerEvent::GameInfo(session(2, GameStatus::Open)));

        // Selection moved to game 2 while the join answer for game 1
        // was in flight.
        state.with_games(|g| g.view.select(Some(GameId::new(2))));
        apply_server_event(
            &state,
            &notifications,
            ServerEvent::JoinSucceeded { game_id: GameId::new(1) },
        );
        assert!(!state.activity().iter().any(|l| l.contains("Joined")));

        apply_server_event(
            &state,
            &notifications,
            ServerEvent::JoinSucceeded { game_id: GameId::new(2) },
        );
        assert!(state.activity().iter().any(|l| l.contains("Joined \"game 2\"")));
    }

    #[test]
    fn test_join_failure_raises_error_notification() {
        let (state, notifications) = setup();
        apply_server_event(&state, &notifications, ServerEvent::GameInfo(session(1, GameStatus::Open)));
        apply_server_event(
            &state,
            &notifications,
            ServerEvent::JoinFailed {
                game_id: GameId::new(1),
                reason: "game is full".to_string(),
            },
        );

        let entries = notifications.snapshot();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].1.text.contains("game is full"));
        assert_eq!(entries[0].1.severity, crate::notifications::Severity::Error);
    }
}
