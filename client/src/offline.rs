use crate::server::{LobbyServer, NewGameRequest, PlayerInfo, ServerEvent};
use common::{GameId, GameSession, GameStatus, log};
use rand::Rng;
use std::collections::VecDeque;
use tokio::time::{Duration, Interval, interval};

const TICK_INTERVAL: Duration = Duration::from_millis(1500);

const HOST_NAMES: &[&str] = &[
    "IronWarden", "SolarNomad", "GrimCorsair", "VioletSentry", "RapidLancer", "StrayPaladin",
];

const MAP_POOL: &[&str] = &[
    "canis_river", "delta_crossing", "twin_mesas", "glacier_gap", "ember_basin",
];

struct HostedGame {
    session: GameSession,
    password: Option<String>,
}

/// In-process stand-in for the lobby server: announces a handful of
/// sessions, keeps mutating them on a timer, and honors passwords and
/// capacity on join. Lets the client run end to end without a wire
/// protocol behind it.
pub struct SimulatedServer {
    player_name: String,
    games: Vec<HostedGame>,
    pending: VecDeque<ServerEvent>,
    tick: Interval,
    next_game_id: u32,
    closed: bool,
}

fn teams_for(host: &str, num_players: u32) -> Vec<(String, Vec<String>)> {
    let mut first = vec![host.to_string()];
    let mut second = Vec::new();
    for n in 1..num_players {
        let name = format!("Player{}", n + 1);
        if n % 2 == 0 {
            first.push(name);
        } else {
            second.push(name);
        }
    }
    let mut teams = vec![("Team 1".to_string(), first)];
    if !second.is_empty() {
        teams.push(("Team 2".to_string(), second));
    }
    teams
}

impl SimulatedServer {
    pub fn new(player_name: String) -> Self {
        let mut rng = rand::rng();
        let rating = rng.random_range(900..=1800);

        let mut server = Self {
            player_name: player_name.clone(),
            games: Vec::new(),
            pending: VecDeque::new(),
            tick: interval(TICK_INTERVAL),
            next_game_id: 1,
            closed: false,
        };

        server.pending.push_back(ServerEvent::Welcome {
            player: PlayerInfo {
                name: player_name,
                rating,
            },
        });
        server.pending.push_back(ServerEvent::GameTypes(vec![
            ("vanilla".to_string(), "Armada".to_string()),
            ("coop".to_string(), "Armada Co-op".to_string()),
            ("blitz".to_string(), "Blitz Ladder".to_string()),
        ]));

        server.seed_game("Canis 4v4", "canis_river", "vanilla", 5, 8, 0, 3000, GameStatus::Open, None);
        server.seed_game("Glacier duel 1600+", "glacier_gap", "blitz", 1, 2, 1600, 2500, GameStatus::Open, None);
        server.seed_game("Friends night", "twin_mesas", "vanilla", 2, 6, 0, 3000, GameStatus::Open, Some("sesame"));
        server.seed_game("Ongoing war", "delta_crossing", "coop", 6, 6, 0, 3000, GameStatus::Playing, None);

        server
    }

    #[allow(clippy::too_many_arguments)]
    fn seed_game(
        &mut self,
        title: &str,
        map_name: &str,
        featured_mod: &str,
        num_players: u32,
        max_players: u32,
        min_rating: i32,
        max_rating: i32,
        status: GameStatus,
        password: Option<&str>,
    ) {
        let mut rng = rand::rng();
        let host = HOST_NAMES[rng.random_range(0..HOST_NAMES.len())].to_string();
        let session = GameSession {
            id: GameId::new(self.next_game_id),
            title: title.to_string(),
            host: host.clone(),
            map_name: map_name.to_string(),
            featured_mod: featured_mod.to_string(),
            num_players,
            max_players,
            min_rating,
            max_rating,
            password_protected: password.is_some(),
            teams: teams_for(&host, num_players),
            status,
        };
        self.next_game_id += 1;
        self.pending.push_back(ServerEvent::GameInfo(session.clone()));
        self.games.push(HostedGame {
            session,
            password: password.map(str::to_string),
        });
    }

    /// One timer step: mutate a session, advance a lifecycle, or
    /// announce a fresh game.
    fn advance(&mut self) {
        let mut rng = rand::rng();
        let roll = rng.random_range(0..100);

        if roll < 45 && !self.games.is_empty() {
            let index = rng.random_range(0..self.games.len());
            let game = &mut self.games[index];
            if game.session.status == GameStatus::Open {
                let delta: i32 = if rng.random_bool(0.5) { 1 } else { -1 };
                let players = (game.session.num_players as i32 + delta)
                    .clamp(1, game.session.max_players as i32) as u32;
                let host = game.session.host.clone();
                game.session.num_players = players;
                game.session.teams = teams_for(&host, players);
                self.pending
                    .push_back(ServerEvent::GameInfo(game.session.clone()));
            }
        } else if roll < 65 && !self.games.is_empty() {
            let index = rng.random_range(0..self.games.len());
            let game = &mut self.games[index];
            match game.session.status {
                GameStatus::Open if game.session.num_players > 1 => {
                    game.session.status = GameStatus::Playing;
                    self.pending
                        .push_back(ServerEvent::GameInfo(game.session.clone()));
                }
                GameStatus::Playing => {
                    game.session.status = GameStatus::Closed;
                    self.pending
                        .push_back(ServerEvent::GameInfo(game.session.clone()));
                    self.pending
                        .push_back(ServerEvent::GameRemoved(game.session.id));
                    self.games.remove(index);
                }
                _ => {}
            }
        } else if roll < 80 {
            let map = MAP_POOL[rng.random_range(0..MAP_POOL.len())];
            let max_players = [2u32, 4, 6, 8][rng.random_range(0..4)];
            let title = format!("{} {}v{}", map.replace('_', " "), max_players / 2, max_players / 2);
            self.seed_game(&title, map, "vanilla", 1, max_players, 0, 3000, GameStatus::Open, None);
        }
    }

    fn game_position(&self, game_id: GameId) -> Option<usize> {
        self.games.iter().position(|g| g.session.id == game_id)
    }
}

impl LobbyServer for SimulatedServer {
    async fn next_event(&mut self) -> Option<ServerEvent> {
        loop {
            if self.closed {
                return None;
            }
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            self.tick.tick().await;
            self.advance();
        }
    }

    async fn join_game(&mut self, game_id: GameId, password: Option<String>) {
        let player_name = self.player_name.clone();
        let Some(position) = self.game_position(game_id) else {
            self.pending.push_back(ServerEvent::JoinFailed {
                game_id,
                reason: "unknown game".to_string(),
            });
            return;
        };
        let game = &mut self.games[position];

        let reason = if game.session.status != GameStatus::Open {
            Some("game already started")
        } else if game.session.is_full() {
            Some("game is full")
        } else if game.password.is_some() && game.password != password {
            Some("wrong password")
        } else {
            None
        };

        if let Some(reason) = reason {
            self.pending.push_back(ServerEvent::JoinFailed {
                game_id,
                reason: reason.to_string(),
            });
            return;
        }

        game.session.num_players += 1;
        match game.session.teams.iter_mut().min_by_key(|(_, players)| players.len()) {
            Some((_, players)) => players.push(player_name),
            None => game
                .session
                .teams
                .push(("Team 1".to_string(), vec![player_name])),
        }
        let info = game.session.clone();
        self.pending.push_back(ServerEvent::GameInfo(info));
        self.pending.push_back(ServerEvent::JoinSucceeded { game_id });
    }

    async fn create_game(&mut self, request: NewGameRequest) {
        let host = self.player_name.clone();
        let session = GameSession {
            id: GameId::new(self.next_game_id),
            title: request.title,
            host: host.clone(),
            map_name: request.map_name,
            featured_mod: request.featured_mod,
            num_players: 1,
            max_players: request.max_players,
            min_rating: request.min_rating,
            max_rating: request.max_rating,
            password_protected: request.password.is_some(),
            teams: vec![("Team 1".to_string(), vec![host])],
            status: GameStatus::Open,
        };
        self.next_game_id += 1;
        self.pending.push_back(ServerEvent::GameInfo(session.clone()));
        self.games.push(HostedGame {
            session,
            password: request.password,
        });
    }

    async fn refresh(&mut self) {
        let infos: Vec<ServerEvent> = self
            .games
            .iter()
            .map(|g| ServerEvent::GameInfo(g.session.clone()))
            .collect();
        self.pending.extend(infos);
    }

    async fn disconnect(&mut self) {
        log!("Simulated server disconnecting");
        self.pending.clear();
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Welcome, game types, and the four seeded sessions.
    const INITIAL_EVENT_COUNT: usize = 6;

    async fn drained_server() -> (SimulatedServer, Vec<ServerEvent>) {
        let mut server = SimulatedServer::new("TestPilot".to_string());
        let mut events = Vec::new();
        for _ in 0..INITIAL_EVENT_COUNT {
            events.push(server.next_event().await.expect("seed event"));
        }
        assert!(server.pending.is_empty());
        (server, events)
    }

    fn seeded_game<'a>(
        events: &'a [ServerEvent],
        pick: impl Fn(&GameSession) -> bool,
    ) -> &'a GameSession {
        events
            .iter()
            .find_map(|e| match e {
                ServerEvent::GameInfo(s) if pick(s) => Some(s),
                _ => None,
            })
            .expect("matching seeded game")
    }

    #[tokio::test]
    async fn test_announces_welcome_then_types_then_games() {
        let (_, events) = drained_server().await;
        assert!(matches!(events[0], ServerEvent::Welcome { .. }));
        assert!(matches!(events[1], ServerEvent::GameTypes(_)));
        assert!(events[2..]
            .iter()
            .all(|e| matches!(e, ServerEvent::GameInfo(_))));
    }

    #[tokio::test]
    async fn test_join_with_wrong_password_fails() {
        let (mut server, events) = drained_server().await;
        let protected = seeded_game(&events, |s| s.password_protected).clone();

        server.join_game(protected.id, Some("nope".to_string())).await;
        match server.next_event().await.unwrap() {
            ServerEvent::JoinFailed { game_id, reason } => {
                assert_eq!(game_id, protected.id);
                assert_eq!(reason, "wrong password");
            }
            other => panic!("expected JoinFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_successful_join_updates_session_first() {
        let (mut server, events) = drained_server().await;
        let open = seeded_game(&events, |s| {
            s.status == GameStatus::Open && !s.password_protected && !s.is_full()
        })
        .clone();

        server.join_game(open.id, None).await;
        match server.next_event().await.unwrap() {
            ServerEvent::GameInfo(updated) => {
                assert_eq!(updated.num_players, open.num_players + 1);
                let team_members: Vec<&String> =
                    updated.teams.iter().flat_map(|(_, p)| p).collect();
                assert!(team_members.iter().any(|p| *p == "TestPilot"));
            }
            other => panic!("expected GameInfo, got {:?}", other),
        }
        assert!(matches!(
            server.next_event().await.unwrap(),
            ServerEvent::JoinSucceeded { .. }
        ));
    }

    #[tokio::test]
    async fn test_join_running_game_fails() {
        let (mut server, events) = drained_server().await;
        let running = seeded_game(&events, |s| s.status == GameStatus::Playing).clone();

        server.join_game(running.id, None).await;
        assert!(matches!(
            server.next_event().await.unwrap(),
            ServerEvent::JoinFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_game_announces_player_as_host() {
        let (mut server, _) = drained_server().await;
        server
            .create_game(NewGameRequest {
                title: "My arena".to_string(),
                map_name: "ember_basin".to_string(),
                featured_mod: "vanilla".to_string(),
                max_players: 4,
                min_rating: 500,
                max_rating: 2000,
                password: None,
            })
            .await;

        match server.next_event().await.unwrap() {
            ServerEvent::GameInfo(session) => {
                assert_eq!(session.title, "My arena");
                assert_eq!(session.host, "TestPilot");
                assert_eq!(session.num_players, 1);
                assert_eq!(session.status, GameStatus::Open);
            }
            other => panic!("expected GameInfo, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disconnect_ends_event_stream() {
        let (mut server, _) = drained_server().await;
        server.disconnect().await;
        assert!(server.next_event().await.is_none());
    }
}
