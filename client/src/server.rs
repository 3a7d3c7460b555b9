use common::{GameId, GameSession};

/// The signed-in player as reported by the lobby server.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInfo {
    pub name: String,
    pub rating: i32,
}

/// Everything needed to announce a new session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGameRequest {
    pub title: String,
    pub map_name: String,
    pub featured_mod: String,
    pub max_players: u32,
    pub min_rating: i32,
    pub max_rating: i32,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ServerEvent {
    Welcome { player: PlayerInfo },
    /// Featured mod id to display name, announced once after connect.
    GameTypes(Vec<(String, String)>),
    /// Announce or update of one session; the full record each time.
    GameInfo(GameSession),
    GameRemoved(GameId),
    JoinSucceeded { game_id: GameId },
    JoinFailed { game_id: GameId, reason: String },
}

/// Fixed contract of the lobby server. The wire protocol behind it is
/// out of scope here; `SimulatedServer` stands in for development and
/// tests. Join and create results arrive later as events.
#[allow(async_fn_in_trait)]
pub trait LobbyServer {
    /// `None` means the connection is gone for good.
    async fn next_event(&mut self) -> Option<ServerEvent>;
    async fn join_game(&mut self, game_id: GameId, password: Option<String>);
    async fn create_game(&mut self, request: NewGameRequest);
    /// Re-announce every current session.
    async fn refresh(&mut self);
    async fn disconnect(&mut self);
}
