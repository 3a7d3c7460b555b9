use crate::constants::ACTIVITY_BUFFER_SIZE;
use crate::server::{NewGameRequest, PlayerInfo};
use common::{FilteredGameView, GameFilter, GameId, SessionRegistry, log};
use ringbuffer::{AllocRingBuffer, RingBuffer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum ClientCommand {
    JoinGame {
        game_id: GameId,
        password: Option<String>,
    },
    CreateGame(NewGameRequest),
    RefreshGames,
    Disconnect,
}

/// UI-side handle for the lobby task's command channel.
#[derive(Clone)]
pub struct CommandSender(mpsc::UnboundedSender<ClientCommand>);

impl CommandSender {
    pub fn new(tx: mpsc::UnboundedSender<ClientCommand>) -> Self {
        Self(tx)
    }

    pub fn send(&self, command: ClientCommand) {
        if let Err(e) = self.0.send(command) {
            log!("Failed to send command to lobby task: {}", e);
        }
    }
}

/// The live registry and its filtered view, mutated together so the
/// view never observes a registry change it was not told about.
pub struct GamesState {
    pub registry: SessionRegistry,
    pub view: FilteredGameView,
}

struct Inner {
    games: GamesState,
    player: Option<PlayerInfo>,
    game_types: HashMap<String, String>,
    activity: AllocRingBuffer<String>,
    error: Option<String>,
    should_close: bool,
    context: Option<egui::Context>,
}

/// State shared between the eframe thread and the lobby task. All
/// mutations go through one mutex; the task requests a repaint after
/// each applied event.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Mutex<Inner>>,
}

impl SharedState {
    pub fn new(initial_filter: GameFilter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                games: GamesState {
                    registry: SessionRegistry::new(),
                    view: FilteredGameView::new(initial_filter),
                },
                player: None,
                game_types: HashMap::new(),
                activity: AllocRingBuffer::new(ACTIVITY_BUFFER_SIZE),
                error: None,
                should_close: false,
                context: None,
            })),
        }
    }

    pub fn with_games<R>(&self, f: impl FnOnce(&mut GamesState) -> R) -> R {
        let mut inner = self.inner.lock().unwrap();
        f(&mut inner.games)
    }

    pub fn set_player(&self, player: PlayerInfo) {
        self.inner.lock().unwrap().player = Some(player);
    }

    pub fn player(&self) -> Option<PlayerInfo> {
        self.inner.lock().unwrap().player.clone()
    }

    pub fn set_game_types(&self, types: Vec<(String, String)>) {
        let mut inner = self.inner.lock().unwrap();
        inner.game_types = types.into_iter().collect();
    }

    /// Full name of a featured mod; `None` degrades to an empty label.
    pub fn game_type_name(&self, featured_mod: &str) -> Option<String> {
        self.inner.lock().unwrap().game_types.get(featured_mod).cloned()
    }

    pub fn game_types(&self) -> Vec<(String, String)> {
        let inner = self.inner.lock().unwrap();
        let mut types: Vec<(String, String)> = inner
            .game_types
            .iter()
            .map(|(id, name)| (id.clone(), name.clone()))
            .collect();
        types.sort();
        types
    }

    pub fn add_activity(&self, message: String) {
        let stamped = format!("{} {}", chrono::Local::now().format("%H:%M:%S"), message);
        self.inner.lock().unwrap().activity.enqueue(stamped);
    }

    pub fn activity(&self) -> Vec<String> {
        self.inner.lock().unwrap().activity.iter().cloned().collect()
    }

    pub fn set_error(&self, error: String) {
        self.inner.lock().unwrap().error = Some(error);
    }

    pub fn get_error(&self) -> Option<String> {
        self.inner.lock().unwrap().error.clone()
    }

    pub fn clear_error(&self) {
        self.inner.lock().unwrap().error = None;
    }

    pub fn set_should_close(&self) {
        self.inner.lock().unwrap().should_close = true;
    }

    pub fn should_close(&self) -> bool {
        self.inner.lock().unwrap().should_close
    }

    pub fn has_context(&self) -> bool {
        self.inner.lock().unwrap().context.is_some()
    }

    pub fn set_context(&self, context: egui::Context) {
        self.inner.lock().unwrap().context = Some(context);
    }

    pub fn request_repaint(&self) {
        if let Some(context) = self.inner.lock().unwrap().context.as_ref() {
            context.request_repaint();
        }
    }
}
