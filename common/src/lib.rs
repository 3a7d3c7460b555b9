pub mod config;
pub mod id_generator;
pub mod identifiers;
pub mod logger;
pub mod session;

pub use identifiers::GameId;
pub use session::{
    FilteredGameView, GameFilter, GameSession, GameStatus, RegistryChange, SessionRegistry,
    ViewMode,
};
