mod app;
mod games;
mod units;

pub use app::LobbyApp;
