use super::games::GamesView;
use super::units::{LinkBrowser, UnitsView};
use crate::config::ClientConfigManager;
use crate::maps::MapPreviewService;
use crate::notifications::{NotificationService, Severity, UiAction};
use crate::state::{ClientCommand, CommandSender, SharedState};
use common::log;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Games,
    UnitDatabase,
}

pub struct LobbyApp {
    shared_state: SharedState,
    command_sender: CommandSender,
    notifications: NotificationService,
    games: GamesView,
    units: UnitsView,
    screen: Screen,
    disconnect_timeout: Duration,
    disconnecting: Option<Instant>,
}

impl LobbyApp {
    pub fn new(
        shared_state: SharedState,
        command_sender: CommandSender,
        notifications: NotificationService,
        config_manager: Arc<ClientConfigManager>,
        disconnect_timeout: Duration,
    ) -> Self {
        let maps_dir = match config_manager.get_config() {
            Ok(config) => PathBuf::from(config.paths.maps_directory),
            Err(e) => {
                log!("Falling back to default maps directory: {}", e);
                PathBuf::from("maps")
            }
        };

        let games = GamesView::new(
            shared_state.clone(),
            command_sender.clone(),
            notifications.clone(),
            config_manager.clone(),
            MapPreviewService::new(maps_dir),
        );
        let units = UnitsView::new(config_manager, Box::new(LinkBrowser::new()));

        Self {
            shared_state,
            command_sender,
            notifications,
            games,
            units,
            screen: Screen::Games,
            disconnect_timeout,
            disconnecting: None,
        }
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.disconnecting.is_none() {
                // First close request: ask the lobby task to say
                // goodbye and close once it acknowledges.
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.command_sender.send(ClientCommand::Disconnect);
                self.disconnecting = Some(Instant::now());
            } else if !self.shared_state.should_close() {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            }
        }

        if let Some(started) = self.disconnecting
            && (self.shared_state.should_close() || started.elapsed() >= self.disconnect_timeout)
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn render_error_window(&mut self, ctx: &egui::Context) {
        if let Some(error) = self.shared_state.get_error() {
            egui::Window::new("Error").collapsible(false).show(ctx, |ui| {
                ui.label(&error);
                if ui.button("OK").clicked() {
                    self.shared_state.clear_error();
                    if self.shared_state.should_close() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                }
            });
        }
    }

    fn render_notifications(&mut self, ctx: &egui::Context) {
        let mut handled: Vec<(u64, Option<UiAction>)> = Vec::new();

        for (id, notification) in self.notifications.snapshot() {
            egui::Window::new(&notification.title)
                .id(egui::Id::new(("notification", id)))
                .collapsible(false)
                .show(ctx, |ui| {
                    match notification.severity {
                        Severity::Info => ui.label(&notification.text),
                        Severity::Warn => {
                            ui.colored_label(egui::Color32::YELLOW, &notification.text)
                        }
                        Severity::Error => {
                            ui.colored_label(egui::Color32::LIGHT_RED, &notification.text)
                        }
                    };
                    ui.add_space(5.0);
                    ui.horizontal(|ui| {
                        for action in &notification.actions {
                            if ui.button(&action.label).clicked() {
                                handled.push((id, action.action.clone()));
                            }
                        }
                    });
                });
        }

        for (id, action) in handled {
            self.notifications.dismiss(id);
            match action {
                Some(UiAction::ResumeJoin {
                    game_id,
                    password,
                    rating_confirmed,
                }) => {
                    self.games.resume_join(game_id, password, rating_confirmed);
                }
                Some(UiAction::Send(command)) => self.command_sender.send(command),
                Some(UiAction::Report(text)) => {
                    log!("Failure report: {}", text);
                    self.shared_state
                        .add_activity("Failure report saved to the log".to_string());
                }
                None => {}
            }
        }
    }

    fn render_activity_panel(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("activity_panel")
            .resizable(false)
            .min_height(70.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("activity_scroll")
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        let activity = self.shared_state.activity();
                        if activity.is_empty() {
                            ui.label(
                                egui::RichText::new("Nothing has happened yet.")
                                    .italics()
                                    .color(egui::Color32::GRAY),
                            );
                        } else {
                            for line in activity {
                                ui.label(line);
                            }
                        }
                    });
            });
    }
}

impl eframe::App for LobbyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.shared_state.has_context() {
            self.shared_state.set_context(ctx.clone());
        }

        self.handle_close_request(ctx);

        let title = match self.shared_state.player() {
            Some(player) => format!("Armada Lobby - {} ({})", player.name, player.rating),
            None => "Armada Lobby - connecting...".to_string(),
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));

        self.render_error_window(ctx);
        self.render_notifications(ctx);

        egui::TopBottomPanel::top("screen_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(self.screen == Screen::Games, "🎮 Games")
                    .clicked()
                {
                    self.screen = Screen::Games;
                }
                if ui
                    .selectable_label(self.screen == Screen::UnitDatabase, "📚 Unit Database")
                    .clicked()
                {
                    self.screen = Screen::UnitDatabase;
                }
            });
        });

        self.render_activity_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.screen {
            Screen::Games => self.games.render(ui, ctx),
            Screen::UnitDatabase => self.units.render(ui),
        });

        if self.disconnecting.is_some() {
            ctx.request_repaint();
        }
    }
}
