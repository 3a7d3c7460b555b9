use crate::config::ClientConfigManager;
use crate::constants::DEFAULT_PLAYER_RATING;
use crate::game_dir;
use crate::join::{JoinStep, plan_join};
use crate::maps::MapPreviewService;
use crate::notifications::{self, NotificationService};
use crate::server::NewGameRequest;
use crate::state::{ClientCommand, CommandSender, SharedState};
use common::{GameFilter, GameId, GameSession, GameStatus, ViewMode, log};
use eframe::egui;
use egui::{Align, Layout};
use std::sync::Arc;

const DETAIL_PANE_WIDTH: f32 = 280.0;
const TILE_SIZE: egui::Vec2 = egui::vec2(180.0, 150.0);

fn parse_u32_input(input: &str, field_name: &str, shared_state: &SharedState) -> Option<u32> {
    match input.parse::<u32>() {
        Ok(value) => Some(value),
        Err(_) => {
            shared_state.set_error(format!("{} must be a number", field_name));
            None
        }
    }
}

fn parse_i32_input(input: &str, field_name: &str, shared_state: &SharedState) -> Option<i32> {
    match input.parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            shared_state.set_error(format!("{} must be a number", field_name));
            None
        }
    }
}

fn filter_for(show_private_games: bool) -> GameFilter {
    if show_private_games {
        GameFilter::open_games()
    } else {
        GameFilter::open_games().and(&GameFilter::without_password())
    }
}

struct PasswordPrompt {
    game_id: GameId,
    rating_confirmed: bool,
    input: String,
}

/// The games screen: filtered list (table or tiles), detail pane for
/// the selected game, and the create/join dialogs.
pub struct GamesView {
    shared_state: SharedState,
    command_sender: CommandSender,
    notifications: NotificationService,
    config_manager: Arc<ClientConfigManager>,
    maps: MapPreviewService,
    view_mode: ViewMode,
    show_private_games: bool,
    create_game_dialog: bool,
    title_input: String,
    map_name_input: String,
    featured_mod_input: String,
    max_players_input: String,
    min_rating_input: String,
    max_rating_input: String,
    new_game_password_input: String,
    password_prompt: Option<PasswordPrompt>,
    map_details_popup: Option<String>,
}

impl GamesView {
    pub fn new(
        shared_state: SharedState,
        command_sender: CommandSender,
        notifications: NotificationService,
        config_manager: Arc<ClientConfigManager>,
        maps: MapPreviewService,
    ) -> Self {
        let config = match config_manager.get_config() {
            Ok(config) => config,
            Err(e) => {
                log!("Falling back to default config: {}", e);
                Default::default()
            }
        };

        Self {
            shared_state,
            command_sender,
            notifications,
            config_manager,
            maps,
            view_mode: config.games.view_mode,
            show_private_games: config.games.show_private_games,
            create_game_dialog: false,
            title_input: config.new_game.title.clone(),
            map_name_input: config.new_game.map_name.clone(),
            featured_mod_input: config.new_game.featured_mod.clone(),
            max_players_input: config.new_game.max_players.to_string(),
            min_rating_input: config.new_game.min_rating.to_string(),
            max_rating_input: config.new_game.max_rating.to_string(),
            new_game_password_input: String::new(),
            password_prompt: None,
            map_details_popup: None,
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switches table/tiles presentation. Only the widget changes: the
    /// filter and the current selection stay exactly as they are.
    pub fn switch_view_mode(&mut self, view_mode: ViewMode) {
        if self.view_mode == view_mode {
            return;
        }
        self.view_mode = view_mode;
        self.persist_games_config();
    }

    pub fn set_show_private_games(&mut self, show: bool) {
        if self.show_private_games == show {
            return;
        }
        self.show_private_games = show;
        self.shared_state
            .with_games(|games| {
                let filter = filter_for(show);
                games.view.set_filter(&games.registry, filter);
            });
        self.persist_games_config();
    }

    fn persist_games_config(&self) {
        let mut config = match self.config_manager.get_config() {
            Ok(config) => config,
            Err(e) => {
                log!("Skipping games config save: {}", e);
                return;
            }
        };
        config.games.view_mode = self.view_mode;
        config.games.show_private_games = self.show_private_games;
        if let Err(e) = self.config_manager.set_config(&config) {
            log!("Failed to persist games config: {}", e);
        }
    }

    /// Re-offers the directory chooser until the player either picks a
    /// usable directory or cancels. An invalid pick must not kill the
    /// attempt that needed the directory.
    fn retry_directory_chooser(mut choose: impl FnMut() -> Option<bool>) -> bool {
        loop {
            match choose() {
                Some(true) => return true,
                Some(false) => {
                    log!("Selected game directory is not usable, reopening the chooser");
                }
                None => return false,
            }
        }
    }

    /// Drives one join attempt as far as it can go without further
    /// input. Rating confirmation and the password prompt leave the
    /// attempt parked until the player answers; the directory chooser
    /// retries in place because the answer is already known.
    pub fn begin_join(
        &mut self,
        game_id: GameId,
        password: Option<String>,
        rating_confirmed: bool,
    ) {
        let Some(session) = self
            .shared_state
            .with_games(|games| games.registry.get(game_id).cloned())
        else {
            self.shared_state
                .set_error(format!("Game {} is no longer available", game_id));
            return;
        };

        let player_rating = self
            .shared_state
            .player()
            .map(|p| p.rating)
            .unwrap_or(DEFAULT_PLAYER_RATING);
        let mut directory_set = game_dir::game_directory_set(&self.config_manager);

        loop {
            match plan_join(
                &session,
                password.as_deref(),
                player_rating,
                directory_set,
                rating_confirmed,
            ) {
                JoinStep::ConfirmRating { player_rating } => {
                    self.notifications.add(notifications::rating_confirmation(
                        &session,
                        player_rating,
                        password,
                    ));
                    return;
                }
                JoinStep::NeedGameDirectory => {
                    let config_manager = &self.config_manager;
                    if Self::retry_directory_chooser(|| {
                        game_dir::choose_game_directory(config_manager)
                    }) {
                        directory_set = true;
                    } else {
                        return;
                    }
                }
                JoinStep::NeedPassword => {
                    self.password_prompt = Some(PasswordPrompt {
                        game_id,
                        rating_confirmed,
                        input: String::new(),
                    });
                    return;
                }
                JoinStep::Proceed { game_id, password } => {
                    self.shared_state
                        .with_games(|games| games.view.select(Some(game_id)));
                    self.command_sender
                        .send(ClientCommand::JoinGame { game_id, password });
                    return;
                }
            }
        }
    }

    /// Entry point for notification buttons resuming a parked attempt.
    pub fn resume_join(
        &mut self,
        game_id: GameId,
        password: Option<String>,
        rating_confirmed: bool,
    ) {
        self.begin_join(game_id, password, rating_confirmed);
    }

    pub fn render(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        self.render_toolbar(ui);
        ui.separator();

        let (sessions, selected) = self.shared_state.with_games(|games| {
            let sessions: Vec<GameSession> = games
                .view
                .visible()
                .filter_map(|id| games.registry.get(id).cloned())
                .collect();
            (sessions, games.view.selected())
        });

        let mut clicked: Option<GameId> = None;
        let mut join_requested: Option<GameId> = None;

        let panel_height = ui.available_height();
        let list_width = (ui.available_width() - DETAIL_PANE_WIDTH - 20.0).max(200.0);

        ui.horizontal(|ui| {
            ui.allocate_ui_with_layout(
                egui::vec2(list_width, panel_height),
                Layout::top_down(Align::LEFT),
                |ui| {
                    if sessions.is_empty() {
                        ui.label("No open games. Host one!");
                    } else {
                        match self.view_mode {
                            ViewMode::Table => {
                                Self::render_table(
                                    ui,
                                    &sessions,
                                    selected,
                                    &mut clicked,
                                    &mut join_requested,
                                );
                            }
                            ViewMode::Tiles => {
                                self.render_tiles(
                                    ui,
                                    ctx,
                                    &sessions,
                                    selected,
                                    &mut clicked,
                                    &mut join_requested,
                                );
                            }
                        }
                    }
                },
            );

            ui.separator();

            ui.allocate_ui_with_layout(
                egui::vec2(DETAIL_PANE_WIDTH, panel_height),
                Layout::top_down(Align::LEFT),
                |ui| {
                    self.render_detail_pane(ui, ctx, selected, &mut join_requested);
                },
            );
        });

        if let Some(game_id) = clicked {
            self.shared_state
                .with_games(|games| games.view.select(Some(game_id)));
        }
        if let Some(game_id) = join_requested {
            self.begin_join(game_id, None, false);
        }

        if self.create_game_dialog {
            self.render_create_game_dialog(ctx);
        }
        self.render_password_prompt(ctx);
        self.render_map_details_popup(ctx);
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("➕ Create Game").clicked() {
                self.open_create_game_dialog();
            }

            if ui.button("🔄 Refresh").clicked() {
                self.command_sender.send(ClientCommand::RefreshGames);
            }

            ui.separator();

            if ui
                .selectable_label(self.view_mode == ViewMode::Table, "Table")
                .clicked()
            {
                self.switch_view_mode(ViewMode::Table);
            }
            if ui
                .selectable_label(self.view_mode == ViewMode::Tiles, "Tiles")
                .clicked()
            {
                self.switch_view_mode(ViewMode::Tiles);
            }

            ui.separator();

            let mut show_private = self.show_private_games;
            if ui
                .checkbox(&mut show_private, "Show password-protected games")
                .changed()
            {
                self.set_show_private_games(show_private);
            }
        });
    }

    fn open_create_game_dialog(&mut self) {
        if !game_dir::game_directory_set(&self.config_manager) {
            let config_manager = &self.config_manager;
            if !Self::retry_directory_chooser(|| game_dir::choose_game_directory(config_manager)) {
                return;
            }
        }

        if let Ok(config) = self.config_manager.get_config() {
            self.title_input = config.new_game.title.clone();
            self.map_name_input = config.new_game.map_name.clone();
            self.featured_mod_input = config.new_game.featured_mod.clone();
            self.max_players_input = config.new_game.max_players.to_string();
            self.min_rating_input = config.new_game.min_rating.to_string();
            self.max_rating_input = config.new_game.max_rating.to_string();
        }
        self.new_game_password_input.clear();
        self.create_game_dialog = true;
    }

    fn render_table(
        ui: &mut egui::Ui,
        sessions: &[GameSession],
        selected: Option<GameId>,
        clicked: &mut Option<GameId>,
        join_requested: &mut Option<GameId>,
    ) {
        egui::ScrollArea::vertical()
            .id_salt("games_table_scroll")
            .show(ui, |ui| {
                egui::Grid::new("games_table")
                    .striped(true)
                    .num_columns(6)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("Title").strong());
                        ui.label(egui::RichText::new("Host").strong());
                        ui.label(egui::RichText::new("Map").strong());
                        ui.label(egui::RichText::new("Players").strong());
                        ui.label(egui::RichText::new("Rating").strong());
                        ui.label("");
                        ui.end_row();

                        for session in sessions {
                            let is_selected = selected == Some(session.id);
                            let lock = if session.password_protected { "🔒 " } else { "" };
                            let response = ui.selectable_label(
                                is_selected,
                                format!("{}{}", lock, session.title),
                            );
                            if response.clicked() {
                                *clicked = Some(session.id);
                            }
                            if response.double_clicked() {
                                *join_requested = Some(session.id);
                            }
                            ui.label(&session.host);
                            ui.label(&session.map_name);
                            ui.label(format!("{}/{}", session.num_players, session.max_players));
                            ui.label(format!("{}-{}", session.min_rating, session.max_rating));
                            if session.is_full() {
                                ui.label("Full");
                            } else {
                                ui.label("");
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn render_tiles(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        sessions: &[GameSession],
        selected: Option<GameId>,
        clicked: &mut Option<GameId>,
        join_requested: &mut Option<GameId>,
    ) {
        egui::ScrollArea::vertical()
            .id_salt("games_tiles_scroll")
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for session in sessions {
                        let (rect, response) =
                            ui.allocate_exact_size(TILE_SIZE, egui::Sense::click());

                        let is_selected = selected == Some(session.id);
                        let bg_color = if is_selected {
                            egui::Color32::from_gray(60)
                        } else if response.hovered() {
                            egui::Color32::from_gray(45)
                        } else {
                            egui::Color32::from_gray(32)
                        };
                        ui.painter().rect_filled(rect, 4.0, bg_color);

                        let preview = self.maps.preview(ctx, &session.map_name);
                        ui.scope_builder(egui::UiBuilder::new().max_rect(rect.shrink(8.0)), |ui| {
                            ui.vertical(|ui| {
                                let lock = if session.password_protected { "🔒 " } else { "" };
                                ui.label(
                                    egui::RichText::new(format!("{}{}", lock, session.title))
                                        .strong(),
                                );
                                ui.add(
                                    egui::Image::new(&preview)
                                        .fit_to_exact_size(egui::vec2(64.0, 64.0)),
                                );
                                ui.label(format!(
                                    "👥 {}/{} | {}",
                                    session.num_players, session.max_players, session.host
                                ));
                            });
                        });

                        if response.clicked() {
                            *clicked = Some(session.id);
                        }
                        if response.double_clicked() {
                            *join_requested = Some(session.id);
                        }
                    }
                });
            });
    }

    // The pane re-reads the selected record every frame, so field
    // mutations show up without any extra wiring.
    fn render_detail_pane(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        selected: Option<GameId>,
        join_requested: &mut Option<GameId>,
    ) {
        let session = selected.and_then(|id| {
            self.shared_state
                .with_games(|games| games.registry.get(id).cloned())
        });
        let Some(session) = session else {
            ui.label("Select a game to see its details.");
            return;
        };

        ui.heading(&session.title);
        ui.label(format!("Hosted by {}", session.host));
        ui.add_space(5.0);

        let preview = self.maps.preview(ctx, &session.map_name);
        ui.add(egui::Image::new(&preview).fit_to_exact_size(egui::vec2(128.0, 128.0)));
        ui.label(&session.map_name);
        ui.add_space(5.0);

        let game_type = self
            .shared_state
            .game_type_name(&session.featured_mod)
            .unwrap_or_default();
        ui.label(format!("Game type: {}", game_type));
        ui.label(format!(
            "Players: {}/{}",
            session.num_players, session.max_players
        ));
        ui.label(format!(
            "Rating: {} to {}",
            session.min_rating, session.max_rating
        ));

        if !session.teams.is_empty() {
            ui.add_space(5.0);
            for (team_name, members) in &session.teams {
                ui.label(egui::RichText::new(team_name).strong());
                for member in members {
                    ui.label(format!("  {}", member));
                }
            }
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let joinable = session.status == GameStatus::Open && !session.is_full();
            if ui
                .add_enabled(joinable, egui::Button::new("Join"))
                .clicked()
            {
                *join_requested = Some(session.id);
            }

            if ui.button("Map details").clicked() {
                if self.maps.details(&session.map_name).is_some() {
                    self.map_details_popup = Some(session.map_name.clone());
                } else {
                    self.notifications
                        .add(notifications::map_unavailable(&session.map_name));
                }
            }
        });
    }

    fn render_create_game_dialog(&mut self, ctx: &egui::Context) {
        let mut close_dialog = false;
        let mut create_game = false;
        let game_types = self.shared_state.game_types();

        egui::Window::new("Create Game")
            .open(&mut self.create_game_dialog)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label("Title:");
                ui.text_edit_singleline(&mut self.title_input);

                ui.label("Map:");
                ui.text_edit_singleline(&mut self.map_name_input);

                if game_types.is_empty() {
                    ui.label("Game type:");
                    ui.text_edit_singleline(&mut self.featured_mod_input);
                } else {
                    let current = game_types
                        .iter()
                        .find(|(id, _)| *id == self.featured_mod_input)
                        .map(|(_, name)| name.clone())
                        .unwrap_or_else(|| self.featured_mod_input.clone());
                    egui::ComboBox::from_label("Game type")
                        .selected_text(current)
                        .show_ui(ui, |ui| {
                            for (id, name) in &game_types {
                                ui.selectable_value(&mut self.featured_mod_input, id.clone(), name);
                            }
                        });
                }

                ui.label("Max players:");
                ui.text_edit_singleline(&mut self.max_players_input);

                ui.label("Min rating:");
                ui.text_edit_singleline(&mut self.min_rating_input);

                ui.label("Max rating:");
                ui.text_edit_singleline(&mut self.max_rating_input);

                ui.label("Password (leave empty for a public game):");
                ui.text_edit_singleline(&mut self.new_game_password_input);

                ui.horizontal(|ui| {
                    if ui.button("Create (Enter)").clicked() {
                        create_game = true;
                    }
                    if ui.button("Cancel (Esc)").clicked() {
                        close_dialog = true;
                    }
                });

                ctx.input(|i| {
                    if i.key_pressed(egui::Key::Enter) {
                        create_game = true;
                    }
                    if i.key_pressed(egui::Key::Escape) {
                        close_dialog = true;
                    }
                });
            });

        if create_game {
            if self.title_input.trim().is_empty() {
                self.shared_state
                    .set_error("Game title must not be empty".to_string());
                return;
            }
            let Some(max_players) =
                parse_u32_input(&self.max_players_input, "Max players", &self.shared_state)
            else {
                return;
            };
            let Some(min_rating) =
                parse_i32_input(&self.min_rating_input, "Min rating", &self.shared_state)
            else {
                return;
            };
            let Some(max_rating) =
                parse_i32_input(&self.max_rating_input, "Max rating", &self.shared_state)
            else {
                return;
            };
            if min_rating > max_rating {
                self.shared_state
                    .set_error("Min rating must not exceed max rating".to_string());
                return;
            }

            if let Ok(mut config) = self.config_manager.get_config() {
                config.new_game.title = self.title_input.clone();
                config.new_game.map_name = self.map_name_input.clone();
                config.new_game.featured_mod = self.featured_mod_input.clone();
                config.new_game.max_players = max_players;
                config.new_game.min_rating = min_rating;
                config.new_game.max_rating = max_rating;
                self.config_manager.set_config(&config).ok();
            }

            let password = if self.new_game_password_input.trim().is_empty() {
                None
            } else {
                Some(self.new_game_password_input.clone())
            };
            self.command_sender
                .send(ClientCommand::CreateGame(NewGameRequest {
                    title: self.title_input.clone(),
                    map_name: self.map_name_input.clone(),
                    featured_mod: self.featured_mod_input.clone(),
                    max_players,
                    min_rating,
                    max_rating,
                    password,
                }));
            close_dialog = true;
        }

        if close_dialog {
            self.create_game_dialog = false;
        }
    }

    fn render_password_prompt(&mut self, ctx: &egui::Context) {
        let mut submit = false;
        let mut cancel = false;

        if let Some(prompt) = &mut self.password_prompt {
            egui::Window::new("Password required")
                .collapsible(false)
                .show(ctx, |ui| {
                    ui.label("This game is password protected.");
                    ui.text_edit_singleline(&mut prompt.input);
                    ui.horizontal(|ui| {
                        if ui.button("Join").clicked() {
                            submit = true;
                        }
                        if ui.button("Cancel").clicked() {
                            cancel = true;
                        }
                    });
                    ctx.input(|i| {
                        if i.key_pressed(egui::Key::Enter) {
                            submit = true;
                        }
                        if i.key_pressed(egui::Key::Escape) {
                            cancel = true;
                        }
                    });
                });
        }

        if submit
            && let Some(prompt) = self.password_prompt.take()
        {
            self.begin_join(prompt.game_id, Some(prompt.input), prompt.rating_confirmed);
        }
        if cancel {
            self.password_prompt = None;
        }
    }

    fn render_map_details_popup(&mut self, ctx: &egui::Context) {
        let mut close = false;

        if let Some(map_name) = &self.map_details_popup
            && let Some(details) = self.maps.details(map_name)
        {
            egui::Window::new(&details.display_name)
                .collapsible(false)
                .show(ctx, |ui| {
                    ui.label(format!("Size: {} km", details.size_km));
                    ui.label(format!("Max players: {}", details.max_players));
                    if !details.description.is_empty() {
                        ui.add_space(5.0);
                        ui.label(&details.description);
                    }
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
        } else {
            close = true;
        }

        if close {
            self.map_details_popup = None;
        }
    }
}
