use crate::config::{ClientConfigManager, UnitDbVariant};
use common::log;
use eframe::egui;
use std::sync::Arc;

/// Backend of the unit database screen. The production implementation
/// hands the URL to the system browser; tests record the loads.
pub trait UnitDatabaseBrowser {
    fn load_url(&mut self, url: &str);
    fn current_url(&self) -> Option<&str>;
}

#[derive(Default)]
pub struct LinkBrowser {
    current: Option<String>,
}

impl LinkBrowser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnitDatabaseBrowser for LinkBrowser {
    fn load_url(&mut self, url: &str) {
        log!("Unit database now points at {}", url);
        self.current = Some(url.to_string());
    }

    fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Unit database screen. The page is only loaded the first time the
/// screen is actually shown, and the chosen variant is persisted so
/// the next start opens the same database.
pub struct UnitsView {
    config_manager: Arc<ClientConfigManager>,
    browser: Box<dyn UnitDatabaseBrowser>,
    variant: UnitDbVariant,
    loaded: bool,
}

impl UnitsView {
    pub fn new(config_manager: Arc<ClientConfigManager>, browser: Box<dyn UnitDatabaseBrowser>) -> Self {
        let variant = match config_manager.get_config() {
            Ok(config) => config.unit_db.variant,
            Err(e) => {
                log!("Falling back to default unit database: {}", e);
                UnitDbVariant::default()
            }
        };
        Self {
            config_manager,
            browser,
            variant,
            loaded: false,
        }
    }

    pub fn variant(&self) -> UnitDbVariant {
        self.variant
    }

    pub fn ensure_loaded(&mut self) {
        if self.loaded {
            return;
        }
        self.browser.load_url(&self.current_variant_url());
        self.loaded = true;
    }

    pub fn set_variant(&mut self, variant: UnitDbVariant) {
        if self.variant == variant {
            return;
        }
        self.variant = variant;

        match self.config_manager.get_config() {
            Ok(mut config) => {
                config.unit_db.variant = variant;
                if let Err(e) = self.config_manager.set_config(&config) {
                    log!("Failed to persist unit database choice: {}", e);
                }
            }
            Err(e) => log!("Failed to persist unit database choice: {}", e),
        }

        let url = self.current_variant_url();
        self.browser.load_url(&url);
        self.loaded = true;
    }

    fn current_variant_url(&self) -> String {
        match self.config_manager.get_config() {
            Ok(config) => config.unit_db.url_for(self.variant).to_string(),
            Err(e) => {
                log!("Falling back to default unit database URL: {}", e);
                crate::config::UnitDbConfig::default()
                    .url_for(self.variant)
                    .to_string()
            }
        }
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        self.ensure_loaded();

        ui.horizontal(|ui| {
            ui.label("Database:");
            let mut variant = self.variant;
            if ui
                .selectable_label(variant == UnitDbVariant::Primary, "Official")
                .clicked()
            {
                variant = UnitDbVariant::Primary;
            }
            if ui
                .selectable_label(variant == UnitDbVariant::Alternate, "Community wiki")
                .clicked()
            {
                variant = UnitDbVariant::Alternate;
            }
            if variant != self.variant {
                self.set_variant(variant);
            }
        });

        ui.separator();

        if let Some(url) = self.browser.current_url() {
            ui.label("Unit descriptions, stats and build costs:");
            ui.hyperlink(url);
        } else {
            ui.label("Unit database is not available.");
        }
    }
}
