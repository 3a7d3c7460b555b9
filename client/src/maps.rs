use common::log;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

const INDEX_FILE_NAME: &str = "maps.yaml";
const PLACEHOLDER_SIDE: usize = 96;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapDetails {
    pub display_name: String,
    pub size_km: u32,
    pub max_players: u32,
    #[serde(default)]
    pub description: String,
}

/// Synchronous preview and metadata lookup by map name, backed by a
/// local maps directory (`<map>.png` plus a YAML index). Lookups never
/// fail the view: an unknown or unreadable map yields the shared
/// placeholder texture and `None` details.
pub struct MapPreviewService {
    maps_dir: PathBuf,
    index: HashMap<String, MapDetails>,
    previews: HashMap<String, Option<egui::TextureHandle>>,
    placeholder: Option<egui::TextureHandle>,
}

impl MapPreviewService {
    pub fn new(maps_dir: PathBuf) -> Self {
        let index = match std::fs::read_to_string(maps_dir.join(INDEX_FILE_NAME)) {
            Ok(content) => match serde_yaml_ng::from_str(&content) {
                Ok(index) => index,
                Err(e) => {
                    log!("Ignoring malformed map index: {}", e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            maps_dir,
            index,
            previews: HashMap::new(),
            placeholder: None,
        }
    }

    pub fn details(&self, map_name: &str) -> Option<&MapDetails> {
        self.index.get(map_name)
    }

    /// Preview texture for a map, cached after the first lookup.
    pub fn preview(&mut self, ctx: &egui::Context, map_name: &str) -> egui::TextureHandle {
        if !self.previews.contains_key(map_name) {
            let loaded = self.load_preview(ctx, map_name);
            if loaded.is_none() {
                log!("No preview for map {}, using placeholder", map_name);
            }
            self.previews.insert(map_name.to_string(), loaded);
        }
        match self.previews.get(map_name) {
            Some(Some(texture)) => texture.clone(),
            _ => self.placeholder(ctx),
        }
    }

    fn load_preview(&self, ctx: &egui::Context, map_name: &str) -> Option<egui::TextureHandle> {
        let path = self.maps_dir.join(format!("{}.png", map_name));
        let bytes = std::fs::read(&path).ok()?;
        let decoded = match image::load_from_memory(&bytes) {
            Ok(decoded) => decoded.to_rgba8(),
            Err(e) => {
                log!("Failed to decode preview {}: {}", path.display(), e);
                return None;
            }
        };
        let size = [decoded.width() as usize, decoded.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, decoded.as_raw());
        Some(ctx.load_texture(format!("map_preview_{}", map_name), color_image, Default::default()))
    }

    fn placeholder(&mut self, ctx: &egui::Context) -> egui::TextureHandle {
        if let Some(texture) = &self.placeholder {
            return texture.clone();
        }
        let pixels = [40u8, 44, 52, 255].repeat(PLACEHOLDER_SIDE * PLACEHOLDER_SIDE);
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [PLACEHOLDER_SIDE, PLACEHOLDER_SIDE],
            &pixels,
        );
        let texture = ctx.load_texture("map_preview_placeholder", color_image, Default::default());
        self.placeholder = Some(texture.clone());
        texture
    }
}
