//! Engine configuration.
//!
//! Settings come from `corridor.toml` (missing or broken files fall back to
//! defaults) and from `key=value` command-line overrides.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use corridor_common::ConfigError;
use corridor_view::{Camera, CullingMode, CullingPlanner, VisibilityModel};
use corridor_world::LayoutParams;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "corridor.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === World Settings ===
    /// Chunk width in tiles
    pub grid_width: u32,
    /// Chunk height in tiles
    pub grid_height: u32,
    /// Region seeds per chunk (0 = auto, `2 * max(width, height)`)
    pub region_count: u32,
    /// Minimum spacing between region seeds
    pub min_region_spacing: u32,
    /// World seed (None = random)
    pub world_seed: Option<u64>,

    // === Culling Settings ===
    /// Enable culling (off = draw the whole chunk)
    pub culling_enabled: bool,
    /// Culling mode: `viewport`, `chunk` or `fog-of-war`
    #[serde(deserialize_with = "lenient_mode")]
    pub culling_mode: CullingMode,
    /// Extra tiles beyond the max tint radius in fog-of-war mode
    pub fog_focus_buffer: u32,

    // === Fog Settings ===
    /// Enable fog of war
    pub fog_enabled: bool,
    /// Fully clear radius around the player
    pub clear_radius: u32,
    /// Radius beyond which tiles are fully fogged
    pub max_tint_radius: u32,
    /// Fog strength in percent (0-100)
    pub fog_intensity: u32,

    // === View Settings ===
    /// Tile size in pixels
    pub cell_size: f32,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// Minimum camera zoom
    pub min_zoom: f32,
    /// Maximum camera zoom
    pub max_zoom: f32,

    // === Movement ===
    /// Minimum time between moves in milliseconds
    pub move_cooldown_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // World
            grid_width: 50,
            grid_height: 50,
            region_count: 0,
            min_region_spacing: 3,
            world_seed: None,

            // Culling
            culling_enabled: true,
            culling_mode: CullingMode::Viewport,
            fog_focus_buffer: 5,

            // Fog
            fog_enabled: true,
            clear_radius: 5,
            max_tint_radius: 8,
            fog_intensity: 80,

            // View
            cell_size: 12.0,
            viewport_width: 1280,
            viewport_height: 720,
            min_zoom: 0.1,
            max_zoom: 3.0,

            // Movement
            move_cooldown_ms: 150,
        }
    }
}

fn lenient_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CullingMode, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(CullingMode::parse(&raw).unwrap_or_else(|| {
        warn!("Unknown culling mode '{raw}', using viewport");
        CullingMode::Viewport
    }))
}

/// Parses `raw`, falling back to `default` with a warning.
fn parse_or<T: FromStr + std::fmt::Display>(key: &str, raw: &str, default: T) -> T {
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("Invalid value '{raw}' for {key}, using default {default}");
            default
        },
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default configuration file path (working directory).
    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    /// Applies one `key=value` override.
    ///
    /// Numbers that fail to parse fall back to the field's default rather
    /// than keeping the current value.
    pub fn apply_override(&mut self, pair: &str) -> Result<(), ConfigError> {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedOverride(pair.to_string()))?;
        let key = key.trim();
        let d = Self::default();

        match key {
            "grid_width" | "width" => self.grid_width = parse_or(key, raw, d.grid_width),
            "grid_height" | "height" => self.grid_height = parse_or(key, raw, d.grid_height),
            "region_count" | "regions" => self.region_count = parse_or(key, raw, d.region_count),
            "min_region_spacing" | "distance" => {
                self.min_region_spacing = parse_or(key, raw, d.min_region_spacing);
            },
            "world_seed" | "seed" => {
                self.world_seed = match raw.trim() {
                    "" | "random" => None,
                    s => Some(parse_or(key, s, 12345)),
                };
            },
            "culling_enabled" | "culling" => {
                self.culling_enabled = parse_or(key, raw, d.culling_enabled);
            },
            "culling_mode" | "mode" => {
                self.culling_mode = CullingMode::parse(raw).unwrap_or_else(|| {
                    warn!("Unknown culling mode '{raw}', using viewport");
                    d.culling_mode
                });
            },
            "fog_focus_buffer" | "focus" => {
                self.fog_focus_buffer = parse_or(key, raw, d.fog_focus_buffer);
            },
            "fog_enabled" | "fog" => self.fog_enabled = parse_or(key, raw, d.fog_enabled),
            "clear_radius" => self.clear_radius = parse_or(key, raw, d.clear_radius),
            "max_tint_radius" | "max_radius" => {
                self.max_tint_radius = parse_or(key, raw, d.max_tint_radius);
            },
            "fog_intensity" | "intensity" => {
                self.fog_intensity = parse_or(key, raw, d.fog_intensity);
            },
            "cell_size" => self.cell_size = parse_or(key, raw, d.cell_size),
            "viewport_width" => self.viewport_width = parse_or(key, raw, d.viewport_width),
            "viewport_height" => self.viewport_height = parse_or(key, raw, d.viewport_height),
            "min_zoom" => self.min_zoom = parse_or(key, raw, d.min_zoom),
            "max_zoom" => self.max_zoom = parse_or(key, raw, d.max_zoom),
            "move_cooldown_ms" | "cooldown" => {
                self.move_cooldown_ms = parse_or(key, raw, d.move_cooldown_ms);
            },
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // World
        self.grid_width = self.grid_width.clamp(3, 1000);
        self.grid_height = self.grid_height.clamp(3, 1000);
        self.region_count = self.region_count.min(100_000);
        self.min_region_spacing = self.min_region_spacing.clamp(1, 100);

        // Fog
        self.clear_radius = self.clear_radius.min(500);
        self.max_tint_radius = self.max_tint_radius.clamp(self.clear_radius + 1, 1000);
        self.fog_intensity = self.fog_intensity.min(100);
        self.fog_focus_buffer = self.fog_focus_buffer.min(500);

        // View
        if !self.cell_size.is_finite() {
            self.cell_size = 12.0;
        }
        self.cell_size = self.cell_size.clamp(1.0, 128.0);
        self.viewport_width = self.viewport_width.clamp(64, 7680);
        self.viewport_height = self.viewport_height.clamp(64, 4320);
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite()) {
            self.min_zoom = 0.1;
            self.max_zoom = 3.0;
        }
        self.min_zoom = self.min_zoom.clamp(0.01, 1.0);
        self.max_zoom = self.max_zoom.clamp(self.min_zoom, 20.0);

        // Movement
        self.move_cooldown_ms = self.move_cooldown_ms.min(10_000);
    }

    /// Generation parameters for every chunk.
    #[must_use]
    pub const fn layout_params(&self) -> LayoutParams {
        LayoutParams::new(
            self.grid_width,
            self.grid_height,
            self.region_count,
            self.min_region_spacing,
        )
    }

    /// Region count with `0 = auto` resolved.
    #[must_use]
    pub fn effective_region_count(&self) -> u32 {
        self.layout_params().resolved_region_count()
    }

    /// Fog model built from these settings.
    #[must_use]
    pub fn visibility_model(&self) -> VisibilityModel {
        let mut model = VisibilityModel::new();
        model.set_enabled(self.fog_enabled);
        model.set_clear_radius(self.clear_radius);
        model.set_max_tint_radius(self.max_tint_radius);
        model.set_tint_intensity(self.fog_intensity as f32 / 100.0);
        model
    }

    /// Culling planner built from these settings.
    #[must_use]
    pub fn culling_planner(&self) -> CullingPlanner {
        let mut planner = CullingPlanner::new();
        planner.set_enabled(self.culling_enabled);
        planner.set_mode(self.culling_mode);
        planner.set_fog_focus_buffer(self.fog_focus_buffer);
        planner
    }

    /// Camera built from these settings.
    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera::new(self.viewport_width, self.viewport_height)
            .with_zoom_limits(self.min_zoom, self.max_zoom)
    }

    /// Move cooldown.
    #[must_use]
    pub const fn move_cooldown(&self) -> Duration {
        Duration::from_millis(self.move_cooldown_ms)
    }
}
