use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::geometry::Region;
use crate::input::KeymapPreset;
use crate::nav::{DEFAULT_HISTORY_CAPACITY, DEFAULT_STEP_PX, MIN_CELL_PX, NavSettings};

const APP_DIR: &str = "keygrid";

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub sequence: SequenceConfig,
    pub motion: MotionConfig,
    pub grid: GridConfig,
    pub keymap: KeymapConfig,
    pub desktop: DesktopConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SequenceConfig {
    pub window_ms: u64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self { window_ms: 250 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MotionConfig {
    pub tick_ms: u64,
    pub step_px: i32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            step_px: DEFAULT_STEP_PX,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GridConfig {
    pub min_cell_px: i32,
    pub history_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_cell_px: MIN_CELL_PX,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: KeymapPreset::Qwerty.as_str().to_string(),
        }
    }
}

/// Monitor layout for the simulated desktop.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DesktopConfig {
    pub monitors: Vec<Region>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            monitors: vec![Region::new(0, 0, 1920, 1080)],
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        parsed.validate()?;
        Ok(parsed.sanitized())
    }

    /// Rejects values that have no sensible substitute.
    pub fn validate(&self) -> AppResult<()> {
        if self.sequence.window_ms == 0 {
            return Err(AppError::invalid_configuration(
                "sequence.window_ms must be greater than zero",
            ));
        }
        // Zero-area monitors are allowed; the navigator substitutes them.
        let span = i64::from(i32::MIN)..=i64::from(i32::MAX);
        for monitor in &self.desktop.monitors {
            let width = i64::from(monitor.right) - i64::from(monitor.left);
            let height = i64::from(monitor.bottom) - i64::from(monitor.top);
            if !span.contains(&width) || !span.contains(&height) {
                return Err(AppError::invalid_configuration(format!(
                    "desktop.monitors entry {monitor:?} is wider or taller than i32::MAX"
                )));
            }
        }
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        self.motion.tick_ms = self.motion.tick_ms.max(1);
        self.motion.step_px = self.motion.step_px.max(1);
        self.grid.min_cell_px = self.grid.min_cell_px.max(1);
        self.grid.history_capacity = self.grid.history_capacity.max(1);
        self
    }

    pub fn disambiguation_window(&self) -> Duration {
        Duration::from_millis(self.sequence.window_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.motion.tick_ms)
    }

    pub fn keymap_preset(&self) -> KeymapPreset {
        KeymapPreset::parse(&self.keymap.preset)
    }

    pub fn nav_settings(&self) -> NavSettings {
        NavSettings {
            min_cell_px: self.grid.min_cell_px,
            step_px: self.motion.step_px,
            history_capacity: self.grid.history_capacity,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("KEYGRID_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }
    app_dir().map(|dir| dir.join("config.toml"))
}

pub fn default_log_dir() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("logs"))
}

fn app_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(PathBuf::from(home).join(".config").join(APP_DIR));
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join(APP_DIR));
    }
    None
}
