use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::round::{DEFAULT_TOTAL_SEATS, MAX_AVAILABLE};

/// Largest hall the grid will draw; every frame walks all seats
pub const MAX_TOTAL_SEATS: u32 = u16::MAX as u32;
/// Slowest countdown refresh accepted from a config file
pub const MAX_TICK_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// shortest wait before the sale opens
    pub min_wait_ms: u64,
    /// longest wait before the sale opens
    pub max_wait_ms: u64,
    pub total_seats: u32,
    /// seats per row in the grid
    pub columns: u16,
    /// countdown refresh interval
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_wait_ms: 1000,
            max_wait_ms: 3000,
            total_seats: DEFAULT_TOTAL_SEATS,
            columns: 15,
            tick_ms: 10,
        }
    }
}

impl Config {
    /// Clamp values that would make a round impossible to generate or draw
    pub fn sanitized(mut self) -> Self {
        self.total_seats = self
            .total_seats
            .clamp(MAX_AVAILABLE as u32, MAX_TOTAL_SEATS);
        self.columns = self.columns.max(1);
        self.tick_ms = self.tick_ms.clamp(1, MAX_TICK_MS);
        if self.min_wait_ms > self.max_wait_ms {
            std::mem::swap(&mut self.min_wait_ms, &mut self.max_wait_ms);
        }
        self
    }

    /// Number of grid rows needed for every seat
    pub fn rows(&self) -> u32 {
        self.total_seats.div_ceil(self.columns.max(1) as u32)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("ticket_rush_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring malformed config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
