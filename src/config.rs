use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// countdown length of a round
    pub round_secs: u32,
    /// wall-clock length of one countdown step
    pub tick_ms: u64,
    /// remaining seconds at which the timer turns red
    pub warning_secs: u32,
    /// fixed seed for reproducible color sequences
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_secs: 30,
            tick_ms: 1000,
            warning_secs: 10,
            seed: None,
        }
    }
}

impl Config {
    /// Layers command line values over the stored ones
    pub fn with_overrides(
        mut self,
        round_secs: Option<u32>,
        tick_ms: Option<u64>,
        seed: Option<u64>,
    ) -> Self {
        if let Some(secs) = round_secs {
            self.round_secs = secs;
        }
        if let Some(ms) = tick_ms {
            self.tick_ms = ms;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Replaces zero durations, which cannot drive a round, with the defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Config::default();
        if self.round_secs == 0 {
            tracing::warn!("round_secs of 0 in config, using {}", defaults.round_secs);
            self.round_secs = defaults.round_secs;
        }
        if self.tick_ms == 0 {
            tracing::warn!("tick_ms of 0 in config, using {}", defaults.tick_ms);
            self.tick_ms = defaults.tick_ms;
        }
        self
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
        Self {
            path: AppDirs::config_path(),
        }
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
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), "ignoring unreadable config: {e}");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
