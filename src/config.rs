use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::{error::Result, stats::Output};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// spot slots per timed function
    pub num_spots: usize,
    /// runs between resets of the top durations
    pub reset_at: u64,
    /// JSON timing log; timings are printed when absent
    pub json_log: Option<PathBuf>,
    /// where to chart the last logged timing
    pub chart: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_spots: 10,
            reset_at: 100,
            json_log: None,
            chart: None,
        }
    }
}

impl Config {
    pub fn value_parse(path: impl AsRef<Path>) -> Result<Self> {
        let c = std::fs::read_to_string(path)?;
        let val: Self = toml::from_str(&c)?;
        Ok(val)
    }

    /// Falls back to [`Config::default`] when `path` doesn't exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            info!("config: {}", path.display());
            Self::value_parse(path)
        } else {
            info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn output(&self) -> Output {
        match &self.json_log {
            Some(p) => Output::Json(p.clone()),
            None => Output::Print,
        }
    }
}
