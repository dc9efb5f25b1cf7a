use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use thiserror::Error;

use crate::signal::{SignalOptions, ADC_MAX};
use std::time::Duration;

/// Bring-up parameters restored from disk at startup. None of these affect
/// the pipeline's runtime behavior once it is running.
#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    pub tick_interval_ms: u64,
    pub debounce_ms: u64,
    pub queue_capacity: usize,

    /// Initial stick positions, raw ADC scale.
    pub amplitude_raw: u16,
    pub rate_raw: u16,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is malformed: {0}")]
    Malformed(#[from] ron::error::SpannedError),
}

impl Config {
    const FILE_NAME: &'static str = "monitor.ron";

    /// Loads the config file. `Ok(None)` when there is none yet.
    pub fn restore() -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(Self::FILE_NAME) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(ron::from_str(&contents)?))
    }

    pub fn save(&self) {
        match ron::to_string(self) {
            Ok(result) => {
                fs::File::create(Self::FILE_NAME)
                    .ok()
                    .and_then(|mut f| write!(f, "{}", result).ok());
            }
            Err(err) => eprintln!("Config save failed: {:?}", err),
        }
    }

    /// Records the latest stick positions so the next run starts from them.
    pub fn remember_panel(&mut self, amplitude_raw: u16, rate_raw: u16) {
        self.amplitude_raw = amplitude_raw;
        self.rate_raw = rate_raw;
    }

    pub fn signal_options(&self) -> SignalOptions {
        SignalOptions {
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            debounce_delay: Duration::from_millis(self.debounce_ms),
            queue_capacity: self.queue_capacity.max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1,
            debounce_ms: 50,
            queue_capacity: 512,
            amplitude_raw: ADC_MAX,
            rate_raw: 0,
        }
    }
}
