//! Simulator configuration
//!
//! Optional TOML file; every field falls back to the board defaults.
//!
//! ```toml
//! [led]
//! name = "led_red"
//! number = 38
//! half_period_ms = 500
//!
//! [lcd]
//! backlight_name = "lcd_bl"
//! backlight_pin = 39
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use w601_board::hal::PinId;
use w601_board::pins;
use w601_demos::blink::HALF_PERIOD_MS;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// LED used by the blink demo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedConfig {
    pub name: String,
    pub number: u8,
    pub half_period_ms: u32,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            name: pins::LED_RED.name.to_string(),
            number: pins::LED_RED.number,
            half_period_ms: HALF_PERIOD_MS,
        }
    }
}

/// LCD wiring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcdConfig {
    pub backlight_name: String,
    pub backlight_pin: u8,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            backlight_name: pins::LCD_BACKLIGHT.name.to_string(),
            backlight_pin: pins::LCD_BACKLIGHT.number,
        }
    }
}

/// Complete simulator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub led: LedConfig,
    pub lcd: LcdConfig,
}

impl SimConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Configuration with its pin handles resolved
///
/// `PinId` carries a `'static` label, so each configured name is leaked
/// exactly once, here, for the life of the process.
#[derive(Debug, Clone)]
pub struct Board {
    pub config: SimConfig,
    pub led: PinId,
    pub backlight: PinId,
}

impl Board {
    pub fn resolve(config: SimConfig) -> Self {
        let led = PinId::new(leak_name(&config.led.name), config.led.number);
        let backlight = PinId::new(leak_name(&config.lcd.backlight_name), config.lcd.backlight_pin);
        Self {
            config,
            led,
            backlight,
        }
    }
}

fn leak_name(name: &str) -> &'static str {
    Box::leak(name.to_owned().into_boxed_str())
}
