use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::Result;
use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use gpiod::LineId;
use serde::{de::Visitor, Deserialize, Deserializer};
use tracing::Level;

use crate::bus::LineTiming;

const LOG_LEVELS: [&'static str; 5] = ["DEBUG", "ERROR", "INFO", "TRACE", "WARN"];

struct LevelVisitor;

impl<'de> Visitor<'de> for LevelVisitor {
    type Value = Level;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter
            .write_str("one of ")
            .and(formatter.write_str(&LOG_LEVELS.join(",")))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        FromStr::from_str(v).map_err(|_| E::unknown_variant(v, &LOG_LEVELS))
    }
}

pub fn deserialize_level<'de, D>(de: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    de.deserialize_string(LevelVisitor)
}

/// The RS-485 UART.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Serial {
    pub device: PathBuf,
    pub baud: u32,
    /// Start, data, parity and stop bits of one byte on the wire.
    pub bits_per_byte: u32,
    pub turnaround_guard_us: u64,
}

/// Transceiver control lines. Offsets and polarity depend on the board wiring.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Lines {
    pub gpiochip: PathBuf,
    pub direction_line: LineId,
    pub enable_line: LineId,
    pub direction_active_low: bool,
    pub enable_active_low: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub serial: Serial,
    pub lines: Lines,
    #[serde(deserialize_with = "deserialize_level")]
    pub loglevel: Level,
}

impl Settings {
    /// Read settings from the optional `file` (any format `config` knows,
    /// extension omitted), then from `LEDBUS__*` environment variables.
    pub fn new(file: &str) -> Result<Settings> {
        let reader = ConfigBuilder::<DefaultState>::default()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("LEDBUS").separator("__"))
            .build()?;

        Ok(reader.try_deserialize()?)
    }
}

impl Serial {
    pub fn line_timing(&self) -> crate::bus::Result<LineTiming> {
        LineTiming::new(
            self.baud,
            self.bits_per_byte,
            Duration::from_micros(self.turnaround_guard_us),
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            serial: Default::default(),
            lines: Default::default(),
            loglevel: Level::INFO,
        }
    }
}

impl Default for Serial {
    fn default() -> Self {
        Serial {
            device: PathBuf::from("/dev/ttyS1"),
            baud: 500_000,
            bits_per_byte: 10,
            turnaround_guard_us: 50,
        }
    }
}

impl Default for Lines {
    fn default() -> Self {
        Lines {
            gpiochip: PathBuf::from("/dev/gpiochip0"),
            direction_line: 18,
            enable_line: 23,
            direction_active_low: false,
            enable_active_low: false,
        }
    }
}
