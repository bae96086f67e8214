//! Configuration for the simulation runner.
//!
//! Defaults can be overridden via environment variables, and those in
//! turn by command-line flags (see [`ConfigOverrides`]):
//!
//! - `ENGINE_CYCLE_MS`      (default: "10000")
//! - `ENGINE_MAX_CYCLES`    (default: unset, run until interrupted)
//! - `ENGINE_SEED`          (default: unset, random seed)
//! - `ENGINE_MAX_BATCH`     (default: "10")
//! - `ENGINE_PRICE_MIN`     (default: "27")
//! - `ENGINE_PRICE_MAX`     (default: "35")
//! - `ENGINE_QTY_MIN`       (default: "0.1")
//! - `ENGINE_QTY_MAX`       (default: "25")
//! - `ENGINE_REPORT_FORMAT` (default: "text", or "json")

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Args, ValueEnum};
use thiserror::Error;

/// How each cycle is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// CSV report lines.
    #[default]
    Text,
    /// One JSON document per cycle.
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{name} range is empty or non-positive: [{min}, {max})")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("cycle interval must be at least 1 ms")]
    ZeroCycle,
}

/// Runner configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Delay between engine cycles, in milliseconds.
    pub cycle_ms: u64,

    /// Stop after this many cycles; `None` runs until interrupted.
    pub max_cycles: Option<u64>,

    /// Seed for the random order source; `None` picks one at startup.
    pub seed: Option<u64>,

    /// Each random batch holds `0..=max_batch` orders.
    pub max_batch: usize,

    pub price_min: f64,
    pub price_max: f64,
    pub qty_min: f64,
    pub qty_max: f64,

    pub format: ReportFormat,

    /// Replay orders from this CSV file instead of generating them.
    pub replay: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cycle_ms: 10_000,
            max_cycles: None,
            seed: None,
            max_batch: 10,
            price_min: 27.0,
            price_max: 35.0,
            qty_min: 0.1,
            qty_max: 25.0,
            format: ReportFormat::Text,
            replay: None,
        }
    }
}

/// Command-line overrides; every flag is optional.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Milliseconds between engine cycles
    #[arg(long)]
    pub cycle_ms: Option<u64>,

    /// Stop after this many cycles
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// Seed for reproducible random order flow
    #[arg(long)]
    pub seed: Option<u64>,

    /// Upper bound on orders generated per cycle
    #[arg(long)]
    pub max_batch: Option<usize>,

    #[arg(long)]
    pub price_min: Option<f64>,

    #[arg(long)]
    pub price_max: Option<f64>,

    #[arg(long)]
    pub qty_min: Option<f64>,

    #[arg(long)]
    pub qty_max: Option<f64>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Replay orders from a CSV file instead of generating them
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading from an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let config = Config {
            cycle_ms: read_or_default(&lookup, "ENGINE_CYCLE_MS", defaults.cycle_ms)?,
            max_cycles: read_optional(&lookup, "ENGINE_MAX_CYCLES")?,
            seed: read_optional(&lookup, "ENGINE_SEED")?,
            max_batch: read_or_default(&lookup, "ENGINE_MAX_BATCH", defaults.max_batch)?,
            price_min: read_or_default(&lookup, "ENGINE_PRICE_MIN", defaults.price_min)?,
            price_max: read_or_default(&lookup, "ENGINE_PRICE_MAX", defaults.price_max)?,
            qty_min: read_or_default(&lookup, "ENGINE_QTY_MIN", defaults.qty_min)?,
            qty_max: read_or_default(&lookup, "ENGINE_QTY_MAX", defaults.qty_max)?,
            format: read_or_default(&lookup, "ENGINE_REPORT_FORMAT", defaults.format)?,
            replay: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of this config.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let ConfigOverrides {
            cycle_ms,
            max_cycles,
            seed,
            max_batch,
            price_min,
            price_max,
            qty_min,
            qty_max,
            format,
            replay,
        } = overrides;

        self.cycle_ms = cycle_ms.unwrap_or(self.cycle_ms);
        self.max_cycles = max_cycles.or(self.max_cycles);
        self.seed = seed.or(self.seed);
        self.max_batch = max_batch.unwrap_or(self.max_batch);
        self.price_min = price_min.unwrap_or(self.price_min);
        self.price_max = price_max.unwrap_or(self.price_max);
        self.qty_min = qty_min.unwrap_or(self.qty_min);
        self.qty_max = qty_max.unwrap_or(self.qty_max);
        self.format = format.unwrap_or(self.format);
        self.replay = replay.or(self.replay);

        self.validate()?;
        Ok(self)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_ms == 0 {
            return Err(ConfigError::ZeroCycle);
        }
        check_range("price", self.price_min, self.price_max)?;
        check_range("quantity", self.qty_min, self.qty_max)?;
        Ok(())
    }

    /// Cadence of the polling loop.
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_ms)
    }
}

fn check_range(name: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min > 0.0 && min < max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { name, min, max })
    }
}

fn read_optional<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key,
                value: val.clone(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn read_or_default<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    Ok(read_optional(lookup, key)?.unwrap_or(default))
}
