pub mod cli;

use crate::core::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_positive_number, validate_range, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "moto2sprit")]
#[command(about = "Converts a motostat CSV export read from STDIN into spritmonitor CSV files")]
#[command(after_help = "Example of usage:\n  $ cat motostat.csv | moto2sprit -o ./out")]
pub struct CliConfig {
    /// Debug flag for debugging
    #[arg(short, long)]
    pub debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Write odometer and trip distances in miles
    #[arg(short, long)]
    pub miles: bool,

    /// Directory receiving spritmonitor_costs.csv and spritmonitor_fuelings.csv
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Capacity of the line queue between the reader and the worker
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// How long the worker sleeps on an empty queue
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn to_converter_config(&self) -> ConverterConfig {
        ConverterConfig {
            debug: self.debug,
            verbose: self.verbose,
            miles: self.miles,
            output_dir: PathBuf::from(&self.output_dir),
            queue_capacity: self.queue_capacity,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_dir", &self.output_dir)?;
        validate_positive_number("queue_capacity", self.queue_capacity, 1)?;
        validate_range("poll_interval_ms", self.poll_interval_ms, 1, 10_000)?;
        Ok(())
    }
}

/// Settings shared by every component of one run. Never changes once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    pub debug: bool,
    pub verbose: bool,
    pub miles: bool,
    pub output_dir: PathBuf,
    pub queue_capacity: usize,
    pub poll_interval: Duration,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            debug: false,
            verbose: false,
            miles: false,
            output_dir: PathBuf::from("."),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl ConfigProvider for ConverterConfig {
    fn output_path(&self) -> &Path {
        &self.output_dir
    }

    fn use_miles(&self) -> bool {
        self.miles
    }

    fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
