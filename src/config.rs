//! Simulation settings, loaded from TOML and overridden from the CLI.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capacity::{TeamState, required_robots};
use crate::error::ConfigError;
use crate::types::{Floor, Tick, Weight};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the mail generator.
    pub seed: u64,
    /// Floors in the building, mailroom included.
    pub floors: Floor,
    pub robots: usize,
    pub mail_to_create: usize,
    pub mail_min_weight: Weight,
    pub mail_max_weight: Weight,
    /// Mail arrives uniformly over ticks `1..=arrival_window`.
    pub arrival_window: Tick,
    /// Chance that a generated item is priority mail.
    pub priority_probability: f64,
    /// Give up if the run has not finished by this tick.
    pub max_ticks: Tick,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 30006,
            floors: 10,
            robots: 3,
            mail_to_create: 80,
            mail_min_weight: 200,
            mail_max_weight: TeamState::Single.max_weight(),
            arrival_window: 90,
            priority_probability: 0.1,
            max_ticks: 100_000,
        }
    }
}

impl SimConfig {
    /// Read a TOML file; fields it leaves out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.floors == 0 {
            return Err(ConfigError::Invalid("floors must be > 0".into()));
        }
        if self.robots == 0 {
            return Err(ConfigError::Invalid("robots must be > 0".into()));
        }
        if self.arrival_window == 0 {
            return Err(ConfigError::Invalid("arrival_window must be > 0".into()));
        }
        if self.mail_min_weight > self.mail_max_weight {
            return Err(ConfigError::Invalid(format!(
                "mail_min_weight {} is above mail_max_weight {}",
                self.mail_min_weight, self.mail_max_weight
            )));
        }
        if !(0.0..=1.0).contains(&self.priority_probability) {
            return Err(ConfigError::Invalid(format!(
                "priority_probability {} is outside [0, 1]",
                self.priority_probability
            )));
        }
        let needed = required_robots(self.mail_max_weight)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if needed > self.robots {
            return Err(ConfigError::Invalid(format!(
                "mail up to {} needs {needed} robots but only {} are configured",
                self.mail_max_weight, self.robots
            )));
        }
        Ok(())
    }
}
