use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chain::Operation;
use crate::error::ConfigError;

/// Runtime settings for the simulated backend.
///
/// Loaded from a JSON file; every field is optional and falls back to the
/// values the web frontend ships with.
///
/// ```json
/// { "latency": { "make_donation_ms": 200 }, "faults": { "fail": ["register_charity"] } }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub latency: LatencyConfig,
    pub faults: FaultConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.faults.failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::FailureRate(rate));
        }
        Ok(())
    }
}

/// Per-operation delay of the simulated round trip, in milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LatencyConfig {
    pub fetch_charities_ms: u64,
    pub fetch_featured_charities_ms: u64,
    pub register_charity_ms: u64,
    pub fetch_donations_ms: u64,
    pub fetch_user_donations_ms: u64,
    pub make_donation_ms: u64,
}

impl LatencyConfig {
    pub fn zero() -> Self {
        Self {
            fetch_charities_ms: 0,
            fetch_featured_charities_ms: 0,
            register_charity_ms: 0,
            fetch_donations_ms: 0,
            fetch_user_donations_ms: 0,
            make_donation_ms: 0,
        }
    }

    pub fn delay(&self, op: Operation) -> Duration {
        let ms = match op {
            Operation::FetchCharities => self.fetch_charities_ms,
            Operation::FetchFeaturedCharities => self.fetch_featured_charities_ms,
            Operation::RegisterCharity => self.register_charity_ms,
            Operation::FetchDonations => self.fetch_donations_ms,
            Operation::FetchUserDonations => self.fetch_user_donations_ms,
            Operation::MakeDonation => self.make_donation_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            fetch_charities_ms: 1_000,
            fetch_featured_charities_ms: 1_000,
            register_charity_ms: 2_000,
            fetch_donations_ms: 1_000,
            fetch_user_donations_ms: 800,
            make_donation_ms: 1_500,
        }
    }
}

/// Failures to inject into the simulated chain.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaultConfig {
    /// Operations that fail on every call.
    pub fail: Vec<Operation>,
    /// Probability that any other call fails, `0.0..=1.0`.
    pub failure_rate: f64,
    pub seed: u64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            fail: Vec::new(),
            failure_rate: 0.0,
            seed: 0x6976_6543,
        }
    }
}
