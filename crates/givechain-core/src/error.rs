use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::chain::Operation;

/// Failure kinds recorded by the stores.
///
/// The taxonomy is flat: one kind per operation and no detail. The cause is
/// logged where the failure is caught and then dropped.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Loading the full donation list failed.
    #[error("Failed to fetch donations")]
    FetchDonations,

    /// Loading the connected donor's donations failed.
    #[error("Failed to fetch user donations")]
    FetchUserDonations,

    /// Submitting a donation failed; nothing was recorded.
    #[error("Failed to process donation")]
    ProcessDonation,

    /// Loading the charity list failed.
    #[error("Failed to fetch charities")]
    FetchCharities,

    /// Loading the featured charities failed.
    #[error("Failed to fetch featured charities")]
    FetchFeaturedCharities,

    /// Registering a charity failed; nothing was added.
    #[error("Failed to register charity")]
    RegisterCharity,
}

impl Serialize for StoreError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Errors raised underneath the stores, by the chain or the data source.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Injected failure, either forced for the operation or drawn at random.
    #[error("simulated fault during {0}")]
    Fault(Operation),

    /// Fixture data could not be decoded.
    #[error("malformed fixture data: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Donor input rejected before it reaches a store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("donation amount must be a positive whole number")]
    NonPositiveAmount,

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

/// Configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failure rate {0} is outside 0.0..=1.0")]
    FailureRate(f64),
}
