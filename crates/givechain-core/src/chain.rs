//! The simulated network boundary.
//!
//! Every store operation makes exactly one [`Chain::call`] and suspends there.
//! The call either resolves or fails; there is no partial progress and no way
//! to cancel it from the store side.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{FaultConfig, LatencyConfig};
use crate::error::{ChainError, StoreError};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FetchCharities,
    FetchFeaturedCharities,
    RegisterCharity,
    FetchDonations,
    FetchUserDonations,
    MakeDonation,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::FetchCharities,
        Operation::FetchFeaturedCharities,
        Operation::RegisterCharity,
        Operation::FetchDonations,
        Operation::FetchUserDonations,
        Operation::MakeDonation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchCharities => "fetch_charities",
            Operation::FetchFeaturedCharities => "fetch_featured_charities",
            Operation::RegisterCharity => "register_charity",
            Operation::FetchDonations => "fetch_donations",
            Operation::FetchUserDonations => "fetch_user_donations",
            Operation::MakeDonation => "make_donation",
        }
    }

    /// The kind a store records when this operation fails.
    pub fn failure(&self) -> StoreError {
        match self {
            Operation::FetchCharities => StoreError::FetchCharities,
            Operation::FetchFeaturedCharities => StoreError::FetchFeaturedCharities,
            Operation::RegisterCharity => StoreError::RegisterCharity,
            Operation::FetchDonations => StoreError::FetchDonations,
            Operation::FetchUserDonations => StoreError::FetchUserDonations,
            Operation::MakeDonation => StoreError::ProcessDonation,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == wanted)
            .ok_or_else(|| format!("unknown operation {s:?}"))
    }
}

#[async_trait]
pub trait Chain: Send + Sync {
    async fn call(&self, op: Operation) -> Result<(), ChainError>;
}

/// Stand-in for the real chain: waits out a fixed delay per operation, then
/// succeeds unless a fault was planned for it.
pub struct SimulatedChain {
    latency: LatencyConfig,
    forced: BTreeSet<Operation>,
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedChain {
    pub fn new(latency: LatencyConfig, faults: &FaultConfig) -> Self {
        Self {
            latency,
            forced: faults.fail.iter().copied().collect(),
            failure_rate: faults.failure_rate,
            rng: Mutex::new(StdRng::seed_from_u64(faults.seed)),
        }
    }

    /// No delay and no faults.
    pub fn instant() -> Self {
        Self::new(LatencyConfig::zero(), &FaultConfig::default())
    }

    /// Fail `op` on every call from now on.
    pub fn fail(mut self, op: Operation) -> Self {
        self.forced.insert(op);
        self
    }

    pub fn delay(&self, op: Operation) -> Duration {
        self.latency.delay(op)
    }

    fn draws_fault(&self, op: Operation) -> bool {
        if self.forced.contains(&op) {
            return true;
        }
        if self.failure_rate <= 0.0 {
            return false;
        }
        match self.rng.lock() {
            Ok(mut rng) => rng.gen::<f64>() < self.failure_rate,
            Err(poisoned) => poisoned.into_inner().gen::<f64>() < self.failure_rate,
        }
    }
}

impl Default for SimulatedChain {
    fn default() -> Self {
        Self::new(LatencyConfig::default(), &FaultConfig::default())
    }
}

#[async_trait]
impl Chain for SimulatedChain {
    async fn call(&self, op: Operation) -> Result<(), ChainError> {
        // Decided up front so the lock is never held across the sleep.
        let fault = self.draws_fault(op);
        let delay = self.delay(op);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if fault {
            return Err(ChainError::Fault(op));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::time::Instant;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn call_waits_for_configured_delay() {
        let chain = SimulatedChain::default();
        let started = Instant::now();
        chain.call(Operation::MakeDonation).await.unwrap();
        assert_waited(started, 1_500);

        let started = Instant::now();
        chain.call(Operation::FetchUserDonations).await.unwrap();
        assert_waited(started, 800);
    }

    fn assert_waited(started: Instant, millis: u64) {
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(millis), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(millis + 5), "{elapsed:?}");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn forced_fault_only_hits_its_operation() {
        let chain = SimulatedChain::instant().fail(Operation::RegisterCharity);
        assert!(matches!(
            chain.call(Operation::RegisterCharity).await,
            Err(ChainError::Fault(Operation::RegisterCharity))
        ));
        assert!(chain.call(Operation::FetchCharities).await.is_ok());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn certain_failure_rate_always_fails() {
        let faults = FaultConfig {
            failure_rate: 1.0,
            ..FaultConfig::default()
        };
        let chain = SimulatedChain::new(LatencyConfig::zero(), &faults);
        for op in Operation::ALL {
            assert!(chain.call(op).await.is_err());
        }
    }

    #[test]
    fn operation_parses_kebab_and_snake_case() {
        assert_eq!("make-donation".parse::<Operation>(), Ok(Operation::MakeDonation));
        assert_eq!(
            "fetch_featured_charities".parse::<Operation>(),
            Ok(Operation::FetchFeaturedCharities)
        );
        assert!("withdraw".parse::<Operation>().is_err());
    }

    #[test]
    fn failure_kinds_map_to_labels() {
        assert_eq!(
            Operation::MakeDonation.failure().to_string(),
            "Failed to process donation"
        );
        assert_eq!(
            Operation::FetchUserDonations.failure().to_string(),
            "Failed to fetch user donations"
        );
    }
}
