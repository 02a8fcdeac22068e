use std::sync::Arc;

use tracing::warn;

use crate::chain::{Chain, SimulatedChain};
use crate::charity::{Charity, CharityDraft};
use crate::config::Config;
use crate::donation::{Donation, DonationDraft};
use crate::error::{ChainError, StoreError};
use crate::ledger::{DonationLedger, Submission};
use crate::registry::CharityRegistry;
use crate::source::{DataSource, Fixtures};

/// Application state, built once at start-up and handed to whatever drives
/// it. Owns one registry and one ledger over a shared source and chain.
pub struct Store {
    pub registry: CharityRegistry,
    pub ledger: DonationLedger,
}

impl Store {
    pub fn new(source: Arc<dyn DataSource>, chain: Arc<dyn Chain>) -> Self {
        Self {
            registry: CharityRegistry::new(Arc::clone(&source), Arc::clone(&chain)),
            ledger: DonationLedger::new(source, chain),
        }
    }

    /// Embedded fixtures behind a simulated chain tuned by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ChainError> {
        let source = Fixtures::embedded()?;
        let chain = SimulatedChain::new(config.latency.clone(), &config.faults);
        Ok(Self::new(Arc::new(source), Arc::new(chain)))
    }

    pub async fn fetch_charities(&self) -> Result<(), StoreError> {
        self.registry.fetch_all().await
    }

    pub async fn fetch_featured_charities(&self) -> Result<(), StoreError> {
        self.registry.fetch_featured().await
    }

    pub async fn register_charity(&self, draft: CharityDraft) -> Result<Charity, StoreError> {
        self.registry.register(draft).await
    }

    pub async fn fetch_donations(&self) -> Result<(), StoreError> {
        self.ledger.fetch_all().await
    }

    pub async fn fetch_user_donations(&self, address: &str) -> Result<(), StoreError> {
        self.ledger.fetch_for_user(address).await
    }

    /// Submit a donation and, once it is recorded, credit the charity.
    ///
    /// `total_donations` grows by the amount. `donor_count` grows unless the
    /// donor's address already gave to this charity; donations without an
    /// address always count as a new donor. A failed submission credits
    /// nothing.
    ///
    /// Earlier donations are only recognised once [`fetch_donations`]
    /// has loaded them; call it first or every donor counts as new.
    ///
    /// [`fetch_donations`]: Self::fetch_donations
    pub async fn make_donation(&self, draft: DonationDraft) -> Result<Donation, StoreError> {
        let Submission {
            donation,
            new_donor,
        } = self.ledger.submit(draft).await?;
        if !self
            .registry
            .credit(&donation.charity_id, donation.amount, new_donor)
        {
            warn!(
                charity = %donation.charity_id,
                "donation recorded for a charity that is not loaded"
            );
        }
        Ok(donation)
    }
}
