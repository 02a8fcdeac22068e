//! Donation Ledger: every donation plus the connected donor's own subset.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use crate::chain::{Chain, Operation};
use crate::donation::{Donation, DonationDraft};
use crate::error::StoreError;
use crate::ids::DONATION_IDS;
use crate::source::DataSource;
use crate::status::{self, Status};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LedgerState {
    pub donations: Vec<Donation>,
    pub user_donations: Vec<Donation>,
    #[serde(flatten)]
    pub status: Status,
}

impl LedgerState {
    /// Whether `address` already has a donation to `charity_id` in the full
    /// list. An empty address never matches.
    pub fn has_donated(&self, address: &str, charity_id: &str) -> bool {
        !address.is_empty()
            && self
                .donations
                .iter()
                .any(|d| d.charity_id == charity_id && d.is_from(address))
    }
}

impl AsMut<Status> for LedgerState {
    fn as_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

/// Outcome of [`DonationLedger::submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub donation: Donation,
    /// No earlier donation from this address to this charity was in the full
    /// list when the donation was committed. Always true without an address.
    pub new_donor: bool,
}

/// Single writer over [`LedgerState`]. Readers get clones or a
/// [`watch::Receiver`]; nothing outside the ledger mutates the lists.
pub struct DonationLedger {
    source: Arc<dyn DataSource>,
    chain: Arc<dyn Chain>,
    state: watch::Sender<LedgerState>,
}

impl DonationLedger {
    pub fn new(source: Arc<dyn DataSource>, chain: Arc<dyn Chain>) -> Self {
        let (state, _) = watch::channel(LedgerState::default());
        Self {
            source,
            chain,
            state,
        }
    }

    pub fn snapshot(&self) -> LedgerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LedgerState> {
        self.state.subscribe()
    }

    pub fn donations(&self) -> Vec<Donation> {
        self.state.borrow().donations.clone()
    }

    pub fn user_donations(&self) -> Vec<Donation> {
        self.state.borrow().user_donations.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().status.is_loading
    }

    pub fn error(&self) -> Option<StoreError> {
        self.state.borrow().status.error
    }

    /// Replace the full list with what the data source holds.
    pub async fn fetch_all(&self) -> Result<(), StoreError> {
        let op = Operation::FetchDonations;
        status::begin(&self.state, op);
        let loaded = match self.chain.call(op).await {
            Ok(()) => self.source.donations(),
            Err(err) => Err(err),
        };
        match loaded {
            Ok(donations) => {
                info!(count = donations.len(), "donations loaded");
                self.state.send_modify(|s| {
                    s.donations = donations;
                    s.status.succeed();
                });
                Ok(())
            }
            Err(err) => Err(status::fail(&self.state, op, err)),
        }
    }

    /// Replace the user subset with every source donation made from
    /// `address`, compared case-insensitively. No match is not an error.
    pub async fn fetch_for_user(&self, address: &str) -> Result<(), StoreError> {
        let op = Operation::FetchUserDonations;
        status::begin(&self.state, op);
        let loaded = match self.chain.call(op).await {
            Ok(()) => self.source.donations(),
            Err(err) => Err(err),
        };
        match loaded {
            Ok(donations) => {
                let mine: Vec<Donation> =
                    donations.into_iter().filter(|d| d.is_from(address)).collect();
                info!(%address, count = mine.len(), "user donations loaded");
                self.state.send_modify(|s| {
                    s.user_donations = mine;
                    s.status.succeed();
                });
                Ok(())
            }
            Err(err) => Err(status::fail(&self.state, op, err)),
        }
    }

    /// Record a donation once the chain round trip succeeds.
    ///
    /// The amount is taken as given; validating it is the caller's job. Two
    /// identical drafts produce two donations. Whether the donor is new is
    /// decided against the full list as it stands at commit, so history only
    /// counts once [`fetch_all`](Self::fetch_all) has loaded it.
    pub async fn submit(&self, draft: DonationDraft) -> Result<Submission, StoreError> {
        let op = Operation::MakeDonation;
        status::begin(&self.state, op);
        if let Err(err) = self.chain.call(op).await {
            return Err(status::fail(&self.state, op, err));
        }
        let donation = draft.into_donation(DONATION_IDS.next_id(), Utc::now());
        info!(
            id = %donation.id,
            charity = %donation.charity_id,
            amount = donation.amount,
            "donation recorded"
        );
        let mut new_donor = true;
        self.state.send_modify(|s| {
            new_donor = !s.has_donated(&donation.donor_address, &donation.charity_id);
            s.donations.push(donation.clone());
            s.user_donations.push(donation.clone());
            s.status.succeed();
        });
        Ok(Submission {
            donation,
            new_donor,
        })
    }
}
