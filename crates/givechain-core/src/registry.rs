//! Charity Registry: the charity list, its featured subset and registration.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::chain::{Chain, Operation};
use crate::charity::{Charity, CharityDraft};
use crate::donation::Amount;
use crate::error::StoreError;
use crate::ids::CHARITY_IDS;
use crate::source::DataSource;
use crate::status::{self, Status};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistryState {
    pub charities: Vec<Charity>,
    pub featured_charities: Vec<Charity>,
    #[serde(flatten)]
    pub status: Status,
}

impl RegistryState {
    /// Look a charity up by id, in the full list first, then the featured one.
    pub fn find(&self, id: &str) -> Option<&Charity> {
        self.charities
            .iter()
            .chain(self.featured_charities.iter())
            .find(|c| c.id == id)
    }

    /// Distinct categories of the loaded charities, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for charity in &self.charities {
            if !seen.contains(&charity.category.as_str()) {
                seen.push(&charity.category);
            }
        }
        seen
    }

    pub fn search(&self, filter: &CharityFilter) -> Vec<&Charity> {
        self.charities.iter().filter(|c| filter.matches(c)).collect()
    }
}

impl AsMut<Status> for RegistryState {
    fn as_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

/// Browse filter: free-text term over name and description, plus an
/// optional exact category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharityFilter {
    pub term: String,
    pub category: Option<String>,
}

impl CharityFilter {
    pub fn matches(&self, charity: &Charity) -> bool {
        let term = self.term.to_lowercase();
        let text_hit = charity.name.to_lowercase().contains(&term)
            || charity.description.to_lowercase().contains(&term);
        let category_hit = match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => charity.category == category,
        };
        text_hit && category_hit
    }
}

pub struct CharityRegistry {
    source: Arc<dyn DataSource>,
    chain: Arc<dyn Chain>,
    state: watch::Sender<RegistryState>,
}

impl CharityRegistry {
    pub fn new(source: Arc<dyn DataSource>, chain: Arc<dyn Chain>) -> Self {
        let (state, _) = watch::channel(RegistryState::default());
        Self {
            source,
            chain,
            state,
        }
    }

    pub fn snapshot(&self) -> RegistryState {
        self.state.borrow().clone()
    }

    pub fn charities(&self) -> Vec<Charity> {
        self.state.borrow().charities.clone()
    }

    pub fn featured_charities(&self) -> Vec<Charity> {
        self.state.borrow().featured_charities.clone()
    }

    pub fn find(&self, id: &str) -> Option<Charity> {
        self.state.borrow().find(id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().status.is_loading
    }

    pub fn error(&self) -> Option<StoreError> {
        self.state.borrow().status.error
    }

    pub async fn fetch_all(&self) -> Result<(), StoreError> {
        let op = Operation::FetchCharities;
        status::begin(&self.state, op);
        let loaded = match self.chain.call(op).await {
            Ok(()) => self.source.charities(),
            Err(err) => Err(err),
        };
        match loaded {
            Ok(charities) => {
                info!(count = charities.len(), "charities loaded");
                self.state.send_modify(|s| {
                    s.charities = charities;
                    s.status.succeed();
                });
                Ok(())
            }
            Err(err) => Err(status::fail(&self.state, op, err)),
        }
    }

    pub async fn fetch_featured(&self) -> Result<(), StoreError> {
        let op = Operation::FetchFeaturedCharities;
        status::begin(&self.state, op);
        let loaded = match self.chain.call(op).await {
            Ok(()) => self.source.charities(),
            Err(err) => Err(err),
        };
        match loaded {
            Ok(charities) => {
                let featured: Vec<Charity> = charities.into_iter().filter(|c| c.featured).collect();
                info!(count = featured.len(), "featured charities loaded");
                self.state.send_modify(|s| {
                    s.featured_charities = featured;
                    s.status.succeed();
                });
                Ok(())
            }
            Err(err) => Err(status::fail(&self.state, op, err)),
        }
    }

    /// Accept a new charity. There is no review step: the charity is appended
    /// straight away, unverified and with zeroed counters.
    pub async fn register(&self, draft: CharityDraft) -> Result<Charity, StoreError> {
        let op = Operation::RegisterCharity;
        status::begin(&self.state, op);
        if let Err(err) = self.chain.call(op).await {
            return Err(status::fail(&self.state, op, err));
        }
        let charity = draft.into_charity(CHARITY_IDS.next_id());
        info!(id = %charity.id, name = %charity.name, "charity registered");
        self.state.send_modify(|s| {
            s.charities.push(charity.clone());
            s.status.succeed();
        });
        Ok(charity)
    }

    /// Add an accepted donation to every loaded copy of the charity. Returns
    /// false when the charity is not loaded.
    pub fn credit(&self, charity_id: &str, amount: Amount, new_donor: bool) -> bool {
        let found = self.state.send_if_modified(|s| {
            let mut found = false;
            for charity in s
                .charities
                .iter_mut()
                .chain(s.featured_charities.iter_mut())
                .filter(|c| c.id == charity_id)
            {
                charity.credit(amount, new_donor);
                found = true;
            }
            found
        });
        debug!(charity = %charity_id, amount, new_donor, found, "counters credited");
        found
    }
}
