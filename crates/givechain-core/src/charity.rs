use serde::{Deserialize, Serialize};

use crate::donation::Amount;
use crate::error::FormError;

pub type CharityId = String;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Charity {
    pub id: CharityId,
    pub name: String,
    pub description: String,
    pub mission: String,
    pub category: String,
    pub image_url: String,
    pub website: String,
    /// Address donations are sent to. Opaque, only checked for presence.
    pub wallet_address: String,
    /// Set by an external review, never by the donor-facing flow.
    pub verified: bool,
    pub total_donations: Amount,
    pub donor_count: u64,
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
}

impl Charity {
    /// Apply an accepted donation to the aggregate counters.
    pub fn credit(&mut self, amount: Amount, new_donor: bool) {
        self.total_donations = self.total_donations.saturating_add(amount);
        if new_donor {
            self.donor_count = self.donor_count.saturating_add(1);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self.twitter.is_none() && self.facebook.is_none() && self.instagram.is_none()
    }
}

/// Fields supplied by whoever registers a charity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CharityDraft {
    pub name: String,
    pub description: String,
    pub mission: String,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    pub website: String,
    pub wallet_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
}

impl CharityDraft {
    /// Check the fields the registration form marks as required.
    pub fn validate(&self) -> Result<(), FormError> {
        let required = [
            ("name", &self.name),
            ("description", &self.description),
            ("mission", &self.mission),
            ("category", &self.category),
            ("website", &self.website),
            ("wallet_address", &self.wallet_address),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(field));
            }
        }
        Ok(())
    }

    /// Build the registered charity. Review state and counters always start
    /// from zero regardless of what the draft carried.
    pub fn into_charity(self, id: CharityId) -> Charity {
        Charity {
            id,
            name: self.name,
            description: self.description,
            mission: self.mission,
            category: self.category,
            image_url: self.image_url,
            website: self.website,
            wallet_address: self.wallet_address,
            verified: false,
            total_donations: 0,
            donor_count: 0,
            featured: false,
            social_links: self.social_links.filter(|links| !links.is_empty()),
        }
    }
}
