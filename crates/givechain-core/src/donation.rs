use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::charity::CharityId;

pub type DonationId = String;
pub type Address = String;
pub type Amount = u64;

/// Donor name recorded when the donor opts out of attribution.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Donation {
    pub id: DonationId,
    pub charity_id: CharityId,
    /// Charity name as it was when the donation was made.
    pub charity_name: String,
    pub amount: Amount,
    /// Empty when no wallet was connected.
    pub donor_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub transaction_id: String,
}

impl Donation {
    pub fn is_from(&self, address: &str) -> bool {
        same_address(&self.donor_address, address)
    }

    pub fn is_anonymous(&self) -> bool {
        self.donor_name.as_deref() == Some(ANONYMOUS)
    }
}

/// Caller-supplied part of a donation; id and timestamp are assigned on
/// submission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DonationDraft {
    pub charity_id: CharityId,
    pub charity_name: String,
    pub amount: Amount,
    pub donor_address: Address,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub transaction_id: String,
}

impl DonationDraft {
    pub fn into_donation(self, id: DonationId, timestamp: DateTime<Utc>) -> Donation {
        Donation {
            id,
            charity_id: self.charity_id,
            charity_name: self.charity_name,
            amount: self.amount,
            donor_address: self.donor_address,
            donor_name: self.donor_name,
            message: self.message,
            timestamp,
            transaction_id: self.transaction_id,
        }
    }
}

/// Wallet addresses compare without regard to case.
pub fn same_address(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_match_ignores_case() {
        assert!(same_address("ST2CY5V39NHDP", "st2cy5v39nhdp"));
        assert!(!same_address("ST2CY5V39NHDP", "ST2CY5V39NHDQ"));
        assert!(same_address("", ""));
    }

    #[test]
    fn draft_becomes_donation_verbatim() {
        let draft = DonationDraft {
            charity_id: "charity-1".into(),
            charity_name: "Doctors Without Borders".into(),
            amount: 50,
            donor_address: "ST1ALICE".into(),
            donor_name: Some(ANONYMOUS.into()),
            message: None,
            transaction_id: "tx-1".into(),
        };
        let now = Utc::now();
        let donation = draft.into_donation("donation-7".into(), now);
        assert_eq!(donation.id, "donation-7");
        assert_eq!(donation.amount, 50);
        assert_eq!(donation.timestamp, now);
        assert!(donation.is_anonymous());
        assert!(donation.is_from("st1alice"));
    }

    #[test]
    fn timestamp_serializes_as_rfc3339() {
        let json = r#"{
            "id": "donation-1",
            "charity_id": "charity-1",
            "charity_name": "Doctors Without Borders",
            "amount": 500,
            "donor_address": "ST1PQ",
            "timestamp": "2024-01-15T10:30:00Z",
            "transaction_id": "0x12"
        }"#;
        let donation: Donation = serde_json::from_str(json).unwrap();
        assert_eq!(donation.donor_name, None);
        let out = serde_json::to_value(&donation).unwrap();
        assert_eq!(out["timestamp"], "2024-01-15T10:30:00Z");
    }
}
