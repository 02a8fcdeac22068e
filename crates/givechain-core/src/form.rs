//! Donor input to drafts. The ledger trusts what it is given, so the
//! positive-amount rule is enforced here.

use crate::charity::Charity;
use crate::donation::{Amount, DonationDraft, ANONYMOUS};
use crate::error::FormError;
use crate::ids::TRANSACTION_IDS;

pub const DEFAULT_AMOUNT: Amount = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DonationForm {
    pub amount: Amount,
    pub donor_name: String,
    pub anonymous: bool,
    pub message: String,
}

impl Default for DonationForm {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            donor_name: String::new(),
            anonymous: false,
            message: String::new(),
        }
    }
}

impl DonationForm {
    /// Build the draft for `charity`. `donor_address` is empty when no wallet
    /// is connected.
    pub fn into_draft(
        self,
        charity: &Charity,
        donor_address: &str,
    ) -> Result<DonationDraft, FormError> {
        if self.amount == 0 {
            return Err(FormError::NonPositiveAmount);
        }
        let donor_name = if self.anonymous {
            Some(ANONYMOUS.to_string())
        } else {
            non_empty(self.donor_name)
        };
        Ok(DonationDraft {
            charity_id: charity.id.clone(),
            charity_name: charity.name.clone(),
            amount: self.amount,
            donor_address: donor_address.to_string(),
            donor_name,
            message: non_empty(self.message),
            transaction_id: TRANSACTION_IDS.next_id(),
        })
    }
}

/// Parse the amount field: a whole number greater than zero.
pub fn parse_amount(input: &str) -> Result<Amount, FormError> {
    let trimmed = input.trim();
    let value: i128 = trimmed
        .parse()
        .map_err(|_| FormError::InvalidAmount(trimmed.to_string()))?;
    if value <= 0 {
        return Err(FormError::NonPositiveAmount);
    }
    Amount::try_from(value).map_err(|_| FormError::InvalidAmount(trimmed.to_string()))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
