//! Where fetch operations read their data from.
//!
//! Today that is a fixed set of fixtures compiled into the crate; a chain
//! indexer would slot in behind the same trait.

use crate::charity::Charity;
use crate::donation::Donation;
use crate::error::ChainError;

const CHARITIES_JSON: &str = include_str!("../fixtures/charities.json");
const DONATIONS_JSON: &str = include_str!("../fixtures/donations.json");

pub trait DataSource: Send + Sync {
    fn charities(&self) -> Result<Vec<Charity>, ChainError>;
    fn donations(&self) -> Result<Vec<Donation>, ChainError>;
}

#[derive(Clone, Debug, Default)]
pub struct Fixtures {
    charities: Vec<Charity>,
    donations: Vec<Donation>,
}

impl Fixtures {
    /// The charities and donations the frontend ships as sample data.
    pub fn embedded() -> Result<Self, ChainError> {
        Ok(Self {
            charities: serde_json::from_str(CHARITIES_JSON)?,
            donations: serde_json::from_str(DONATIONS_JSON)?,
        })
    }

    pub fn from_parts(charities: Vec<Charity>, donations: Vec<Donation>) -> Self {
        Self {
            charities,
            donations,
        }
    }
}

impl DataSource for Fixtures {
    fn charities(&self) -> Result<Vec<Charity>, ChainError> {
        Ok(self.charities.clone())
    }

    fn donations(&self) -> Result<Vec<Donation>, ChainError> {
        Ok(self.donations.clone())
    }
}
