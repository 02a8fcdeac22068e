//! Core state for the GiveChain donation app.
//!
//! Everything a donor-facing frontend needs lives here, with the chain
//! itself mocked out:
//!
//! * [`registry`]: the charity list, its featured subset and registration.
//! * [`ledger`]: every recorded donation plus the connected donor's subset.
//! * [`store`]: the context object owning one registry and one ledger.
//! * [`chain`]: the simulated network round trip each operation awaits.
//! * [`source`]: the fixture data that fetch operations read from.
//! * [`form`]: validation that turns donor input into drafts.
//!
//! State is held in memory only and is gone when the process exits.

pub mod chain;
pub mod charity;
pub mod config;
pub mod donation;
pub mod form;
pub mod ids;
pub mod ledger;
pub mod registry;
pub mod source;
pub mod status;
pub mod store;

mod error;

pub use chain::{Chain, Operation, SimulatedChain};
pub use charity::{Charity, CharityDraft, SocialLinks};
pub use config::Config;
pub use donation::{Amount, Donation, DonationDraft, ANONYMOUS};
pub use error::{ChainError, ConfigError, FormError, StoreError};
pub use ledger::{DonationLedger, Submission};
pub use registry::{CharityFilter, CharityRegistry};
pub use source::{DataSource, Fixtures};
pub use store::Store;
