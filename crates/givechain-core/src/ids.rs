//! Client-side identifier generation.
//!
//! Identifiers look like `<prefix>-<millis>`, seeded from the wall clock the
//! way the frontend stamps them, but each sequence is strictly increasing so
//! two records created in the same millisecond still get distinct ids.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub static DONATION_IDS: IdSequence = IdSequence::new("donation");
pub static CHARITY_IDS: IdSequence = IdSequence::new("charity");
pub static TRANSACTION_IDS: IdSequence = IdSequence::new("tx");

pub struct IdSequence {
    prefix: &'static str,
    last: AtomicU64,
}

impl IdSequence {
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            last: AtomicU64::new(0),
        }
    }

    /// Next numeric suffix: the current time in milliseconds, or one past the
    /// previous value if the clock has not moved on.
    pub fn next_value(&self) -> u64 {
        let now = now_millis();
        let step = |last: u64| now.max(last.saturating_add(1));
        match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(step(last)))
        {
            Ok(prev) | Err(prev) => step(prev),
        }
    }

    pub fn next_id(&self) -> String {
        format!("{}-{}", self.prefix, self.next_value())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    #[test]
    fn ids_are_unique_within_a_burst() {
        let seq = IdSequence::new("donation");
        let ids: BTreeSet<String> = (0..1_000).map(|_| seq.next_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn ids_carry_prefix_and_numeric_suffix() {
        let id = TRANSACTION_IDS.next_id();
        let suffix = id.strip_prefix("tx-").expect("prefix");
        assert!(suffix.parse::<u64>().is_ok());
    }

    #[test]
    fn values_never_go_backwards() {
        let seq = IdSequence::new("charity");
        let mut prev = seq.next_value();
        for _ in 0..100 {
            let next = seq.next_value();
            assert!(next > prev);
            prev = next;
        }
    }
}
