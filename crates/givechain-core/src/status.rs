use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::chain::Operation;
use crate::error::{ChainError, StoreError};

/// Loading flag and last failure of a store.
///
/// Each operation runs `idle -> loading -> {success | failure}`. The flag is a
/// single boolean shared by every call in flight, so with overlapping calls the
/// first one to finish clears it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    pub is_loading: bool,
    pub error: Option<StoreError>,
}

impl Status {
    pub fn begin(&mut self) {
        self.is_loading = true;
    }

    pub fn succeed(&mut self) {
        self.is_loading = false;
        self.error = None;
    }

    pub fn fail(&mut self, error: StoreError) {
        self.is_loading = false;
        self.error = Some(error);
    }
}

/// Enter the loading state for `op`.
pub(crate) fn begin<S: AsMut<Status>>(state: &watch::Sender<S>, op: Operation) {
    debug!(operation = %op, "started");
    state.send_modify(|s| s.as_mut().begin());
}

/// Record a failed `op` and return the kind that was stored.
pub(crate) fn fail<S: AsMut<Status>>(
    state: &watch::Sender<S>,
    op: Operation,
    cause: ChainError,
) -> StoreError {
    let kind = op.failure();
    warn!(operation = %op, error = %cause, "{kind}");
    state.send_modify(|s| s.as_mut().fail(kind));
    kind
}
