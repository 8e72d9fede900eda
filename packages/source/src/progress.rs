//! Progress reporting for the batch stages.
//!
//! The enrichment driver reports through [`ProgressCallback`] so it never
//! depends on a rendering backend. The binaries plug in `indicatif` bars
//! from `dogrun_cli_utils`; library callers and tests use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a long-running stage.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of units (records) to process.
    fn set_total(&self, total: u64);

    /// Advance by `delta` units.
    fn inc(&self, delta: u64);

    /// Replace the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Mark the stage as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
