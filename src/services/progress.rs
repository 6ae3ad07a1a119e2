//! Progress reporting and cooperative cancellation
//!
//! Both cross the boundary between the thread driving a batch and whoever
//! is watching it, so both are `Send + Sync`.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Callback receiving `(progress in [0, 1], message)`
pub type ProgressCallback = Arc<dyn Fn(f64, &str) + Send + Sync>;

const PROCESSING: u8 = 0b01;
const CANCELLED: u8 = 0b10;

/// Shared cancellation flag
///
/// Cloning yields a handle to the same flag, so a batch running on one
/// thread can be cancelled from another. The flag lives in the same word as
/// the batch slot: claiming the slot clears it, and a request made after the
/// claim always reaches the batch.
#[derive(Clone, Default)]
pub struct CancelHandle {
    state: Arc<AtomicU8>,
}

impl CancelHandle {
    /// Create a handle with the flag cleared
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.state.fetch_or(CANCELLED, Ordering::SeqCst);
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::SeqCst) & CANCELLED != 0
    }

    /// Check if a batch holds the slot
    pub fn is_processing(&self) -> bool {
        self.state.load(Ordering::SeqCst) & PROCESSING != 0
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("processing", &self.is_processing())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Claim on the single batch slot, released on drop
pub(crate) struct BatchGuard<'a> {
    state: &'a AtomicU8,
}

impl<'a> BatchGuard<'a> {
    /// Claim the slot and clear any earlier cancellation in one step, or
    /// `None` if a batch already holds it
    pub(crate) fn claim(handle: &'a CancelHandle) -> Option<Self> {
        handle
            .state
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |state| {
                (state & PROCESSING == 0).then_some(PROCESSING)
            })
            .ok()
            .map(|_| Self {
                state: &handle.state,
            })
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.state.fetch_and(!PROCESSING, Ordering::SeqCst);
    }
}

/// Render a progress line as printed by the CLI, e.g. `[ 50%] Scanned a.txt`
pub fn format_progress(progress: f64, message: &str) -> String {
    let percent = (progress.clamp(0.0, 1.0) * 100.0).round() as u32;
    format!("[{:>3}%] {}", percent, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_handle_shared() {
        let handle = CancelHandle::new();
        let other = handle.clone();
        assert!(!handle.is_cancelled());

        other.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_guard_is_exclusive() {
        let handle = CancelHandle::new();
        let guard = BatchGuard::claim(&handle).unwrap();
        assert!(handle.is_processing());
        assert!(BatchGuard::claim(&handle).is_none());

        drop(guard);
        assert!(!handle.is_processing());
        assert!(BatchGuard::claim(&handle).is_some());
    }

    #[test]
    fn test_claim_clears_earlier_cancel() {
        let handle = CancelHandle::new();
        handle.cancel();

        let _guard = BatchGuard::claim(&handle).unwrap();
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn test_cancel_after_claim_is_kept() {
        let handle = CancelHandle::new();
        let _guard = BatchGuard::claim(&handle).unwrap();

        handle.clone().cancel();
        assert!(handle.is_cancelled());
        assert!(handle.is_processing());
    }

    #[test]
    fn test_failed_claim_keeps_running_batch_cancel() {
        let handle = CancelHandle::new();
        let _guard = BatchGuard::claim(&handle).unwrap();
        handle.cancel();

        assert!(BatchGuard::claim(&handle).is_none());
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_format_progress() {
        assert_eq!(format_progress(0.5, "half"), "[ 50%] half");
        assert_eq!(format_progress(1.0, "done"), "[100%] done");
        assert_eq!(format_progress(1.0 / 3.0, "x"), "[ 33%] x");
    }
}
