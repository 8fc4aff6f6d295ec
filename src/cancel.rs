//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// External cancellation signal, polled by the feedback cycle at the top of
/// every round and again after a long-running request returns. Cancellation
/// is cooperative; nothing is forcibly interrupted.
pub trait CancellationSignal: Send + Sync {
    fn is_canceled(&self) -> bool;
}

impl CancellationSignal for Arc<AtomicBool> {
    fn is_canceled(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

/// Signal that never fires; for hosts without a cancel affordance.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverCanceled;

impl CancellationSignal for NeverCanceled {
    fn is_canceled(&self) -> bool {
        false
    }
}
