use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use snafu::ensure;

use crate::error::{CancelledSnafu, TreeError};

/// Cancellation signal threaded through loads, walks and their callbacks.
///
/// Clones share the same flag, so a caller can keep one handle and pass
/// another into a long bounded load. The tree itself never polls the flag;
/// retrieval functions and visitors decide when to honour it.
#[derive(Debug, Clone, Default)]
pub struct CancelContext {
    cancelled: Arc<AtomicBool>,
}

impl CancelContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns [`TreeError::CancelledError`] once [`cancel`](Self::cancel) was called.
    pub fn check(&self) -> Result<(), TreeError> {
        ensure!(!self.is_cancelled(), CancelledSnafu);
        Ok(())
    }
}
