use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative stop flag for a running search.
///
/// Clones share the flag, so one clone can be handed to another thread and cancelled from
/// there. The search checks it once per iteration.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    stop_flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}
