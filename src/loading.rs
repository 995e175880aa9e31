use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Page-wide "busy" indicator shown as the loading overlay. Visible while at
/// least one guard is alive.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    holders: Arc<Mutex<usize>>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        *self.lock() > 0
    }

    /// Shows the indicator until the returned guard is dropped.
    pub fn acquire(&self) -> LoadingGuard {
        *self.lock() += 1;
        LoadingGuard {
            indicator: self.clone(),
        }
    }

    fn release(&self) {
        let mut holders = self.lock();
        *holders = holders.saturating_sub(1);
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.holders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[must_use = "the guard releases its hold as soon as it is dropped"]
pub struct LoadingGuard {
    indicator: LoadingIndicator,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.indicator.release();
    }
}
