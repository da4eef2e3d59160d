use crate::utils::error::{DebtClearError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set while a user-triggered request is in flight. A second action is
/// refused instead of queued; there is no deduplication beyond that.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    inner: Arc<AtomicBool>,
}

/// Clears the flag when dropped, whether the action succeeded or failed.
#[derive(Debug)]
pub struct BusyGuard {
    inner: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, action: &str) -> Result<BusyGuard> {
        if self
            .inner
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("⏳ Ignoring '{}' while another request is pending", action);
            return Err(DebtClearError::BusyError {
                action: action.to_string(),
            });
        }
        Ok(BusyGuard {
            inner: Arc::clone(&self.inner),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected_until_release() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire("optimize").unwrap();
        assert!(flag.is_busy());
        assert!(matches!(
            flag.try_acquire("optimize"),
            Err(DebtClearError::BusyError { .. })
        ));
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire("email").is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = BusyFlag::new();
        let other = flag.clone();
        let _guard = flag.try_acquire("pdf").unwrap();
        assert!(other.is_busy());
    }
}
