use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

pub const DEFAULT_COPY_FEEDBACK: Duration = Duration::from_millis(2500);

// Every copy arms its own timer and timers are never cancelled: the first
// timer to fire clears the flag, even if a newer copy happened since.
#[derive(Debug, Clone)]
pub struct CopyIndicator {
    active: Arc<Mutex<bool>>,
    feedback: Duration,
}

impl CopyIndicator {
    pub fn new(feedback: Duration) -> Self {
        Self {
            active: Arc::new(Mutex::new(false)),
            feedback,
        }
    }

    pub fn feedback(&self) -> Duration {
        self.feedback
    }

    pub fn is_active(&self) -> bool {
        *self.active.lock()
    }

    /// Must be called from inside a tokio runtime.
    pub fn mark_copied(&self) {
        *self.active.lock() = true;

        let active = Arc::clone(&self.active);
        let feedback = self.feedback;
        tokio::spawn(async move {
            tokio::time::sleep(feedback).await;
            *active.lock() = false;
            debug!("Copy indicator cleared");
        });
    }

    pub fn clear(&self) {
        *self.active.lock() = false;
    }
}

impl Default for CopyIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_COPY_FEEDBACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn clears_itself_after_the_feedback_window() {
        let indicator = CopyIndicator::default();
        assert!(!indicator.is_active());

        indicator.mark_copied();
        assert!(indicator.is_active());

        sleep(Duration::from_millis(2400)).await;
        assert!(indicator.is_active());

        sleep(Duration::from_millis(200)).await;
        assert!(!indicator.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn earlier_timer_clears_a_later_copy() {
        let indicator = CopyIndicator::new(Duration::from_millis(1000));
        indicator.mark_copied();
        sleep(Duration::from_millis(800)).await;
        indicator.mark_copied();

        sleep(Duration::from_millis(400)).await;
        assert!(!indicator.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn copy_after_expiry_is_active_again() {
        let indicator = CopyIndicator::new(Duration::from_millis(1000));
        indicator.mark_copied();
        sleep(Duration::from_millis(1100)).await;
        assert!(!indicator.is_active());

        indicator.mark_copied();
        assert!(indicator.is_active());
        sleep(Duration::from_millis(1100)).await;
        assert!(!indicator.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_resets_immediately() {
        let indicator = CopyIndicator::new(Duration::from_millis(1000));
        indicator.mark_copied();
        indicator.clear();
        assert!(!indicator.is_active());

        sleep(Duration::from_millis(1500)).await;
        assert!(!indicator.is_active());
    }
}
