//! Timer backed by the tokio clock.

use std::future::Future;
use std::time::Duration;

use crate::ports::Timer;

/// [`Timer`] built on [`tokio::time::sleep`].
///
/// Under a paused tokio clock (`start_paused = true`) sleeps complete as soon
/// as the runtime is idle, which lets tests simulate intervals.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn should_advance_paused_clock_by_requested_duration() {
        let start = tokio::time::Instant::now();
        TokioTimer.sleep(Duration::from_millis(250)).await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
