//! Timer port: the deferred-callback primitive used to re-arm iterations.

use std::future::Future;
use std::time::Duration;

/// Source of non-blocking delays.
///
/// The scheduler never sleeps on its own execution context: it spawns a
/// task that awaits [`sleep`](Self::sleep) and then posts the next iteration.
pub trait Timer: Send + Sync + 'static {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}
