//! Gesture port: performs click, double-click and long-click primitives.

use std::future::Future;

use cadence_domain::error::DeviceError;
use cadence_domain::gesture::Gesture;

/// Executes validated [`Gesture`]s on the device.
pub trait GestureExecutor: Send + Sync + 'static {
    /// Perform the gesture. Element lookups happen on the device side and
    /// report [`DeviceError::ElementNotFound`] when nothing matches.
    fn perform(&self, gesture: &Gesture) -> impl Future<Output = Result<(), DeviceError>> + Send;
}

impl<T: GestureExecutor> GestureExecutor for std::sync::Arc<T> {
    fn perform(&self, gesture: &Gesture) -> impl Future<Output = Result<(), DeviceError>> + Send {
        (**self).perform(gesture)
    }
}
