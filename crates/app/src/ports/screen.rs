//! Screen port: captures the display as an encoded image.

use std::future::Future;

use cadence_domain::error::DeviceError;

/// Captures the current screen contents as PNG bytes.
pub trait ScreenCapturer: Send + Sync + 'static {
    fn capture(&self) -> impl Future<Output = Result<Vec<u8>, DeviceError>> + Send;
}

impl<T: ScreenCapturer> ScreenCapturer for std::sync::Arc<T> {
    fn capture(&self) -> impl Future<Output = Result<Vec<u8>, DeviceError>> + Send {
        (**self).capture()
    }
}
