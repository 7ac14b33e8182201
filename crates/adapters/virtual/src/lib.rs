//! # cadence-adapter-virtual
//!
//! Simulated device implementing every collaborator port of the scheduler.
//! Useful for demos and end-to-end tests without real hardware.
//!
//! ## Behaviour
//!
//! | Port | Behaviour |
//! |------|-----------|
//! | `GestureExecutor` | resolves the target on a fixed layout and records the gesture |
//! | `CacheRefresher` | counts refreshes |
//! | `HierarchyDumper` | serializes the fixed layout as XML |
//! | `ScreenCapturer` | returns a 1x1 PNG |
//!
//! ## Dependency rule
//!
//! Depends on `cadence-app` (port traits) and `cadence-domain` only.

mod elements;

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use cadence_app::ports::{CacheRefresher, GestureExecutor, HierarchyDumper, ScreenCapturer};
use cadence_domain::error::DeviceError;
use cadence_domain::gesture::{Gesture, GestureKind, GestureTarget, Offset};

pub use elements::{Bounds, VirtualElement};

/// Package reported for every node of the virtual hierarchy.
pub(crate) const PACKAGE: &str = "io.cadence.virtual";

/// Smallest valid PNG: one transparent pixel.
pub const SCREENSHOT_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// A gesture as it landed on the virtual screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformedGesture {
    pub kind: GestureKind,
    /// Absolute screen point.
    pub point: Offset,
    pub duration: Option<Duration>,
}

/// Simulated device with a fixed layout.
pub struct VirtualDevice {
    width: u32,
    height: u32,
    elements: Vec<VirtualElement>,
    performed: Mutex<Vec<PerformedGesture>>,
    refreshes: AtomicU64,
}

impl Default for VirtualDevice {
    fn default() -> Self {
        Self::new(1080, 1920)
    }
}

impl VirtualDevice {
    /// Create a device with a screen of `width` x `height` pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: elements::default_layout(width, height),
            performed: Mutex::new(Vec::new()),
            refreshes: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn elements(&self) -> &[VirtualElement] {
        &self.elements
    }

    /// Gestures performed so far, oldest first.
    #[must_use]
    pub fn performed(&self) -> Vec<PerformedGesture> {
        self.performed
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |g| g.clone())
    }

    /// How many times the accessibility cache was refreshed.
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    fn find_by_id(&self, id: &str) -> Result<&VirtualElement, DeviceError> {
        self.elements
            .iter()
            .find(|element| element.id == id)
            .ok_or_else(|| DeviceError::ElementNotFound(format!("element id '{id}'")))
    }

    /// Absolute screen point the gesture lands on.
    fn resolve(&self, target: &GestureTarget) -> Result<Offset, DeviceError> {
        let point = match target {
            GestureTarget::Element { id, offset } => {
                let bounds = self.find_by_id(id)?.bounds;
                offset.map_or_else(|| bounds.center(), |offset| bounds.relative(offset))
            }
            GestureTarget::Located { locator, offset } => {
                if let Some(context) = &locator.context {
                    self.find_by_id(context)?;
                }
                let bounds = self
                    .elements
                    .iter()
                    .find(|element| element.matches(locator))
                    .ok_or_else(|| DeviceError::ElementNotFound(locator.to_string()))?
                    .bounds;
                offset.map_or_else(|| bounds.center(), |offset| bounds.relative(offset))
            }
            GestureTarget::Point(offset) => *offset,
        };
        self.check_on_screen(point)?;
        Ok(point)
    }

    fn check_on_screen(&self, point: Offset) -> Result<(), DeviceError> {
        let inside = (0.0..=f64::from(self.width)).contains(&point.x)
            && (0.0..=f64::from(self.height)).contains(&point.y);
        if inside {
            Ok(())
        } else {
            Err(DeviceError::InvalidArgument(format!(
                "point ({}, {}) is outside of the {}x{} screen",
                point.x, point.y, self.width, self.height
            )))
        }
    }
}

impl GestureExecutor for VirtualDevice {
    async fn perform(&self, gesture: &Gesture) -> Result<(), DeviceError> {
        let point = self.resolve(&gesture.target)?;
        tracing::debug!(kind = %gesture.kind, x = point.x, y = point.y, "virtual gesture");
        self.performed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PerformedGesture {
                kind: gesture.kind,
                point,
                duration: gesture.duration,
            });
        Ok(())
    }
}

impl CacheRefresher for VirtualDevice {
    async fn refresh(&self) -> Result<(), DeviceError> {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl HierarchyDumper for VirtualDevice {
    async fn dump(&self, attributes: &[&str]) -> Result<String, DeviceError> {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#);
        let _ = write!(
            xml,
            r#"<hierarchy index="0" class="hierarchy" rotation="0" width="{}" height="{}">"#,
            self.width, self.height
        );
        for (index, element) in self.elements.iter().enumerate() {
            element.write_xml(&mut xml, index, attributes);
        }
        xml.push_str("</hierarchy>");
        Ok(xml)
    }
}

impl ScreenCapturer for VirtualDevice {
    async fn capture(&self) -> Result<Vec<u8>, DeviceError> {
        Ok(SCREENSHOT_PNG.to_vec())
    }
}
