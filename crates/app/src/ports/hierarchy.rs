//! Hierarchy ports: accessibility cache refresh and UI tree serialization.

use std::future::Future;

use cadence_domain::error::DeviceError;

/// Refreshes the accessibility-tree cache so a following dump is current.
pub trait CacheRefresher: Send + Sync + 'static {
    fn refresh(&self) -> impl Future<Output = Result<(), DeviceError>> + Send;
}

/// Serializes the current UI hierarchy to text.
pub trait HierarchyDumper: Send + Sync + 'static {
    /// Dump the hierarchy, exposing only the attributes in `attributes`.
    fn dump(
        &self,
        attributes: &[&str],
    ) -> impl Future<Output = Result<String, DeviceError>> + Send;
}

impl<T: CacheRefresher> CacheRefresher for std::sync::Arc<T> {
    fn refresh(&self) -> impl Future<Output = Result<(), DeviceError>> + Send {
        (**self).refresh()
    }
}

impl<T: HierarchyDumper> HierarchyDumper for std::sync::Arc<T> {
    fn dump(
        &self,
        attributes: &[&str],
    ) -> impl Future<Output = Result<String, DeviceError>> + Send {
        (**self).dump(attributes)
    }
}
