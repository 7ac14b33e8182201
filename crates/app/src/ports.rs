//! Port definitions: traits that adapters implement.
//!
//! The engine drives four device collaborators (gestures, cache refresh,
//! hierarchy dump, screen capture) and one timer. They are defined here so
//! that both the engine and the adapters depend on them without creating
//! circular dependencies.

pub mod gesture;
pub mod hierarchy;
pub mod screen;
pub mod timer;

pub use gesture::GestureExecutor;
pub use hierarchy::{CacheRefresher, HierarchyDumper};
pub use screen::ScreenCapturer;
pub use timer::Timer;
