//! # cadence-app
//!
//! Application layer: port definitions, step variants, the action registry
//! and the scheduler that drives it.
//!
//! ## Responsibilities
//! - Define **port traits** for the device collaborators and the clock:
//!   - `GestureExecutor` performs clicks, double clicks and long clicks
//!   - `CacheRefresher` and `HierarchyDumper` produce the UI tree
//!   - `ScreenCapturer` takes PNG screenshots
//!   - `Timer` waits between iterations
//! - Dispatch a step to its variant and normalize the outcome
//! - Keep the registry of actions with their bounded histories
//! - Run every iteration on a single task, one after the other
//!
//! ## Dependency rule
//! Depends on `cadence-domain` only (plus `tokio` for the scheduling task).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod registry;
pub mod scheduler;
pub mod steps;
pub mod timer;

pub use registry::{IterationOutcome, Registry, RunHandle};
pub use scheduler::Scheduler;
pub use steps::{DeviceSteps, StepExecutor};
pub use timer::TokioTimer;
