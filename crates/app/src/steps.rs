//! Step variants and the dispatcher that runs a [`StepDefinition`].
//!
//! Each variant handles one [`StepKind`] and exposes the same contract:
//! the subtypes it understands and a `run(subtype, payload)` that either
//! returns a [`StepOutput`] or a [`StepFault`]. Dispatch is a `match` over
//! the closed [`StepKind`] enum; unknown types never reach a variant.

pub mod gesture;
pub mod screenshot;
pub mod source;

use std::future::Future;

use cadence_domain::action::StepDefinition;
use cadence_domain::step::{FaultKind, StepFault, StepKind, StepOutput, StepResult};
use cadence_domain::time;

use crate::ports::{CacheRefresher, GestureExecutor, HierarchyDumper, ScreenCapturer};

pub use gesture::GestureStep;
pub use screenshot::ScreenshotStep;
pub use source::SourceStep;

/// Runs one step and normalizes the outcome into a [`StepResult`].
///
/// Implementations must never fail: every fault becomes a failing result.
pub trait StepExecutor: Send + Sync + 'static {
    fn execute(&self, step: &StepDefinition) -> impl Future<Output = StepResult> + Send;
}

/// Common contract of the step variants.
pub trait StepVariant: Send + Sync {
    fn supported_subtypes(&self) -> &'static [&'static str];

    /// Run an operation. `subtype` is one of
    /// [`supported_subtypes`](Self::supported_subtypes).
    fn run(
        &self,
        subtype: &str,
        payload: &serde_json::Map<String, serde_json::Value>,
    ) -> impl Future<Output = Result<StepOutput, StepFault>> + Send;
}

/// Resolve the step's subtype against `variant` and run it.
async fn run_variant<V: StepVariant>(
    variant: &V,
    step: &StepDefinition,
) -> Result<StepOutput, StepFault> {
    let supported = variant.supported_subtypes();
    match step.subtype() {
        Some(subtype) if supported.contains(&subtype) => variant.run(subtype, &step.payload).await,
        _ => Err(StepFault::unknown_subtype(step, supported)),
    }
}

/// Fault returned by a variant asked for a subtype it does not handle.
fn unsupported_subtype(kind: StepKind, subtype: &str) -> StepFault {
    StepFault::new(
        FaultKind::UnknownStepSubtype,
        format!("'{subtype}' is not a supported {kind} subtype"),
    )
}

/// [`StepExecutor`] that drives the device collaborators.
pub struct DeviceSteps<G, R, D, S> {
    gesture: GestureStep<G>,
    source: SourceStep<R, D>,
    screenshot: ScreenshotStep<S>,
}

impl<G, R, D, S> DeviceSteps<G, R, D, S>
where
    G: GestureExecutor,
    R: CacheRefresher,
    D: HierarchyDumper,
    S: ScreenCapturer,
{
    /// Create an executor from the four device collaborators.
    pub fn new(gestures: G, refresher: R, dumper: D, capturer: S) -> Self {
        Self {
            gesture: GestureStep::new(gestures),
            source: SourceStep::new(refresher, dumper),
            screenshot: ScreenshotStep::new(capturer),
        }
    }

    async fn dispatch(&self, step: &StepDefinition) -> Result<StepOutput, StepFault> {
        let kind: StepKind = step
            .step_type
            .parse()
            .map_err(|_| StepFault::unknown_type(step))?;
        match kind {
            StepKind::Gesture => run_variant(&self.gesture, step).await,
            StepKind::Source => run_variant(&self.source, step).await,
            StepKind::Screenshot => run_variant(&self.screenshot, step).await,
        }
    }
}

impl<G, R, D, S> StepExecutor for DeviceSteps<G, R, D, S>
where
    G: GestureExecutor,
    R: CacheRefresher,
    D: HierarchyDumper,
    S: ScreenCapturer,
{
    async fn execute(&self, step: &StepDefinition) -> StepResult {
        let timestamp = time::now();
        let outcome = self.dispatch(step).await;
        StepResult::from_outcome(step, timestamp, outcome)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scriptable device collaborators shared by the app tests.

    use std::sync::Mutex;

    use cadence_domain::error::DeviceError;
    use cadence_domain::gesture::{Gesture, GestureTarget};

    use crate::ports::{CacheRefresher, GestureExecutor, HierarchyDumper, ScreenCapturer};

    /// Fake device: records gestures, fails any gesture aimed at element
    /// `"missing"`, dumps a fixed hierarchy, captures a fixed PNG header.
    #[derive(Default)]
    pub struct FakeDevice {
        pub gestures: Mutex<Vec<Gesture>>,
        pub refreshes: Mutex<usize>,
        pub dumped_with: Mutex<Vec<String>>,
        pub screen_broken: bool,
    }

    pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];

    impl GestureExecutor for FakeDevice {
        async fn perform(&self, gesture: &Gesture) -> Result<(), DeviceError> {
            if let GestureTarget::Element { id, .. } = &gesture.target
                && id == "missing"
            {
                return Err(DeviceError::ElementNotFound(format!("id '{id}'")));
            }
            self.gestures.lock().unwrap().push(gesture.clone());
            Ok(())
        }
    }

    impl CacheRefresher for FakeDevice {
        async fn refresh(&self) -> Result<(), DeviceError> {
            *self.refreshes.lock().unwrap() += 1;
            Ok(())
        }
    }

    impl HierarchyDumper for FakeDevice {
        async fn dump(&self, attributes: &[&str]) -> Result<String, DeviceError> {
            *self.dumped_with.lock().unwrap() = attributes.iter().map(ToString::to_string).collect();
            Ok("<hierarchy/>".to_string())
        }
    }

    impl ScreenCapturer for FakeDevice {
        async fn capture(&self) -> Result<Vec<u8>, DeviceError> {
            if self.screen_broken {
                return Err(DeviceError::Failed("display is off".to_string()));
            }
            Ok(PNG.to_vec())
        }
    }
}
