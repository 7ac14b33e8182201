//! `gesture` steps: click, double click and long click.

use cadence_domain::gesture::{GestureKind, GestureRequest};
use cadence_domain::step::{StepFault, StepKind, StepOutput};

use super::{StepVariant, unsupported_subtype};
use crate::ports::GestureExecutor;

const SUBTYPES: &[&str] = &["click", "doubleClick", "longClick"];

pub struct GestureStep<G> {
    executor: G,
}

impl<G: GestureExecutor> GestureStep<G> {
    pub fn new(executor: G) -> Self {
        Self { executor }
    }
}

impl<G: GestureExecutor> StepVariant for GestureStep<G> {
    fn supported_subtypes(&self) -> &'static [&'static str] {
        SUBTYPES
    }

    async fn run(
        &self,
        subtype: &str,
        payload: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<StepOutput, StepFault> {
        let kind: GestureKind = subtype
            .parse()
            .map_err(|_| unsupported_subtype(StepKind::Gesture, subtype))?;
        let gesture = GestureRequest::from_payload(payload)?.into_gesture(kind)?;
        tracing::debug!(kind = %gesture.kind, gesture_target = ?gesture.target, "performing gesture");
        self.executor.perform(&gesture).await?;
        Ok(StepOutput::Empty)
    }
}
