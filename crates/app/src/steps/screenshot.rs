//! `screenshot` steps: capture the screen as PNG.

use cadence_domain::step::{StepFault, StepKind, StepOutput};

use super::{StepVariant, unsupported_subtype};
use crate::ports::ScreenCapturer;

const SUBTYPES: &[&str] = &["png"];

pub struct ScreenshotStep<S> {
    capturer: S,
}

impl<S: ScreenCapturer> ScreenshotStep<S> {
    pub fn new(capturer: S) -> Self {
        Self { capturer }
    }
}

impl<S: ScreenCapturer> StepVariant for ScreenshotStep<S> {
    fn supported_subtypes(&self) -> &'static [&'static str] {
        SUBTYPES
    }

    async fn run(
        &self,
        subtype: &str,
        _payload: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<StepOutput, StepFault> {
        match subtype {
            "png" => Ok(StepOutput::Binary(self.capturer.capture().await?)),
            other => Err(unsupported_subtype(StepKind::Screenshot, other)),
        }
    }
}
