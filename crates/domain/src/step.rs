//! Step kinds and step results.
//!
//! Every step of an iteration produces exactly one [`StepResult`], whether
//! it passed or not. Failures are data: they are captured as a [`StepFault`]
//! and never abort the iteration.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use serde::{Deserialize, Serialize, Serializer};

use crate::action::{SUBTYPE_KEY, StepDefinition};
use crate::error::DeviceError;
use crate::time::Timestamp;

/// The closed set of step types the engine can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Gesture,
    Source,
    Screenshot,
}

impl StepKind {
    pub const ALL: [Self; 3] = [Self::Gesture, Self::Source, Self::Screenshot];

    /// Wire name of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gesture => "gesture",
            Self::Source => "source",
            Self::Screenshot => "screenshot",
        }
    }

    fn supported() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Successful outcome of a step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StepOutput {
    Text(String),
    Binary(Vec<u8>),
    #[default]
    Empty,
}

/// Serialized as a plain string, a base64 string for binaries, or `null`.
impl Serialize for StepOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Binary(bytes) => {
                serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            Self::Empty => serializer.serialize_none(),
        }
    }
}

/// Category of a step failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    UnknownStepType,
    UnknownStepSubtype,
    InvalidPayload,
    Device,
}

/// Why a step did not pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct StepFault {
    pub kind: FaultKind,
    pub message: String,
}

impl StepFault {
    #[must_use]
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The step's `type` is not one of [`StepKind::ALL`].
    #[must_use]
    pub fn unknown_type(step: &StepDefinition) -> Self {
        Self::new(
            FaultKind::UnknownStepType,
            format!(
                "the value '{}' of 'type' field in step '{}' is unknown, only the following kinds are supported: [{}]",
                step.step_type,
                step.name,
                StepKind::supported()
            ),
        )
    }

    /// The payload's subtype is missing, not a string, or not supported.
    #[must_use]
    pub fn unknown_subtype(step: &StepDefinition, supported: &[&str]) -> Self {
        let actual = step
            .payload
            .get(SUBTYPE_KEY)
            .map_or_else(|| "null".to_string(), |value| match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        Self::new(
            FaultKind::UnknownStepSubtype,
            format!(
                "the value '{actual}' of '{SUBTYPE_KEY}' field in step '{}' (type '{}') is unknown, only the following subtypes are supported: [{}]",
                step.name,
                step.step_type,
                supported.join(", ")
            ),
        )
    }

    #[must_use]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(FaultKind::InvalidPayload, message)
    }
}

impl From<DeviceError> for StepFault {
    fn from(err: DeviceError) -> Self {
        Self::new(FaultKind::Device, err.to_string())
    }
}

/// Outcome of running one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: String,
    pub timestamp: Timestamp,
    pub passed: bool,
    pub result: StepOutput,
    /// Present iff `passed == false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<StepFault>,
}

impl StepResult {
    #[must_use]
    pub fn passed(step: &StepDefinition, timestamp: Timestamp, output: StepOutput) -> Self {
        Self {
            name: step.name.clone(),
            step_type: step.step_type.clone(),
            timestamp,
            passed: true,
            result: output,
            fault: None,
        }
    }

    #[must_use]
    pub fn failed(step: &StepDefinition, timestamp: Timestamp, fault: StepFault) -> Self {
        Self {
            name: step.name.clone(),
            step_type: step.step_type.clone(),
            timestamp,
            passed: false,
            result: StepOutput::Empty,
            fault: Some(fault),
        }
    }

    /// Build a result from the outcome of a step variant.
    #[must_use]
    pub fn from_outcome(
        step: &StepDefinition,
        timestamp: Timestamp,
        outcome: Result<StepOutput, StepFault>,
    ) -> Self {
        match outcome {
            Ok(output) => Self::passed(step, timestamp, output),
            Err(fault) => Self::failed(step, timestamp, fault),
        }
    }
}
