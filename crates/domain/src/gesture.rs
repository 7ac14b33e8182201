//! Gesture requests decoded from `gesture` step payloads.
//!
//! A gesture is addressed in one of three ways, checked in this order:
//!
//! 1. `origin`: a reference to an element the client already knows
//! 2. `locator`: a fresh lookup (`strategy` + `selector`, optionally scoped
//!    to a `context` element)
//! 3. `offset` alone: absolute screen coordinates
//!
//! When an element is resolved, `offset` (if any) is relative to the
//! element's top-left corner.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::step::StepFault;

/// The gesture primitives a step can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Click,
    DoubleClick,
    LongClick,
}

impl GestureKind {
    pub const ALL: [Self; 3] = [Self::Click, Self::DoubleClick, Self::LongClick];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "doubleClick",
            Self::LongClick => "longClick",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Reference to an element, in either the legacy or the W3C shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "ELEMENT", default, skip_serializing_if = "Option::is_none")]
    legacy: Option<String>,
    #[serde(
        rename = "element-6066-11e4-a52e-4f735466cecf",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    w3c: Option<String>,
}

impl ElementRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            legacy: None,
            w3c: Some(id.into()),
        }
    }

    /// The element id, preferring the W3C key. Blank ids count as absent.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.w3c
            .as_deref()
            .or(self.legacy.as_deref())
            .filter(|id| !id.trim().is_empty())
    }
}

/// Element lookup criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub strategy: String,
    pub selector: String,
    /// Id of an element to scope the lookup to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.strategy, self.selector)?;
        if let Some(context) = self.context.as_deref().filter(|c| !c.trim().is_empty()) {
            write!(f, " within {context}")?;
        }
        Ok(())
    }
}

/// A point, either absolute or relative to an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Raw gesture payload as sent by the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureRequest {
    #[serde(default)]
    pub origin: Option<ElementRef>,
    #[serde(default)]
    pub locator: Option<Locator>,
    #[serde(default)]
    pub offset: Option<Offset>,
    /// Long-click hold time in milliseconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// What a gesture is aimed at.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureTarget {
    Element { id: String, offset: Option<Offset> },
    Located { locator: Locator, offset: Option<Offset> },
    Point(Offset),
}

/// A validated gesture, ready for the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub kind: GestureKind,
    pub target: GestureTarget,
    /// Only ever set for [`GestureKind::LongClick`].
    pub duration: Option<Duration>,
}

impl GestureRequest {
    /// Decode a step payload. Unknown keys (such as `subtype`) are ignored.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidPayload` fault when a known key has the wrong shape.
    pub fn from_payload(
        payload: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, StepFault> {
        serde_json::from_value(serde_json::Value::Object(payload.clone()))
            .map_err(|err| StepFault::invalid_payload(format!("malformed gesture payload: {err}")))
    }

    /// Resolve the target and validate the request for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidPayload` fault when neither an element nor offset
    /// coordinates are given, or when a long-click duration is negative or
    /// does not fit a `Duration`.
    pub fn into_gesture(self, kind: GestureKind) -> Result<Gesture, StepFault> {
        let element_id = self.origin.as_ref().and_then(ElementRef::id).map(str::to_string);
        let target = match (element_id, self.locator, self.offset) {
            (Some(id), _, offset) => GestureTarget::Element { id, offset },
            (None, Some(locator), offset) => GestureTarget::Located { locator, offset },
            (None, None, Some(offset)) => GestureTarget::Point(offset),
            (None, None, None) => {
                return Err(StepFault::invalid_payload(format!(
                    "{kind} offset coordinates must be provided if element is not set"
                )));
            }
        };
        let duration = match (kind, self.duration) {
            (GestureKind::LongClick, Some(ms)) if ms.is_finite() && ms >= 0.0 => Some(
                Duration::try_from_secs_f64(ms / 1000.0).map_err(|_| {
                    StepFault::invalid_payload(format!("long click duration is too large, got {ms}"))
                })?,
            ),
            (GestureKind::LongClick, Some(ms)) => {
                return Err(StepFault::invalid_payload(format!(
                    "long click duration must be a non-negative number of milliseconds, got {ms}"
                )));
            }
            _ => None,
        };
        Ok(Gesture {
            kind,
            target,
            duration,
        })
    }
}
