//! Action: a named, repeatable sequence of steps plus its repeat policy.
//!
//! An [`ActionDefinition`] is immutable once registered. It carries the
//! ordered [`StepDefinition`]s to run on each iteration and the knobs that
//! decide how often to run them and when to stop.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, ValidationError};

/// Payload key holding a step's subtype discriminator.
pub const SUBTYPE_KEY: &str = "subtype";

pub const DEFAULT_TIMES: i64 = 1;
pub const DEFAULT_INTERVAL_MS: i64 = 1000;
pub const DEFAULT_MAX_HISTORY_ITEMS: i64 = 20;
/// Any value `<= 0` disables the pass/fail limits.
pub const DISABLED_LIMIT: i64 = -1;

/// One unit of work inside an action.
///
/// `step_type` stays a raw string so that unknown types survive decoding and
/// are reported as failing step results at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Free-form label; not required to be unique.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(default)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl StepDefinition {
    /// Create a step. Non-object payloads are replaced by an empty object.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        step_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        let payload = match payload {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            name: name.into(),
            step_type: step_type.into(),
            payload,
        }
    }

    /// The subtype discriminator, if present and a string.
    #[must_use]
    pub fn subtype(&self) -> Option<&str> {
        self.payload
            .get(SUBTYPE_KEY)
            .and_then(serde_json::Value::as_str)
    }
}

/// Why an action stopped rescheduling itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    MaxPassReached,
    MaxFailReached,
    RepeatsExhausted,
}

/// Lifecycle state of a registered action.
///
/// Transitions: `Scheduled → Completed`. There is no way back short of
/// removing the action and registering it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Eligible to run again.
    Scheduled,
    /// Stopped rescheduling; history is still readable.
    Completed,
}

/// A registered action: steps plus repeat / interval / termination policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub name: String,
    pub steps: Vec<StepDefinition>,
    /// How many iterations to run in total.
    #[serde(default = "default_times")]
    pub times: i64,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: i64,
    #[serde(default = "default_max_history_items")]
    pub max_history_items: i64,
    #[serde(default = "disabled_limit")]
    pub max_pass: i64,
    #[serde(default = "disabled_limit")]
    pub max_fail: i64,
}

fn default_times() -> i64 {
    DEFAULT_TIMES
}

fn default_interval_ms() -> i64 {
    DEFAULT_INTERVAL_MS
}

fn default_max_history_items() -> i64 {
    DEFAULT_MAX_HISTORY_ITEMS
}

fn disabled_limit() -> i64 {
    DISABLED_LIMIT
}

/// `true` when `limit` is enabled (`> 0`) and `count` has reached it.
fn limit_reached(count: u64, limit: i64) -> bool {
    u64::try_from(limit).is_ok_and(|limit| limit > 0 && count >= limit)
}

impl ActionDefinition {
    /// Create a builder for constructing an [`ActionDefinition`].
    #[must_use]
    pub fn builder() -> ActionDefinitionBuilder {
        ActionDefinitionBuilder::default()
    }

    /// Check the invariants that do not depend on other registrations.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when:
    /// - `name` is blank ([`ValidationError::BlankName`])
    /// - `interval_ms` is negative ([`ValidationError::NegativeInterval`])
    /// - `steps` is empty ([`ValidationError::NoSteps`])
    /// - `max_history_items < 1` ([`ValidationError::HistoryTooSmall`])
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if self.interval_ms < 0 {
            return Err(ValidationError::NegativeInterval(self.interval_ms));
        }
        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }
        if self.max_history_items < 1 {
            return Err(ValidationError::HistoryTooSmall(self.max_history_items));
        }
        Ok(())
    }

    /// Delay between the end of one iteration and the start of the next.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.interval_ms).unwrap_or(0))
    }

    /// Number of execution records kept in history.
    #[must_use]
    pub fn history_capacity(&self) -> usize {
        usize::try_from(self.max_history_items).map_or(1, |n| n.max(1))
    }

    /// Decide whether the action must stop after the given counters.
    ///
    /// Predicates are checked in priority order: pass limit, fail limit,
    /// then the repeat target.
    #[must_use]
    pub fn termination(&self, repeats: u64, pass_count: u64, fail_count: u64) -> Option<Termination> {
        if limit_reached(pass_count, self.max_pass) {
            return Some(Termination::MaxPassReached);
        }
        if limit_reached(fail_count, self.max_fail) {
            return Some(Termination::MaxFailReached);
        }
        if u64::try_from(self.times).map_or(true, |times| repeats >= times) {
            return Some(Termination::RepeatsExhausted);
        }
        None
    }
}

/// Step-by-step builder for [`ActionDefinition`].
#[derive(Debug, Default)]
pub struct ActionDefinitionBuilder {
    name: Option<String>,
    steps: Vec<StepDefinition>,
    times: Option<i64>,
    interval_ms: Option<i64>,
    max_history_items: Option<i64>,
    max_pass: Option<i64>,
    max_fail: Option<i64>,
}

impl ActionDefinitionBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn times(mut self, times: i64) -> Self {
        self.times = Some(times);
        self
    }

    #[must_use]
    pub fn interval_ms(mut self, interval_ms: i64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    #[must_use]
    pub fn max_history_items(mut self, max_history_items: i64) -> Self {
        self.max_history_items = Some(max_history_items);
        self
    }

    #[must_use]
    pub fn max_pass(mut self, max_pass: i64) -> Self {
        self.max_pass = Some(max_pass);
        self
    }

    #[must_use]
    pub fn max_fail(mut self, max_fail: i64) -> Self {
        self.max_fail = Some(max_fail);
        self
    }

    /// Consume the builder, validate, and return an [`ActionDefinition`].
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Validation`] if any invariant checked by
    /// [`ActionDefinition::validate`] fails.
    pub fn build(self) -> Result<ActionDefinition, CadenceError> {
        let definition = ActionDefinition {
            name: self.name.unwrap_or_default(),
            steps: self.steps,
            times: self.times.unwrap_or(DEFAULT_TIMES),
            interval_ms: self.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS),
            max_history_items: self.max_history_items.unwrap_or(DEFAULT_MAX_HISTORY_ITEMS),
            max_pass: self.max_pass.unwrap_or(DISABLED_LIMIT),
            max_fail: self.max_fail.unwrap_or(DISABLED_LIMIT),
        };
        definition.validate()?;
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screenshot_step() -> StepDefinition {
        StepDefinition::new("shot", "screenshot", serde_json::json!({"subtype": "png"}))
    }

    fn definition(times: i64, max_pass: i64, max_fail: i64) -> ActionDefinition {
        ActionDefinition::builder()
            .name("ping")
            .step(screenshot_step())
            .times(times)
            .max_pass(max_pass)
            .max_fail(max_fail)
            .build()
            .unwrap()
    }

    #[test]
    fn should_apply_defaults_when_building() {
        let def = ActionDefinition::builder()
            .name("ping")
            .step(screenshot_step())
            .build()
            .unwrap();
        assert_eq!(def.times, 1);
        assert_eq!(def.interval_ms, 1000);
        assert_eq!(def.max_history_items, 20);
        assert_eq!(def.max_pass, -1);
        assert_eq!(def.max_fail, -1);
    }

    #[test]
    fn should_reject_blank_name() {
        let result = ActionDefinition::builder()
            .name("   ")
            .step(screenshot_step())
            .build();
        assert!(matches!(
            result,
            Err(CadenceError::Validation(ValidationError::BlankName))
        ));
    }

    #[test]
    fn should_reject_negative_interval() {
        let result = ActionDefinition::builder()
            .name("ping")
            .step(screenshot_step())
            .interval_ms(-1)
            .build();
        assert!(matches!(
            result,
            Err(CadenceError::Validation(ValidationError::NegativeInterval(-1)))
        ));
    }

    #[test]
    fn should_reject_empty_steps() {
        let result = ActionDefinition::builder().name("ping").build();
        assert!(matches!(
            result,
            Err(CadenceError::Validation(ValidationError::NoSteps))
        ));
    }

    #[test]
    fn should_reject_history_smaller_than_one() {
        let result = ActionDefinition::builder()
            .name("ping")
            .step(screenshot_step())
            .max_history_items(0)
            .build();
        assert!(matches!(
            result,
            Err(CadenceError::Validation(ValidationError::HistoryTooSmall(0)))
        ));
    }

    #[test]
    fn should_accept_zero_interval() {
        let def = ActionDefinition::builder()
            .name("ping")
            .step(screenshot_step())
            .interval_ms(0)
            .build()
            .unwrap();
        assert_eq!(def.interval(), Duration::ZERO);
    }

    #[test]
    fn should_decode_wire_request_with_defaults() {
        let json = serde_json::json!({
            "name": "ping",
            "steps": [{"type": "screenshot", "payload": {"subtype": "png"}}],
            "intervalMs": 50,
        });
        let def: ActionDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(def.interval_ms, 50);
        assert_eq!(def.times, 1);
        assert_eq!(def.max_history_items, 20);
        assert_eq!(def.steps[0].name, "");
        assert_eq!(def.steps[0].subtype(), Some("png"));
    }

    #[test]
    fn should_report_missing_subtype_as_none() {
        let step = StepDefinition::new("tap", "gesture", serde_json::json!({"subtype": 42}));
        assert_eq!(step.subtype(), None);
        let step = StepDefinition::new("tap", "gesture", serde_json::json!("not an object"));
        assert!(step.payload.is_empty());
    }

    #[test]
    fn should_terminate_when_repeats_reach_times() {
        let def = definition(3, -1, -1);
        assert_eq!(def.termination(2, 2, 0), None);
        assert_eq!(def.termination(3, 3, 0), Some(Termination::RepeatsExhausted));
    }

    #[test]
    fn should_prefer_pass_limit_over_repeat_target() {
        let def = definition(1, 1, -1);
        assert_eq!(def.termination(1, 1, 0), Some(Termination::MaxPassReached));
    }

    #[test]
    fn should_check_fail_limit_before_repeat_target() {
        let def = definition(5, -1, 2);
        assert_eq!(def.termination(1, 0, 1), None);
        assert_eq!(def.termination(2, 0, 2), Some(Termination::MaxFailReached));
    }

    #[test]
    fn should_ignore_disabled_limits() {
        let def = definition(5, 0, -3);
        assert_eq!(def.termination(4, 2, 2), None);
    }

    #[test]
    fn should_stop_after_first_iteration_when_times_is_not_positive() {
        let def = definition(0, -1, -1);
        assert_eq!(def.termination(1, 1, 0), Some(Termination::RepeatsExhausted));
    }
}
