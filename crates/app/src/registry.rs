//! Registry of scheduled actions.
//!
//! The registry owns every definition, history and the `active` set. It is
//! not synchronized: exactly one task (see [`crate::scheduler`]) owns it and
//! runs iterations one after the other.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use cadence_domain::action::{ActionDefinition, ActionStatus, StepDefinition, Termination};
use cadence_domain::error::{NotFoundError, ValidationError};
use cadence_domain::history::{ExecutionRecord, RunHistory};
use cadence_domain::id::RegistrationId;
use cadence_domain::step::{FaultKind, StepFault, StepResult};
use cadence_domain::time;

use crate::steps::StepExecutor;

/// Longest step result rendered in debug logs.
const LOG_SUMMARY_LEN: usize = 200;

/// Identifies one registration of an action.
///
/// The token distinguishes a registration from a later one under the same
/// name, so an iteration armed for a removed action can never run the
/// replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHandle {
    pub name: String,
    pub registration: RegistrationId,
}

/// What the scheduler must do after [`Registry::run_iteration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// The action is gone or was replaced; nothing ran.
    Skipped,
    /// Run again after the given delay.
    Rearm(Duration),
    /// The action stopped; its history stays readable.
    Completed(Termination),
}

struct Entry {
    definition: Arc<ActionDefinition>,
    history: RunHistory,
    registration: RegistrationId,
}

pub struct Registry<E> {
    executor: Arc<E>,
    entries: HashMap<String, Entry>,
    active: HashSet<String>,
}

impl<E: StepExecutor> Registry<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self {
            executor,
            entries: HashMap::new(),
            active: HashSet::new(),
        }
    }

    /// Validate and store `definition` and mark it active.
    ///
    /// The caller is responsible for arming the first iteration with the
    /// returned handle.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the definition is invalid or an entry
    /// with the same name exists, whether still scheduled or completed.
    pub fn add(&mut self, definition: ActionDefinition) -> Result<RunHandle, ValidationError> {
        definition.validate()?;
        if self.entries.contains_key(&definition.name) {
            return Err(ValidationError::AlreadyScheduled(definition.name));
        }

        let handle = RunHandle {
            name: definition.name.clone(),
            registration: RegistrationId::new(),
        };
        self.active.insert(handle.name.clone());
        self.entries.insert(
            handle.name.clone(),
            Entry {
                definition: Arc::new(definition),
                history: RunHistory::new(),
                registration: handle.registration,
            },
        );
        Ok(handle)
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no action with that name is registered.
    pub fn history(&self, name: &str) -> Result<&RunHistory, NotFoundError> {
        self.entries
            .get(name)
            .map(|entry| &entry.history)
            .ok_or_else(|| NotFoundError::new(name))
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no action with that name is registered.
    pub fn status(&self, name: &str) -> Result<ActionStatus, NotFoundError> {
        if !self.entries.contains_key(name) {
            return Err(NotFoundError::new(name));
        }
        if self.active.contains(name) {
            Ok(ActionStatus::Scheduled)
        } else {
            Ok(ActionStatus::Completed)
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Forget `name` together with its history. Returns `false` if it was
    /// not registered.
    pub fn remove(&mut self, name: &str) -> bool {
        self.active.remove(name);
        self.entries.remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.entries.clear();
    }

    /// Run one iteration of the action behind `handle`.
    ///
    /// Does nothing if the action is no longer active or was re-registered
    /// since `handle` was issued. Otherwise every step runs in order, the
    /// record is stored, and the termination predicates decide whether the
    /// action runs again.
    pub async fn run_iteration(&mut self, handle: &RunHandle) -> IterationOutcome {
        if !self.active.contains(&handle.name) {
            return IterationOutcome::Skipped;
        }
        let Some(entry) = self.entries.get(&handle.name) else {
            return IterationOutcome::Skipped;
        };
        if entry.registration != handle.registration {
            tracing::debug!(action = %handle.name, "ignoring iteration of a previous registration");
            return IterationOutcome::Skipped;
        }

        let definition = Arc::clone(&entry.definition);
        let iteration = entry.history.repeats + 1;
        tracing::info!(
            action = %definition.name,
            iteration,
            times = definition.times,
            "starting iteration"
        );

        let started_at = time::now();
        let mut results = Vec::with_capacity(definition.steps.len());
        for step in &definition.steps {
            results.push(self.execute_step(&definition.name, step).await);
        }
        let record = ExecutionRecord::new(iteration, started_at, time::now(), results);
        let passed = record.passed();
        tracing::info!(
            action = %definition.name,
            run_id = %record.id,
            iteration,
            passed,
            elapsed_ms = time::elapsed_ms(record.started_at, record.finished_at),
            "finished iteration"
        );

        let Some(entry) = self.entries.get_mut(&handle.name) else {
            return IterationOutcome::Skipped;
        };
        entry.history.record(record, definition.history_capacity());

        let history = &entry.history;
        match definition.termination(history.repeats, history.pass_count, history.fail_count) {
            Some(reason) => {
                self.active.remove(&handle.name);
                tracing::info!(
                    action = %definition.name,
                    repeats = history.repeats,
                    pass_count = history.pass_count,
                    fail_count = history.fail_count,
                    ?reason,
                    "action completed"
                );
                IterationOutcome::Completed(reason)
            }
            None => IterationOutcome::Rearm(definition.interval()),
        }
    }

    /// Run one step on its own task so a panicking collaborator turns into a
    /// failing result instead of taking the scheduler down.
    async fn execute_step(&self, action: &str, step: &StepDefinition) -> StepResult {
        let timestamp = time::now();
        let executor = Arc::clone(&self.executor);
        let owned = step.clone();
        let result = match tokio::spawn(async move { executor.execute(&owned).await }).await {
            Ok(result) => result,
            Err(err) => StepResult::failed(
                step,
                timestamp,
                StepFault::new(FaultKind::Device, format!("step execution panicked: {err}")),
            ),
        };

        match &result.fault {
            None => tracing::debug!(
                action,
                step = %result.name,
                step_type = %result.step_type,
                result = %summarize(&result),
                "step passed"
            ),
            Some(fault) => tracing::warn!(
                action,
                step = %result.name,
                step_type = %result.step_type,
                kind = ?fault.kind,
                error = %fault,
                "step failed"
            ),
        }
        result
    }
}

/// Abbreviated JSON rendering of a step output.
fn summarize(result: &StepResult) -> String {
    let rendered = serde_json::to_string(&result.result).unwrap_or_default();
    if rendered.chars().count() <= LOG_SUMMARY_LEN {
        return rendered;
    }
    let mut summary: String = rendered.chars().take(LOG_SUMMARY_LEN).collect();
    summary.push_str("...");
    summary
}
