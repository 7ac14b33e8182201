//! Single-context scheduler.
//!
//! One tokio task owns the [`Registry`] and handles [`Command`]s from an
//! unbounded channel, so iterations never overlap and every registry access
//! is serialized. Waiting between iterations happens in spawned timer tasks
//! which post a `Fire` command back when they wake up; they only hold a weak
//! sender, so dropping every [`Scheduler`] handle stops the context.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cadence_domain::action::{ActionDefinition, ActionStatus};
use cadence_domain::error::{CadenceError, NotFoundError, ValidationError};
use cadence_domain::history::RunHistory;
use cadence_domain::id::RegistrationId;
use tokio::sync::{mpsc, oneshot};
use tokio::task::AbortHandle;

use crate::ports::Timer;
use crate::registry::{IterationOutcome, Registry, RunHandle};
use crate::steps::StepExecutor;

enum Command {
    Add {
        definition: ActionDefinition,
        reply: oneshot::Sender<Result<(), ValidationError>>,
    },
    History {
        name: String,
        reply: oneshot::Sender<Result<RunHistory, NotFoundError>>,
    },
    Status {
        name: String,
        reply: oneshot::Sender<Result<ActionStatus, NotFoundError>>,
    },
    Names {
        reply: oneshot::Sender<Vec<String>>,
    },
    Remove {
        name: String,
        reply: oneshot::Sender<bool>,
    },
    Clear {
        reply: oneshot::Sender<()>,
    },
    Fire(RunHandle),
}

/// Handle to the scheduling context. Cheap to clone, usable from any task.
#[derive(Clone)]
pub struct Scheduler {
    commands: mpsc::UnboundedSender<Command>,
}

impl Scheduler {
    /// Spawn the scheduling context on the current tokio runtime.
    pub fn spawn<E: StepExecutor, T: Timer>(executor: E, timer: T) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let context = Context {
            registry: Registry::new(Arc::new(executor)),
            timer: Arc::new(timer),
            timers: HashMap::new(),
            commands: commands.downgrade(),
        };
        tokio::spawn(context.run(receiver));
        Self { commands }
    }

    /// Register an action; its first iteration runs right away.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Validation`] if the definition is invalid or
    /// the name is taken, [`CadenceError::Unavailable`] if the context is gone.
    #[tracing::instrument(skip(self, definition), fields(action = %definition.name))]
    pub async fn add(&self, definition: ActionDefinition) -> Result<(), CadenceError> {
        self.request(|reply| Command::Add { definition, reply })
            .await?
            .map_err(CadenceError::from)
    }

    /// Snapshot of an action's history.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::NotFound`] if the name is not registered,
    /// [`CadenceError::Unavailable`] if the context is gone.
    #[tracing::instrument(skip(self))]
    pub async fn history(&self, name: &str) -> Result<RunHistory, CadenceError> {
        let name = name.to_string();
        self.request(|reply| Command::History { name, reply })
            .await?
            .map_err(CadenceError::from)
    }

    /// # Errors
    ///
    /// Returns [`CadenceError::NotFound`] if the name is not registered,
    /// [`CadenceError::Unavailable`] if the context is gone.
    #[tracing::instrument(skip(self))]
    pub async fn status(&self, name: &str) -> Result<ActionStatus, CadenceError> {
        let name = name.to_string();
        self.request(|reply| Command::Status { name, reply })
            .await?
            .map_err(CadenceError::from)
    }

    /// Registered action names, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Unavailable`] if the context is gone.
    #[tracing::instrument(skip(self))]
    pub async fn names(&self) -> Result<Vec<String>, CadenceError> {
        self.request(|reply| Command::Names { reply }).await
    }

    /// Remove an action and its history, cancelling any pending iteration.
    /// Returns whether the name was registered.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Unavailable`] if the context is gone.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, name: &str) -> Result<bool, CadenceError> {
        let name = name.to_string();
        self.request(|reply| Command::Remove { name, reply }).await
    }

    /// # Errors
    ///
    /// Returns [`CadenceError::Unavailable`] if the context is gone.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CadenceError> {
        self.request(|reply| Command::Clear { reply }).await
    }

    async fn request<R>(
        &self,
        command: impl FnOnce(oneshot::Sender<R>) -> Command,
    ) -> Result<R, CadenceError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| CadenceError::Unavailable)?;
        response.await.map_err(|_| CadenceError::Unavailable)
    }
}

/// State owned by the scheduling task.
struct Context<E, T> {
    registry: Registry<E>,
    timer: Arc<T>,
    /// Pending timer task per action name.
    timers: HashMap<String, (RegistrationId, AbortHandle)>,
    commands: mpsc::WeakUnboundedSender<Command>,
}

impl<E: StepExecutor, T: Timer> Context<E, T> {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command>) {
        tracing::debug!("scheduler started");
        while let Some(command) = receiver.recv().await {
            self.handle(command).await;
        }
        self.cancel_all();
        tracing::debug!("scheduler stopped");
    }

    async fn handle(&mut self, command: Command) {
        // Replies are best effort: the caller may have given up waiting.
        match command {
            Command::Add { definition, reply } => {
                let outcome = self.registry.add(definition).map(|handle| {
                    tracing::info!(action = %handle.name, "action scheduled");
                    self.arm(handle, Duration::ZERO);
                });
                let _ = reply.send(outcome);
            }
            Command::History { name, reply } => {
                let _ = reply.send(self.registry.history(&name).cloned());
            }
            Command::Status { name, reply } => {
                let _ = reply.send(self.registry.status(&name));
            }
            Command::Names { reply } => {
                let _ = reply.send(self.registry.names());
            }
            Command::Remove { name, reply } => {
                if let Some((_, timer)) = self.timers.remove(&name) {
                    timer.abort();
                }
                let removed = self.registry.remove(&name);
                if removed {
                    tracing::info!(action = %name, "action removed");
                }
                let _ = reply.send(removed);
            }
            Command::Clear { reply } => {
                self.cancel_all();
                self.registry.clear();
                tracing::info!("all actions removed");
                let _ = reply.send(());
            }
            Command::Fire(handle) => {
                if self
                    .timers
                    .get(&handle.name)
                    .is_some_and(|(registration, _)| *registration == handle.registration)
                {
                    self.timers.remove(&handle.name);
                }
                match self.registry.run_iteration(&handle).await {
                    IterationOutcome::Rearm(delay) => self.arm(handle, delay),
                    IterationOutcome::Completed(_) | IterationOutcome::Skipped => {}
                }
            }
        }
    }

    /// Schedule the next iteration of `handle` after `delay`.
    fn arm(&mut self, handle: RunHandle, delay: Duration) {
        if delay.is_zero() {
            if let Some(commands) = self.commands.upgrade() {
                let _ = commands.send(Command::Fire(handle));
            }
            return;
        }

        let name = handle.name.clone();
        let registration = handle.registration;
        let timer = Arc::clone(&self.timer);
        let commands = self.commands.clone();
        let task = tokio::spawn(async move {
            timer.sleep(delay).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::Fire(handle));
            }
        });
        if let Some((_, previous)) = self.timers.insert(name, (registration, task.abort_handle())) {
            previous.abort();
        }
    }

    fn cancel_all(&mut self) {
        for (_, (_, timer)) in self.timers.drain() {
            timer.abort();
        }
    }
}
