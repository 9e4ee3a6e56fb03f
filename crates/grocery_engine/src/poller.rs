use std::num::NonZeroU32;
use std::time::Duration;

use grocery_core::{Observation, PollMachine, PollStep};
use grocery_logging::{grocery_info, grocery_warn};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{ApiError, FailureKind, PollEvent, TaskApi, TaskHandle, TaskSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    /// Wait between attempts. Zero is allowed and only yields to the runtime.
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(10),
        }
    }
}

impl PollSettings {
    /// Upper bound on time spent sleeping in one session.
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("task creation failed: {0}")]
    CreationFailed(ApiError),
    #[error("task {task} reported failure")]
    TaskFailed { task: TaskHandle, details: Value },
    #[error("task {task} did not complete within {attempts} attempts ({waited:?} of waiting)")]
    Timeout {
        task: TaskHandle,
        attempts: u32,
        waited: Duration,
    },
    #[error("fetching result of task {task} failed: {source}")]
    ResultFetchFailed { task: TaskHandle, source: ApiError },
    #[error("cancelled before the task was created")]
    CreationCancelled,
    #[error("polling task {task} cancelled after {attempts} attempts")]
    Cancelled { task: TaskHandle, attempts: u32 },
    #[error("max_attempts must be at least 1")]
    InvalidSettings,
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: PollEvent);
}

/// Sink that writes every event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: PollEvent) {
        match event {
            PollEvent::TaskCreated { task } => grocery_info!("task {} created", task),
            PollEvent::StatusObserved {
                task,
                attempt,
                max_attempts,
                status,
            } => grocery_info!("task {} attempt {}/{}: {}", task, attempt, max_attempts, status),
            PollEvent::StatusQueryFailed {
                task,
                attempt,
                max_attempts,
                error,
            } => grocery_warn!(
                "task {} attempt {}/{}: status query failed: {}",
                task,
                attempt,
                max_attempts,
                error
            ),
            PollEvent::Waiting { task, delay, .. } => {
                grocery_info!("task {} waiting {:?} before next check", task, delay)
            }
            PollEvent::ResultFetched { task } => grocery_info!("task {} result fetched", task),
        }
    }
}

/// Drives create → poll → fetch against a [`TaskApi`].
///
/// Waits between attempts race against the cancellation token, as do
/// in-flight status queries. Cancelling leaves the remote task untouched.
pub struct TaskPoller<A> {
    api: A,
    settings: PollSettings,
    cancel: CancellationToken,
}

impl<A: TaskApi> TaskPoller<A> {
    pub fn new(api: A, settings: PollSettings) -> Self {
        Self {
            api,
            settings,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Creates the remote task. Creation is never retried.
    ///
    /// Settings are validated first so a session that cannot poll never
    /// creates anything remotely.
    pub async fn create_task(
        &self,
        spec: &TaskSpec,
        sink: &dyn ProgressSink,
    ) -> Result<TaskHandle, PollError> {
        self.max_attempts()?;
        if spec.name.trim().is_empty() {
            return Err(PollError::CreationFailed(ApiError::new(
                FailureKind::InvalidRequest,
                "task name is empty",
            )));
        }
        let created = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                grocery_warn!("task creation cancelled");
                return Err(PollError::CreationCancelled);
            }
            created = self.api.create_task(spec) => created,
        };
        let task = created.map_err(PollError::CreationFailed)?;
        sink.emit(PollEvent::TaskCreated { task: task.clone() });
        Ok(task)
    }

    /// Polls until the task completes, fails, or runs out of attempts, then
    /// fetches the result exactly once.
    pub async fn poll_until_done(
        &self,
        task: &TaskHandle,
        sink: &dyn ProgressSink,
    ) -> Result<Value, PollError> {
        let max_attempts = self.max_attempts()?;
        let mut machine = PollMachine::new(max_attempts);
        let mut last_body = Value::Null;

        loop {
            let attempt = machine.next_attempt();
            let queried = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(self.cancelled(task, &machine)),
                queried = self.api.task_status(task) => queried,
            };

            let observation = match queried {
                Ok(snapshot) => {
                    if !snapshot.status.is_recognized() {
                        // Treated as waiting; a new remote state only surfaces as a timeout.
                        grocery_warn!(
                            "task {} reported unrecognized status {:?}, treating as waiting",
                            task,
                            snapshot.status.as_str()
                        );
                    }
                    sink.emit(PollEvent::StatusObserved {
                        task: task.clone(),
                        attempt,
                        max_attempts: max_attempts.get(),
                        status: snapshot.status.clone(),
                    });
                    last_body = snapshot.body;
                    Observation::Status(snapshot.status)
                }
                Err(error) => {
                    grocery_warn!("task {} status query failed: {}", task, error);
                    sink.emit(PollEvent::StatusQueryFailed {
                        task: task.clone(),
                        attempt,
                        max_attempts: max_attempts.get(),
                        error,
                    });
                    Observation::QueryFailed
                }
            };

            match machine.observe(observation) {
                PollStep::Wait { .. } => {
                    sink.emit(PollEvent::Waiting {
                        task: task.clone(),
                        attempt,
                        delay: self.settings.interval,
                    });
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => return Err(self.cancelled(task, &machine)),
                        _ = tokio::time::sleep(self.settings.interval) => {}
                    }
                }
                PollStep::FetchResult => break,
                PollStep::Fail => {
                    return Err(PollError::TaskFailed {
                        task: task.clone(),
                        details: last_body,
                    })
                }
                PollStep::GiveUp => {
                    return Err(PollError::Timeout {
                        task: task.clone(),
                        attempts: machine.attempts(),
                        waited: self.settings.max_wait(),
                    })
                }
            }
        }

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(self.cancelled(task, &machine)),
            fetched = self.api.task_result(task) => fetched,
        };
        let result = fetched.map_err(|source| PollError::ResultFetchFailed {
            task: task.clone(),
            source,
        })?;
        sink.emit(PollEvent::ResultFetched { task: task.clone() });
        Ok(result)
    }

    /// Creates the task and polls it to completion.
    pub async fn run(
        &self,
        spec: &TaskSpec,
        sink: &dyn ProgressSink,
    ) -> Result<(TaskHandle, Value), PollError> {
        let task = self.create_task(spec, sink).await?;
        let result = self.poll_until_done(&task, sink).await?;
        Ok((task, result))
    }

    fn max_attempts(&self) -> Result<NonZeroU32, PollError> {
        NonZeroU32::new(self.settings.max_attempts).ok_or(PollError::InvalidSettings)
    }

    fn cancelled(&self, task: &TaskHandle, machine: &PollMachine) -> PollError {
        grocery_warn!("polling task {} cancelled", task);
        PollError::Cancelled {
            task: task.clone(),
            attempts: machine.attempts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_wait_excludes_the_last_attempt() {
        let settings = PollSettings {
            max_attempts: 30,
            interval: Duration::from_secs(10),
        };
        assert_eq!(settings.max_wait(), Duration::from_secs(290));

        let single = PollSettings {
            max_attempts: 1,
            ..settings
        };
        assert_eq!(single.max_wait(), Duration::ZERO);
    }
}
