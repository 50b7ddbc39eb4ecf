use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::Debug;

use futures::executor::block_on;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::args::StepArgs;
use crate::audit::SagaAuditLog;
use crate::config::SagaConfig;
use crate::error::{CapturedError, SagaError};
use crate::report::step_signature;
use crate::step::Step;

/// Lifecycle of a saga. A saga runs once, from `Pending` to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaState {
    Pending,
    Running,
    Completed,
    Failed,
}

/// An ordered sequence of steps ready for execution.
///
/// Steps run in insertion order and each step's output becomes the next
/// step's arguments. If any action fails, the steps that completed before it
/// are compensated in reverse order (LIFO). Rollback does not stop at a
/// failing compensation; every completed step gets its compensation attempted.
#[derive(Debug)]
pub struct Saga<V, E> {
    steps: Vec<Step<V, E>>,
    state: SagaState,
    config: SagaConfig,
}

impl<V, E> Saga<V, E> {
    #[must_use]
    pub fn new(steps: Vec<Step<V, E>>) -> Self {
        Self::with_config(steps, SagaConfig::default())
    }

    #[must_use]
    pub fn with_config(steps: Vec<Step<V, E>>, config: SagaConfig) -> Self {
        Self {
            steps,
            state: SagaState::Pending,
            config,
        }
    }

    #[must_use]
    pub fn state(&self) -> SagaState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &SagaConfig {
        &self.config
    }

    #[must_use]
    pub fn steps(&self) -> &[Step<V, E>] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// What each step's action returned, in step order.
    #[must_use]
    pub fn results(&self) -> Vec<Option<&StepArgs<V>>> {
        self.steps.iter().map(Step::result).collect()
    }

    /// The last step's result, i.e. the saga's final output.
    #[must_use]
    pub fn output(&self) -> Option<&StepArgs<V>> {
        self.steps.last().and_then(Step::result)
    }
}

impl<V: Debug, E> Saga<V, E> {
    /// Call signature of every step, as rendered in [`crate::SagaReport`].
    #[must_use]
    pub fn signatures(&self) -> Vec<String> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| step_signature(index, step))
            .collect()
    }
}

impl<V, E> Saga<V, E>
where
    V: Clone + Debug + Send + Sync + 'static,
    E: StdError + Send + Sync + 'static,
{
    /// Execute the saga, returning it with every step's result populated.
    ///
    /// A saga runs at most once. Executing a saga that has already completed
    /// invokes nothing and hands it back unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`SagaError`] if an action fails. By then every step that
    /// completed before the failing one has had its compensation attempted,
    /// and any compensation errors are carried in the returned error.
    pub async fn execute(self) -> Result<Self, SagaError<E>> {
        let (result, _audit_log) = self.execute_with_audit().await;
        result
    }

    /// Execute the saga and return both the result and an audit log.
    pub async fn execute_with_audit(self) -> (Result<Self, SagaError<E>>, SagaAuditLog) {
        let span = info_span!("saga", name = %self.config.name, steps = self.steps.len());
        self.execute_internal().instrument(span).await
    }

    /// Drive [`Saga::execute`] to completion on the current thread.
    ///
    /// # Errors
    ///
    /// Same as [`Saga::execute`].
    pub fn execute_blocking(self) -> Result<Self, SagaError<E>> {
        block_on(self.execute())
    }

    async fn execute_internal(mut self) -> (Result<Self, SagaError<E>>, SagaAuditLog) {
        let mut audit_log = SagaAuditLog::new();
        if self.state != SagaState::Pending {
            warn!(state = ?self.state, "saga already ran, not executing again");
            return (Ok(self), audit_log);
        }

        let mut args: Vec<V> = Vec::new();
        self.state = SagaState::Running;

        for index in 0..self.steps.len() {
            let name = self.steps[index].name();
            audit_log.record_start(index, name, self.steps[index].compensation().name());
            debug!(index, step = name, args = args.len(), "executing step");

            let outcome = self.steps[index]
                .act(&args)
                .await
                .map(|output| output.as_slice().to_vec());

            match outcome {
                Ok(next_args) => {
                    audit_log.record_success();
                    debug!(index, step = name, outputs = next_args.len(), "step completed");
                    args = next_args;
                }
                Err(error) => {
                    audit_log.record_failure();
                    let action_failure = CapturedError::capture(error);
                    warn!(index, step = name, error = %action_failure, "step failed, rolling back");

                    let compensation_failures = self.compensate(index, &mut audit_log).await;
                    self.state = SagaState::Failed;

                    let saga_error = SagaError {
                        failed_step_index: index,
                        action_failure,
                        compensation_failures,
                        signatures: self.signatures(),
                        report_config: self.config.report.clone(),
                    };
                    return (Err(saga_error), audit_log);
                }
            }
        }

        self.state = SagaState::Completed;
        info!("saga completed");
        (Ok(self), audit_log)
    }

    /// Compensate steps `[0, failed_index)` in descending order.
    async fn compensate(
        &self,
        failed_index: usize,
        audit_log: &mut SagaAuditLog,
    ) -> BTreeMap<usize, CapturedError<E>> {
        let mut compensation_failures = BTreeMap::new();

        for (index, step) in self.steps[..failed_index].iter().enumerate().rev() {
            debug_assert!(step.is_completed(), "only completed steps are compensated");

            match step.compensate().await {
                Ok(()) => {
                    audit_log.record_compensated(index);
                    debug!(index, step = step.name(), "step compensated");
                }
                Err(error) => {
                    let failure = CapturedError::capture(error);
                    warn!(index, step = step.name(), error = %failure, "compensation failed");
                    audit_log.record_compensation_failed(index);
                    compensation_failures.insert(index, failure);
                }
            }
        }

        compensation_failures
    }
}
