use std::error::Error as StdError;
use std::fmt::Debug;

use crate::audit::SagaAuditLog;
use crate::callable::{Action, Compensation};
use crate::config::SagaConfig;
use crate::error::SagaError;
use crate::saga::Saga;
use crate::step::Step;

/// Fluent builder accumulating saga steps.
///
/// ```
/// use saga_orchestrator::{Callable, SagaBuilder, StepArgs};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("out of stock")]
/// struct OutOfStock;
///
/// let saga = SagaBuilder::new()
///     .add_step(
///         Callable::nullary("reserve", || Ok::<_, OutOfStock>(StepArgs::single(42_u32))),
///         Callable::positional("release", |_: &[u32]| Ok(())),
///     )
///     .add_step(
///         Callable::positional("charge", |args: &[u32]| Ok(StepArgs::single(args[0] * 2))),
///         Callable::nullary("refund", || Ok(())),
///     )
///     .build()
///     .execute_blocking()?;
///
/// assert_eq!(saga.output(), Some(&StepArgs::single(84)));
/// # Ok::<_, saga_orchestrator::SagaError<OutOfStock>>(())
/// ```
///
/// Arity is not validated: a positional callable that expects more
/// arguments than it is given has to report that through its own error.
#[derive(Debug)]
pub struct SagaBuilder<V, E> {
    steps: Vec<Step<V, E>>,
    config: SagaConfig,
}

impl<V, E> SagaBuilder<V, E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            config: SagaConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SagaConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a step pairing `action` with the `compensation` that undoes it.
    #[must_use]
    pub fn add_step(mut self, action: Action<V, E>, compensation: Compensation<V, E>) -> Self {
        self.steps.push(Step::new(action, compensation));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Build the saga from the accumulated steps without running it.
    #[must_use]
    pub fn build(self) -> Saga<V, E> {
        Saga::with_config(self.steps, self.config)
    }
}

impl<V, E> Default for SagaBuilder<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> SagaBuilder<V, E>
where
    V: Clone + Debug + Send + Sync + 'static,
    E: StdError + Send + Sync + 'static,
{
    /// Build the saga and run it.
    ///
    /// # Errors
    ///
    /// Returns the [`SagaError`] produced by [`Saga::execute`].
    pub async fn execute(self) -> Result<Saga<V, E>, SagaError<E>> {
        self.build().execute().await
    }

    /// Build the saga and run it, also returning the audit log.
    pub async fn execute_with_audit(self) -> (Result<Saga<V, E>, SagaError<E>>, SagaAuditLog) {
        self.build().execute_with_audit().await
    }
}
