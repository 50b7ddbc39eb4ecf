use crate::args::StepArgs;
use crate::callable::{Action, Compensation};

/// A unit of a saga: one action paired with the compensation that undoes it.
///
/// The step remembers what its action returned. That value is both the
/// step's result and the argument list replayed to its compensation during
/// rollback.
#[derive(Debug)]
pub struct Step<V, E> {
    action: Action<V, E>,
    compensation: Compensation<V, E>,
    input: Option<Vec<V>>,
    result: Option<StepArgs<V>>,
}

impl<V, E> Step<V, E> {
    #[must_use]
    pub fn new(action: Action<V, E>, compensation: Compensation<V, E>) -> Self {
        Self {
            action,
            compensation,
            input: None,
            result: None,
        }
    }

    #[must_use]
    pub fn action(&self) -> &Action<V, E> {
        &self.action
    }

    #[must_use]
    pub fn compensation(&self) -> &Compensation<V, E> {
        &self.compensation
    }

    /// Human-readable name for logging and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.action.name()
    }

    /// Arguments the action was last invoked with, after the arity rule.
    #[must_use]
    pub fn input(&self) -> Option<&[V]> {
        self.input.as_deref()
    }

    /// What the action returned, if it has completed.
    #[must_use]
    pub fn result(&self) -> Option<&StepArgs<V>> {
        self.result.as_ref()
    }

    /// Arguments the compensation will receive. `None` until the action has
    /// completed successfully.
    #[must_use]
    pub fn compensation_args(&self) -> Option<&[V]> {
        self.result.as_ref().map(StepArgs::as_slice)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.result.is_some()
    }
}

impl<V: Clone, E> Step<V, E> {
    /// Run the action with `args`, storing its output on success.
    ///
    /// A nullary action is invoked with no arguments regardless of `args`.
    ///
    /// # Errors
    ///
    /// Returns the action's error unchanged. The step is left without a
    /// result, so it will not be compensated.
    pub async fn act(&mut self, args: &[V]) -> Result<&StepArgs<V>, E> {
        self.result = None;
        self.input = Some(self.action.accepted_args(args));
        let output = self.action.invoke(args).await?;
        Ok(self.result.insert(output))
    }

    /// Run the compensation with the stored compensation arguments.
    ///
    /// Does nothing for a step whose action has not completed: there is
    /// nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns the compensation's error unchanged.
    pub async fn compensate(&self) -> Result<(), E> {
        match self.compensation_args() {
            Some(args) => self.compensation.invoke(args).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use futures::executor::block_on;

    use super::*;
    use crate::callable::Callable;

    #[derive(Debug, PartialEq)]
    struct TestError(String);

    fn recording_step(log: &Arc<Mutex<Vec<Vec<i32>>>>) -> Step<i32, TestError> {
        let recorder = Arc::clone(log);
        Step::new(
            Callable::positional("add_one", |args: &[i32]| {
                Ok(StepArgs::list(args.iter().map(|v| v + 1)))
            }),
            Callable::positional("undo_add_one", move |args: &[i32]| {
                recorder.lock().expect("lock").push(args.to_vec());
                Ok(())
            }),
        )
    }

    #[test]
    fn act_stores_result_and_input() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut step = recording_step(&log);

        let output = block_on(step.act(&[1, 2])).expect("action should succeed");

        assert_eq!(output, &StepArgs::list([2, 3]));
        assert_eq!(step.input(), Some(&[1, 2][..]));
        assert_eq!(step.compensation_args(), Some(&[2, 3][..]));
        assert!(step.is_completed());
    }

    #[test]
    fn compensate_receives_action_output() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut step = recording_step(&log);

        block_on(step.act(&[10])).expect("action should succeed");
        block_on(step.compensate()).expect("compensation should succeed");

        assert_eq!(*log.lock().expect("lock"), vec![vec![11]]);
    }

    #[test]
    fn nullary_compensation_ignores_stored_arguments() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let mut step: Step<i32, TestError> = Step::new(
            Callable::nullary("produce", || Ok(StepArgs::list([1, 2, 3]))),
            Callable::nullary("discard", move || {
                *counter.lock().expect("lock") += 1;
                Ok(())
            }),
        );

        block_on(step.act(&[])).expect("action should succeed");
        block_on(step.compensate()).expect("compensation should succeed");

        assert_eq!(*calls.lock().expect("lock"), 1);
        assert!(step.compensation().accepted_args(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn compensate_before_action_runs_is_a_no_op() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let step = recording_step(&log);

        block_on(step.compensate()).expect("compensation should succeed");

        assert!(log.lock().expect("lock").is_empty());
    }

    #[test]
    fn failed_action_leaves_no_result() {
        let mut step: Step<i32, TestError> = Step::new(
            Callable::positional("reject", |_: &[i32]| Err(TestError("rejected".to_string()))),
            Callable::nullary("noop", || Ok(())),
        );

        let result = block_on(step.act(&[4]));

        assert_eq!(result, Err(TestError("rejected".to_string())));
        assert!(!step.is_completed());
        assert_eq!(step.compensation_args(), None);
        assert_eq!(step.input(), Some(&[4][..]));
    }

    #[test]
    fn name_comes_from_action() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let step = recording_step(&log);
        assert_eq!(step.name(), "add_one");
    }
}
