use std::error::Error as StdError;
use std::fmt::{self, Debug, Write as _};

use crate::callable::{Arity, Callable};
use crate::config::ReportConfig;
use crate::error::SagaError;
use crate::step::Step;

/// Render a call as `name(a, b)`.
///
/// Nullary callables render as `name()`. A positional callable that has not
/// been invoked renders as `name(..)`.
pub(crate) fn call_signature<V, T, E>(callable: &Callable<V, T, E>, args: Option<&[V]>) -> String
where
    V: Debug,
{
    match (callable.arity(), args) {
        (Arity::Nullary, _) => format!("{}()", callable.name()),
        (Arity::Positional, None) => format!("{}(..)", callable.name()),
        (Arity::Positional, Some(args)) => {
            let rendered: Vec<String> = args.iter().map(|arg| format!("{arg:?}")).collect();
            format!("{}({})", callable.name(), rendered.join(", "))
        }
    }
}

pub(crate) fn step_signature<V: Debug, E>(index: usize, step: &Step<V, E>) -> String {
    format!(
        "[{index}] {} -> {}",
        call_signature(step.action(), step.input()),
        call_signature(step.compensation(), step.compensation_args()),
    )
}

/// Multi-line diagnostic rendering of a [`SagaError`].
///
/// ```text
/// step 2 failed: ValueError: bad value 10, and 1 compensation(s) also failed
/// steps:
///     [0] f1() -> c1(5)
///     [1] f2(5) -> c2(10)
///     [2] f3(10) -> c3(..)
/// action failure:
///     bad value 10
/// compensation failures:
///     [1] RuntimeError: runtime trouble
///         runtime trouble
/// ```
pub struct SagaReport<'a, E: StdError + 'static> {
    error: &'a SagaError<E>,
    config: &'a ReportConfig,
}

impl<'a, E: StdError + 'static> SagaReport<'a, E> {
    pub(crate) fn new(error: &'a SagaError<E>, config: &'a ReportConfig) -> Self {
        Self { error, config }
    }

    /// Render with different options than the saga was configured with.
    #[must_use]
    pub fn with_config(self, config: &'a ReportConfig) -> Self {
        Self { config, ..self }
    }
}

impl<E: StdError + 'static> fmt::Display for SagaReport<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = " ".repeat(self.config.indent);
        let mut out = String::new();

        writeln!(out, "{}", self.error)?;

        if self.config.show_steps && !self.error.signatures.is_empty() {
            writeln!(out, "steps:")?;
            for signature in &self.error.signatures {
                writeln!(out, "{pad}{signature}")?;
            }
        }

        writeln!(out, "action failure:")?;
        for line in &self.error.action_failure.trace {
            writeln!(out, "{pad}{line}")?;
        }

        if !self.error.compensation_failures.is_empty() {
            writeln!(out, "compensation failures:")?;
            for (index, failure) in &self.error.compensation_failures {
                writeln!(out, "{pad}[{index}] {failure}")?;
                for line in &failure.trace {
                    writeln!(out, "{pad}{pad}{line}")?;
                }
            }
        }

        f.write_str(out.trim_end())
    }
}
