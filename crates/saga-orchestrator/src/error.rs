use std::any::Any;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug};
use std::io;

use crate::config::ReportConfig;
use crate::report::SagaReport;

/// An error returned by an action or compensation, together with the
/// diagnostics captured when the saga caught it.
#[derive(Debug)]
pub struct CapturedError<E> {
    /// The underlying error.
    pub error: E,
    /// Short name of the error's kind: the enum variant, the struct name, or
    /// for [`std::io::Error`] its [`io::ErrorKind`]. Other errors with a
    /// hand-written `Debug` report whatever identifier their `Debug` starts with.
    pub kind: String,
    /// The error's `Display` rendering.
    pub message: String,
    /// The error followed by each of its sources, one line per cause.
    pub trace: Vec<String>,
}

impl<E> CapturedError<E>
where
    E: StdError + 'static,
{
    pub(crate) fn capture(error: E) -> Self {
        let kind = match (&error as &dyn Any).downcast_ref::<io::Error>() {
            Some(io_error) => format!("{:?}", io_error.kind()),
            None => error_kind(&error),
        };
        let message = error.to_string();
        let mut trace = vec![message.clone()];
        let mut source = error.source();
        while let Some(cause) = source {
            trace.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            error,
            kind,
            message,
            trace,
        }
    }
}

impl<E> fmt::Display for CapturedError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl<E> StdError for CapturedError<E>
where
    E: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.error)
    }
}

/// Leading identifier of the `Debug` rendering (`ValueError("x")` becomes
/// `ValueError`), or the type's own name when `Debug` starts with anything else.
fn error_kind<E: Debug>(error: &E) -> String {
    let rendered = format!("{error:?}");
    let ident: String = rendered
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if ident.is_empty() || !ident.starts_with(|c: char| c.is_alphabetic()) {
        short_type_name::<E>().to_string()
    } else {
        ident
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Error from saga execution.
///
/// Produced only after rollback has been attempted for every step that
/// completed before the failing one.
#[derive(Debug, thiserror::Error)]
#[error("{}", header(*failed_step_index, action_failure, compensation_failures.len()))]
pub struct SagaError<E: StdError + 'static> {
    /// Index of the step whose action failed.
    pub failed_step_index: usize,
    /// The error returned by that action.
    #[source]
    pub action_failure: CapturedError<E>,
    /// Errors from failed compensations, keyed by step index. Steps whose
    /// compensation succeeded are absent.
    pub compensation_failures: BTreeMap<usize, CapturedError<E>>,
    pub(crate) signatures: Vec<String>,
    pub(crate) report_config: ReportConfig,
}

fn header<E>(index: usize, failure: &CapturedError<E>, compensation_failures: usize) -> String {
    if compensation_failures == 0 {
        format!("step {index} failed: {failure}")
    } else {
        format!(
            "step {index} failed: {failure}, and {compensation_failures} compensation(s) also failed"
        )
    }
}

impl<E: StdError + 'static> SagaError<E> {
    /// Call signature of every registered step, in execution order.
    #[must_use]
    pub fn signatures(&self) -> &[String] {
        &self.signatures
    }

    #[must_use]
    pub fn compensation_failure_count(&self) -> usize {
        self.compensation_failures.len()
    }

    /// Whether every completed step was rolled back successfully.
    #[must_use]
    pub fn is_fully_compensated(&self) -> bool {
        self.compensation_failures.is_empty()
    }

    /// Detailed multi-line rendering: step signatures, the action failure
    /// trace and each compensation failure.
    #[must_use]
    pub fn report(&self) -> SagaReport<'_, E> {
        SagaReport::new(self, &self.report_config)
    }

    /// Discard the diagnostics and keep the action's original error.
    #[must_use]
    pub fn into_action_error(self) -> E {
        self.action_failure.error
    }
}
