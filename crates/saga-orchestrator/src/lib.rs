//! Saga orchestration for sequences of fallible, compensable steps.
//!
//! Each step pairs a forward action with a compensation. Steps run in order
//! and each action's output becomes the next action's arguments. When an
//! action fails, every step that completed before it is compensated in
//! reverse order, and the caller gets a single [`SagaError`] describing the
//! failure and any compensations that failed along the way.

mod args;
mod audit;
mod builder;
mod callable;
mod config;
mod error;
mod report;
mod saga;
mod step;

pub use args::StepArgs;
pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use builder::SagaBuilder;
pub use callable::{Action, Arity, Callable, Compensation};
pub use config::{ConfigError, ReportConfig, SagaConfig};
pub use error::{CapturedError, SagaError};
pub use report::SagaReport;
pub use saga::{Saga, SagaState};
pub use step::Step;
