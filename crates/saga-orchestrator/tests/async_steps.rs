//! Integration tests for asynchronous actions and compensations.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use saga_orchestrator::{Callable, SagaBuilder, SagaConfig, SagaState, StepArgs};

#[derive(Debug, thiserror::Error)]
enum TestError {
    #[error("{0}")]
    ValueError(String),
    #[error("{0}")]
    RuntimeError(String),
}

type Log = Arc<Mutex<Vec<String>>>;

fn push(log: &Log, entry: String) {
    log.lock().expect("lock").push(entry);
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().expect("lock").clone()
}

#[tokio::test]
async fn async_actions_are_awaited_in_order() -> anyhow::Result<()> {
    let log = Log::default();
    let (slow_log, fast_log) = (Arc::clone(&log), Arc::clone(&log));

    let saga = SagaBuilder::new()
        .add_step(
            Callable::nullary_async("slow", move || {
                let log = Arc::clone(&slow_log);
                async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    push(&log, "slow finished".to_string());
                    Ok::<_, TestError>(StepArgs::single(1))
                }
            }),
            Callable::nullary("undo_slow", || Ok(())),
        )
        .add_step(
            Callable::positional_async("fast", move |args: Vec<i32>| {
                let log = Arc::clone(&fast_log);
                async move {
                    push(&log, format!("fast started with {args:?}"));
                    Ok(StepArgs::single(args[0] + 1))
                }
            }),
            Callable::nullary("undo_fast", || Ok(())),
        )
        .execute()
        .await?;

    assert_eq!(entries(&log), vec!["slow finished", "fast started with [1]"]);
    assert_eq!(saga.output(), Some(&StepArgs::single(2)));
    assert_eq!(saga.state(), SagaState::Completed);
    Ok(())
}

#[tokio::test]
async fn sync_and_async_steps_mix_in_one_saga() {
    let log = Log::default();
    let (undo_first, undo_second) = (Arc::clone(&log), Arc::clone(&log));

    let result = SagaBuilder::new()
        .add_step(
            Callable::nullary("f1", || Ok(StepArgs::single(5))),
            Callable::positional_async("c1", move |args: Vec<i32>| {
                let log = Arc::clone(&undo_first);
                async move {
                    tokio::task::yield_now().await;
                    push(&log, format!("c1 {args:?}"));
                    Ok(())
                }
            }),
        )
        .add_step(
            Callable::positional_async("f2", |args: Vec<i32>| async move {
                Ok(StepArgs::single(args[0] * 2))
            }),
            Callable::positional("c2", move |args: &[i32]| {
                push(&undo_second, format!("c2 {args:?}"));
                Err(TestError::RuntimeError("c2 exploded".to_string()))
            }),
        )
        .add_step(
            Callable::positional_async("f3", |args: Vec<i32>| async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Err(TestError::ValueError(format!("rejected {}", args[0])))
            }),
            Callable::nullary("c3", || Ok(())),
        )
        .execute()
        .await;

    let err = result.expect_err("should be an error");
    assert_eq!(err.failed_step_index, 2);
    assert_eq!(err.action_failure.kind, "ValueError");
    assert_eq!(err.action_failure.message, "rejected 10");
    assert_eq!(err.compensation_failures[&1].kind, "RuntimeError");
    assert_eq!(entries(&log), vec!["c2 [10]", "c1 [5]"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn saga_runs_on_a_spawned_task() -> anyhow::Result<()> {
    let handle = tokio::spawn(async {
        SagaBuilder::new()
            .with_config(SagaConfig::named("spawned"))
            .add_step(
                Callable::nullary_async("remote", || async {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    Ok::<_, TestError>(StepArgs::list([1, 2]))
                }),
                Callable::nullary("undo_remote", || Ok(())),
            )
            .execute()
            .await
    });

    let saga = handle.await??;
    assert_eq!(saga.config().name, "spawned");
    assert_eq!(saga.output(), Some(&StepArgs::list([1, 2])));
    Ok(())
}

#[tokio::test]
async fn caller_can_impose_a_deadline() {
    let outcome = tokio::time::timeout(
        Duration::from_millis(10),
        SagaBuilder::<i32, TestError>::new()
            .add_step(
                Callable::nullary_async("hang", || async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(StepArgs::NoArgs)
                }),
                Callable::nullary("undo_hang", || Ok(())),
            )
            .execute(),
    )
    .await;

    assert!(outcome.is_err(), "deadline should elapse first");
}
