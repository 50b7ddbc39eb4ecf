use std::fmt;
use std::future::Future;

use futures::future::{self, BoxFuture, FutureExt};

use crate::args::StepArgs;

/// Whether a callable takes the arguments offered to it.
///
/// Declared when the callable is registered. A `Nullary` callable is always
/// invoked with no arguments, whatever its predecessor produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Takes no arguments.
    Nullary,
    /// Receives every positional argument offered to it.
    Positional,
}

type Invoke<V, T, E> = Box<dyn Fn(Vec<V>) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// A named action or compensation with a declared arity.
///
/// Synchronous and asynchronous functions are both adapted to a boxed future
/// at construction time, so the engine awaits every invocation the same way.
pub struct Callable<V, T, E> {
    name: &'static str,
    arity: Arity,
    invoke: Invoke<V, T, E>,
}

/// Forward operation of a step. Its output feeds the next step.
pub type Action<V, E> = Callable<V, StepArgs<V>, E>;

/// Undo operation of a step. Receives what the step's action produced.
pub type Compensation<V, E> = Callable<V, (), E>;

impl<V, T, E> Callable<V, T, E>
where
    V: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    /// A synchronous callable that ignores any arguments.
    pub fn nullary<F>(name: &'static str, f: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            name,
            arity: Arity::Nullary,
            invoke: Box::new(move |_| future::ready(f()).boxed()),
        }
    }

    /// A synchronous callable receiving the positional arguments.
    pub fn positional<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&[V]) -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            name,
            arity: Arity::Positional,
            invoke: Box::new(move |args| future::ready(f(&args)).boxed()),
        }
    }

    /// An asynchronous callable that ignores any arguments.
    pub fn nullary_async<F, Fut>(name: &'static str, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            name,
            arity: Arity::Nullary,
            invoke: Box::new(move |_| f().boxed()),
        }
    }

    /// An asynchronous callable receiving an owned copy of the positional
    /// arguments.
    pub fn positional_async<F, Fut>(name: &'static str, f: F) -> Self
    where
        F: Fn(Vec<V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            name,
            arity: Arity::Positional,
            invoke: Box::new(move |args| f(args).boxed()),
        }
    }
}

impl<V, T, E> Callable<V, T, E> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// The arguments this callable will actually see when offered `args`.
    pub(crate) fn accepted_args(&self, args: &[V]) -> Vec<V>
    where
        V: Clone,
    {
        match self.arity {
            Arity::Nullary => Vec::new(),
            Arity::Positional => args.to_vec(),
        }
    }

    pub(crate) fn invoke(&self, args: &[V]) -> BoxFuture<'static, Result<T, E>>
    where
        V: Clone,
    {
        (self.invoke)(self.accepted_args(args))
    }
}

impl<V, T, E> fmt::Debug for Callable<V, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
