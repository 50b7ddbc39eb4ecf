use std::slice;

/// Value produced by an action and handed to the next action as its arguments.
///
/// The same value is kept by the step that produced it and later replayed to
/// that step's compensation, so a compensation always receives exactly what
/// its action returned, packaged the way a downstream action received it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StepArgs<V> {
    /// Nothing is passed forward.
    #[default]
    NoArgs,
    /// Each value becomes one positional argument.
    ArgList(Vec<V>),
    /// A single positional argument, even when `V` is itself list-shaped.
    SingleArg(V),
}

impl<V> StepArgs<V> {
    /// Wrap one value as a single positional argument.
    #[must_use]
    pub fn single(value: V) -> Self {
        Self::SingleArg(value)
    }

    /// Collect values into a positional argument list.
    #[must_use]
    pub fn list(values: impl IntoIterator<Item = V>) -> Self {
        Self::ArgList(values.into_iter().collect())
    }

    /// The positional arguments this value expands to.
    #[must_use]
    pub fn as_slice(&self) -> &[V] {
        match self {
            Self::NoArgs => &[],
            Self::ArgList(values) => values,
            Self::SingleArg(value) => slice::from_ref(value),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<V> {
        match self {
            Self::NoArgs => Vec::new(),
            Self::ArgList(values) => values,
            Self::SingleArg(value) => vec![value],
        }
    }
}

impl<V> From<Option<V>> for StepArgs<V> {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::NoArgs, Self::SingleArg)
    }
}

impl<V> From<Vec<V>> for StepArgs<V> {
    fn from(values: Vec<V>) -> Self {
        Self::ArgList(values)
    }
}
