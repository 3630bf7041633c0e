use std::future::Future;

/// Trait defining the transformation logic between input and output data types.
/// The returned future must be Send so the bounded batch operation can run
/// many applications as concurrent tasks.
pub trait Transformation<I, O>: Clone {
    /// Transforms input data of type I to output data of type O.
    /// A failed transformation surfaces its error to the caller unchanged.
    fn apply(&mut self, input: I) -> impl Future<Output = anyhow::Result<O>> + Send;
}

/// Blocking counterpart of [`Transformation`] for callers without a runtime.
/// Used by the sequential transformer only.
pub trait SyncTransformation<I, O>: Clone {
    /// Transforms input data of type I to output data of type O.
    fn apply(&mut self, input: I) -> anyhow::Result<O>;
}
