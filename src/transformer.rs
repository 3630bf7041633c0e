use crate::notify::{Notifier, NoopNotifier, SyncNotifier};
use crate::transformation::{SyncTransformation, Transformation};
use futures_util::future::join_all;
use std::marker::PhantomData;
use tracing::info;

/// Applies a suspending transformation to a single input, to a batch one
/// element at a time, or to a batch with bounded concurrency.
///
/// The transformer is configured once with a transformation and an optional
/// notifier and can then be invoked any number of times; it keeps no state
/// between invocations, so independent calls may run concurrently on the
/// same instance.
pub struct AsyncTransformer<I, O, T, N = NoopNotifier>
where
    T: Transformation<I, O>,
    N: Notifier,
{
    transformation: T,
    notifier: N,
    _marker_i: PhantomData<I>,
    _marker_o: PhantomData<O>,
}

impl<I, O, T> AsyncTransformer<I, O, T, NoopNotifier>
where
    T: Transformation<I, O>,
{
    /// Creates a transformer which discards progress messages.
    pub fn new(transformation: T) -> Self {
        AsyncTransformer {
            transformation,
            notifier: NoopNotifier,
            _marker_i: PhantomData,
            _marker_o: PhantomData,
        }
    }
}

impl<I, O, T, N> AsyncTransformer<I, O, T, N>
where
    T: Transformation<I, O>,
    N: Notifier,
{
    /// Creates a transformer which reports progress to the given notifier.
    pub fn with_notifier(transformation: T, notifier: N) -> Self {
        AsyncTransformer {
            transformation,
            notifier,
            _marker_i: PhantomData,
            _marker_o: PhantomData,
        }
    }

    /// Transforms a single input into its output.
    #[tracing::instrument(skip_all)]
    pub async fn transform_single(&self, input: I) -> anyhow::Result<O> {
        self.notifier.notify("Transforming single input...").await;

        let mut transformation = self.transformation.clone();
        let output = transformation.apply(input).await?;

        self.notifier.notify("Transformed successfully").await;

        Ok(output)
    }

    /// Transforms every input in order, one element at a time, and returns
    /// the outputs in matching positions. The first failing element fails the
    /// whole operation; elements after it are never attempted.
    #[tracing::instrument(skip_all)]
    pub async fn transform_linearly(&self, inputs: Vec<I>) -> anyhow::Result<Vec<O>> {
        if inputs.is_empty() {
            self.notifier.notify("No items to transform").await;
            return Ok(Vec::new());
        }

        self.notifier
            .notify(&format!("Transforming {} input items...", inputs.len()))
            .await;

        let mut transformation = self.transformation.clone();
        let mut output = Vec::with_capacity(inputs.len());
        for input in inputs {
            output.push(transformation.apply(input).await?);
        }

        self.notifier
            .notify(&format!(
                "Successfully transformed {} input items into output items",
                output.len()
            ))
            .await;

        Ok(output)
    }

    /// Transforms every input with bounded concurrency and returns the
    /// outputs ordered by input position.
    ///
    /// Inputs are partitioned by position into consecutive chunks of
    /// `throttle` elements; without a positive throttle one chunk spans the
    /// whole batch. All transformations of a chunk run concurrently as
    /// spawned tasks, and the next chunk starts only after every task of the
    /// current chunk has resolved, so at most `throttle` transformations are
    /// in flight at any instant. A failing task lets its chunk siblings run
    /// to completion, prevents all later chunks and surfaces its error to
    /// the caller instead of the partial output.
    #[tracing::instrument(skip_all)]
    pub async fn transform_parallel(
        &self,
        inputs: Vec<I>,
        throttle: Option<u32>,
    ) -> anyhow::Result<Vec<O>>
    where
        T: Send + 'static,
        I: Send + 'static,
        O: Send + 'static,
    {
        if inputs.is_empty() {
            self.notifier.notify("No items to transform").await;
            return Ok(Vec::new());
        }

        let limit = match throttle {
            Some(limit) if limit > 0 => format!("limit {}", limit),
            _ => "no limit".to_string(),
        };
        self.notifier
            .notify(&format!(
                "Transforming {} input items with {}...",
                inputs.len(),
                limit
            ))
            .await;

        let chunk_size = match throttle {
            Some(throttle) if throttle > 0 => throttle as usize,
            _ => inputs.len(),
        };

        let mut output: Vec<O> = Vec::with_capacity(inputs.len());
        let mut remaining = inputs.into_iter();
        let mut chunk_number: u32 = 0;

        loop {
            // chunk boundaries depend on position only, never on timing
            let chunk: Vec<I> = remaining.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            chunk_number += 1;
            self.notifier
                .notify(&format!("Executing chunk {}...", chunk_number))
                .await;

            let mut tasks = Vec::with_capacity(chunk.len());
            for input in chunk {
                let mut transformation = self.transformation.clone();
                tasks.push(tokio::spawn(
                    async move { transformation.apply(input).await },
                ));
            }

            // join_all is the chunk barrier: it waits for every sibling even
            // when one of them fails, and hands results back in spawn order,
            // which is input order within the chunk. A panicked task surfaces
            // as its JoinError.
            for joined in join_all(tasks).await {
                output.push(joined??);
            }
        }

        info!(
            "transformed {} items in {} chunks",
            output.len(),
            chunk_number
        );
        self.notifier
            .notify(&format!(
                "Successfully transformed {} input items into output items",
                output.len()
            ))
            .await;

        Ok(output)
    }
}

/// Applies a blocking transformation to a single input or to a batch one
/// element at a time. Counterpart of [`AsyncTransformer`] for callers
/// without a runtime; batches are always processed linearly.
pub struct SyncTransformer<I, O, T, N = NoopNotifier>
where
    T: SyncTransformation<I, O>,
    N: SyncNotifier,
{
    transformation: T,
    notifier: N,
    _marker_i: PhantomData<I>,
    _marker_o: PhantomData<O>,
}

impl<I, O, T> SyncTransformer<I, O, T, NoopNotifier>
where
    T: SyncTransformation<I, O>,
{
    /// Creates a transformer which discards progress messages.
    pub fn new(transformation: T) -> Self {
        SyncTransformer {
            transformation,
            notifier: NoopNotifier,
            _marker_i: PhantomData,
            _marker_o: PhantomData,
        }
    }
}

impl<I, O, T, N> SyncTransformer<I, O, T, N>
where
    T: SyncTransformation<I, O>,
    N: SyncNotifier,
{
    /// Creates a transformer which reports progress to the given notifier.
    pub fn with_notifier(transformation: T, notifier: N) -> Self {
        SyncTransformer {
            transformation,
            notifier,
            _marker_i: PhantomData,
            _marker_o: PhantomData,
        }
    }

    /// Transforms a single input into its output.
    #[tracing::instrument(skip_all)]
    pub fn transform_single(&self, input: I) -> anyhow::Result<O> {
        self.notifier.notify("Transforming single input...");

        let mut transformation = self.transformation.clone();
        let output = transformation.apply(input)?;

        self.notifier.notify("Transformed successfully");

        Ok(output)
    }

    /// Transforms every input in order, one element at a time, and returns
    /// the outputs in matching positions. The first failing element fails the
    /// whole operation; elements after it are never attempted.
    #[tracing::instrument(skip_all)]
    pub fn transform_linearly(&self, inputs: Vec<I>) -> anyhow::Result<Vec<O>> {
        if inputs.is_empty() {
            self.notifier.notify("No items to transform");
            return Ok(Vec::new());
        }

        self.notifier
            .notify(&format!("Transforming {} input items...", inputs.len()));

        let mut transformation = self.transformation.clone();
        let mut output = Vec::with_capacity(inputs.len());
        for input in inputs {
            output.push(transformation.apply(input)?);
        }

        self.notifier.notify(&format!(
            "Successfully transformed {} input items into output items",
            output.len()
        ));

        Ok(output)
    }
}
