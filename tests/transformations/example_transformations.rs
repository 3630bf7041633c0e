#[cfg(test)]
pub mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    use batch_transformer::domain::test::Order;
    use batch_transformer::notify::{Notifier, SyncNotifier};
    use batch_transformer::transformation::{SyncTransformation, Transformation};
    use tracing::trace;

    /// Formats a number as its decimal string, in both modes.
    #[derive(Clone)]
    pub struct NumberToString;

    impl Transformation<u32, String> for NumberToString {
        async fn apply(&mut self, n: u32) -> anyhow::Result<String> {
            Ok(n.to_string())
        }
    }

    impl SyncTransformation<u32, String> for NumberToString {
        fn apply(&mut self, n: u32) -> anyhow::Result<String> {
            Ok(n.to_string())
        }
    }

    /// Sleeps before formatting, for wall-clock assertions.
    #[derive(Clone)]
    pub struct DelayedNumberToString {
        pub delay: Duration,
    }

    impl Transformation<u32, String> for DelayedNumberToString {
        async fn apply(&mut self, n: u32) -> anyhow::Result<String> {
            tokio::time::sleep(self.delay).await;
            Ok(n.to_string())
        }
    }

    /// Error produced by the rejecting transformations below.
    #[derive(thiserror::Error, Debug, PartialEq, Eq)]
    #[error("input {0} was rejected")]
    pub struct RejectedInput(pub u32);

    /// Records every invocation and optionally rejects one configured value,
    /// to observe which elements were attempted.
    #[derive(Clone)]
    pub struct RecordingTransform {
        seen: Arc<Mutex<Vec<u32>>>,
        reject: Option<u32>,
    }

    impl RecordingTransform {
        pub fn new(reject: Option<u32>) -> Self {
            RecordingTransform {
                seen: Arc::new(Mutex::new(Vec::new())),
                reject,
            }
        }

        pub async fn seen_inputs(&self) -> Vec<u32> {
            self.seen.lock().await.clone()
        }
    }

    impl Transformation<u32, String> for RecordingTransform {
        async fn apply(&mut self, n: u32) -> anyhow::Result<String> {
            self.seen.lock().await.push(n);
            trace!("recorded input {}", n);
            if Some(n) == self.reject {
                return Err(RejectedInput(n).into());
            }
            Ok(n.to_string())
        }
    }

    /// Blocking counterpart of [`RecordingTransform`].
    #[derive(Clone)]
    pub struct SyncRecordingTransform {
        seen: Arc<std::sync::Mutex<Vec<u32>>>,
        reject: Option<u32>,
    }

    impl SyncRecordingTransform {
        pub fn new(reject: Option<u32>) -> Self {
            SyncRecordingTransform {
                seen: Arc::new(std::sync::Mutex::new(Vec::new())),
                reject,
            }
        }

        pub fn seen_inputs(&self) -> Vec<u32> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl SyncTransformation<u32, String> for SyncRecordingTransform {
        fn apply(&mut self, n: u32) -> anyhow::Result<String> {
            self.seen.lock().unwrap().push(n);
            if Some(n) == self.reject {
                return Err(RejectedInput(n).into());
            }
            Ok(n.to_string())
        }
    }

    /// Tracks how many transformations are in flight at once.
    #[derive(Clone)]
    pub struct ConcurrencyProbe {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl ConcurrencyProbe {
        pub fn new(delay: Duration) -> Self {
            ConcurrencyProbe {
                in_flight: Arc::new(AtomicUsize::new(0)),
                peak: Arc::new(AtomicUsize::new(0)),
                delay,
            }
        }

        pub fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    impl Transformation<u32, u32> for ConcurrencyProbe {
        async fn apply(&mut self, n: u32) -> anyhow::Result<u32> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(n)
        }
    }

    /// Builds a one-line summary of an [`Order`].
    #[derive(Clone)]
    pub struct OrderToSummary;

    impl Transformation<Order, String> for OrderToSummary {
        async fn apply(&mut self, order: Order) -> anyhow::Result<String> {
            Ok(summarize(&order))
        }
    }

    pub fn summarize(order: &Order) -> String {
        format!(
            "{} ordered {} units ({})",
            order.customer, order.quantity, order.id
        )
    }

    /// Notifier which collects every message for later assertions.
    #[derive(Clone)]
    pub struct RecordingNotifier {
        messages: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            RecordingNotifier {
                messages: Arc::new(std::sync::Mutex::new(Vec::new())),
            }
        }

        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    impl SyncNotifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }
}
