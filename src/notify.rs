use std::future::Future;
use tracing::info;

/// Trait which defines how progress messages of a transformer are delivered.
/// Notifications are side effects only and never influence transformation
/// results; the transformer awaits each notification before proceeding so
/// message order stays deterministic relative to chunk starts.
pub trait Notifier: Clone {
    /// Delivers one human-readable progress message.
    fn notify(&self, message: &str) -> impl Future<Output = ()> + Send;
}

/// Blocking counterpart of [`Notifier`] for the sequential transformer.
pub trait SyncNotifier: Clone {
    /// Delivers one human-readable progress message.
    fn notify(&self, message: &str);
}

/// Default notifier, discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    async fn notify(&self, _message: &str) {}
}

impl SyncNotifier for NoopNotifier {
    fn notify(&self, _message: &str) {}
}

/// Notifier which forwards progress messages to the tracing stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    async fn notify(&self, message: &str) {
        info!("{}", message);
    }
}

impl SyncNotifier for TracingNotifier {
    fn notify(&self, message: &str) {
        info!("{}", message);
    }
}
