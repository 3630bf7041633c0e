use std::sync::OnceLock;
use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Ensures that the `tracing` stack is only initialised once using `OnceLock`
pub fn init_test_tracing() {
    static TRACING: OnceLock<()> = OnceLock::new();
    TRACING.get_or_init(|| {
        let default_filter_level = "info".to_string();

        if std::env::var("TEST_LOG").is_ok_and(|x| x.to_lowercase().contains("true")) {
            let subscriber = get_subscriber(default_filter_level, std::io::stdout);
            init_tracing_with_subscriber(subscriber);
        } else {
            let subscriber = get_subscriber(default_filter_level, std::io::sink);
            init_tracing_with_subscriber(subscriber);
        }
    });
}

/// Compose multiple layers into a `tracing`'s subscriber.
/// set level via env variable "RUST_LOG"
pub fn get_subscriber<Sink>(env_filter: String, sink: Sink) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    // layer to output to i.e stout
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(sink)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
}

/// Register a subscriber as global default to process span data.
///
/// It should only be called once!
pub fn init_tracing_with_subscriber(subscriber: impl Subscriber + Send + Sync) {
    // Redirect all `log`'s events to subscriber
    LogTracer::init().expect("Failed to set logger");
    // `set_global_default` can be used by applications to specify what subscriber should be used to process spans.
    set_global_default(subscriber).expect("Failed to set subscriber");
}
