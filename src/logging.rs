use tracing_subscriber::filter::EnvFilter;

/// Directive used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Initialize stderr logging with JSON format.
///
/// Filtering follows `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVE`].
/// Installing a subscriber twice is harmless; the second call is ignored.
pub fn init_logging() {
    init_logging_with(DEFAULT_DIRECTIVE);
}

/// Like [`init_logging`], with a caller-chosen fallback directive.
pub fn init_logging_with(default_directive: &str) {
    let env_filter = env_filter(default_directive);
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .json()
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub(crate) fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}
