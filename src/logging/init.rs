use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};
use super::{LogConfig, LOG_TARGET};
/// Default filter directive when `RUST_LOG` is not set.
#[must_use]
pub fn default_filter(config: &LogConfig) -> String {
    format!("{LOG_TARGET}={}", config.log_level)
}
/// Install the global tracing subscriber. Console fallback events and the
/// crate's own breadcrumbs go to stderr, human-readable or JSON.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));
    if config.json_format {
        let json_layer = fmt::layer()
            .json().with_writer(std::io::stderr).with_span_events(FmtSpan::CLOSE)
            .with_current_span(true).with_target(true).with_filter(env_filter);
        tracing_subscriber::registry()
            .with(json_layer).with(ErrorLayer::default()).try_init()?;
    } else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr).with_span_events(FmtSpan::CLOSE)
            .with_target(true).with_ansi(true).with_filter(env_filter);
        tracing_subscriber::registry()
            .with(stderr_layer).with(ErrorLayer::default()).try_init()?;
    }
    Ok(())
}
