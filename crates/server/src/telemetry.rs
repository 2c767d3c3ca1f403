//! Tracing and metrics initialisation

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use onboarding_config::Settings;

use crate::sink::MetricsSink;
use crate::ServerError;

/// Install the global subscriber; `RUST_LOG` wins over the configured level
pub fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.observability.log_level.to_ascii_lowercase();
        format!("onboarding={}", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}

/// Install the Prometheus exporter when a port is configured
///
/// Returns whether an exporter was installed. Without one, counters are
/// recorded into the no-op recorder.
pub fn init_metrics(config: &Settings) -> Result<bool, ServerError> {
    let Some(port) = config.observability.metrics_port else {
        return Ok(false);
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;

    metrics::describe_counter!(
        MetricsSink::EVENTS_TOTAL,
        "Onboarding analytics events by event_type"
    );
    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(true)
}
