//! Onboarding Server
//!
//! Host-side pieces around the onboarding engine: the session store, the
//! analytics sinks, and observability setup shared by the binaries.

pub mod session;
pub mod sink;
pub mod telemetry;

pub use session::SessionManager;
pub use sink::{AnalyticsSink, BroadcastSink, FanoutSink, MetricsSink, TracingSink};
pub use telemetry::{init_metrics, init_tracing};

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Onboarding(#[from] onboarding_core::OnboardingError),

    #[error("Configuration error: {0}")]
    Config(#[from] onboarding_config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics error: {0}")]
    Metrics(String),
}
