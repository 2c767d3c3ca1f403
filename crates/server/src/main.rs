//! Onboarding agent CLI driver
//!
//! Plays one conversation over stdin. Each line is a user message, except:
//! - `> text`  a generated reply from the external generator
//! - `#N`      select quick reply N (1-based) of the current phase
//! - `/snapshot` print the session checkpoint as JSON
//!
//! An optional first argument names a snapshot file to resume from.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use onboarding_agent::{build_prompt_fragment, get_quick_replies, strip_directives, OnboardingEngine};
use onboarding_config::{load_settings, Settings};
use onboarding_core::{event_types, AnalyticsEvent, Phase, SessionSnapshot};
use onboarding_server::{
    init_metrics, init_tracing, FanoutSink, MetricsSink, ServerError, SessionManager, TracingSink,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("ONBOARDING_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = env.as_deref().unwrap_or("default"),
        "Starting onboarding agent"
    );

    if let Err(e) = init_metrics(&config) {
        tracing::warn!(error = %e, "Metrics exporter disabled");
    }

    let sink = FanoutSink::new()
        .with(Arc::new(TracingSink))
        .with(Arc::new(MetricsSink));
    let manager = Arc::new(SessionManager::new(
        OnboardingEngine::new(config.detectors.clone()),
        config.session.clone(),
        Arc::new(sink),
    ));
    let cleanup = manager.start_cleanup_task();

    let id = match std::env::args().nth(1) {
        Some(path) => manager.restore(read_snapshot(&path).await?)?,
        None => manager.create()?,
    };
    println!("session {}", id);

    let mut last_phase = None;
    show_phase(&manager, &id, &mut last_phase);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "/snapshot" {
            if let Some(snapshot) = manager.snapshot(&id) {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            continue;
        }

        let events = if let Some(reply) = line.strip_prefix('>') {
            let outcome = manager.process_assistant_response(&id, reply.trim())?;
            if outcome.pii_blocked {
                println!("assistant reply blocked: requests contact details");
            } else {
                println!("assistant: {}", strip_directives(reply));
            }
            outcome.events
        } else if let Some(choice) = line.strip_prefix('#') {
            match choice.trim().parse::<usize>() {
                Ok(n) if n > 0 => match manager.record_quick_reply(&id, n - 1) {
                    Ok(events) => events,
                    Err(ServerError::InvalidRequest(msg)) => {
                        println!("{}", msg);
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                },
                _ => {
                    println!("usage: #N with N starting at 1");
                    continue;
                }
            }
        } else {
            manager.process_user_input(&id, line)?
        };

        print_events(&events);
        show_phase(&manager, &id, &mut last_phase);
    }

    if let Some(snapshot) = manager.snapshot(&id) {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    let _ = cleanup.send(true);
    tracing::info!("Conversation ended");
    Ok(())
}

async fn read_snapshot(path: &str) -> Result<SessionSnapshot, ServerError> {
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw)
        .map_err(|e| ServerError::InvalidRequest(format!("Bad snapshot {}: {}", path, e)))
}

fn print_events(events: &[AnalyticsEvent]) {
    if events.is_empty() {
        return;
    }
    let names: Vec<&str> = event_types(events).iter().map(|e| e.as_str()).collect();
    println!("events: {}", names.join(", "));
}

/// Print the phase and quick replies; the prompt fragment only when the phase changed
fn show_phase(manager: &SessionManager, id: &str, last_phase: &mut Option<Phase>) {
    let Some((phase, fragment)) =
        manager.view(id, |s| (s.phase(), build_prompt_fragment(s.phase(), s.memory())))
    else {
        return;
    };

    println!("[{} {}]", phase.code(), phase.label());
    for (i, reply) in get_quick_replies(phase).iter().enumerate() {
        println!("  #{} {}", i + 1, reply.label);
    }
    if *last_phase != Some(phase) {
        println!("--- prompt ---\n{}--------------", fragment);
        *last_phase = Some(phase);
    }
}
