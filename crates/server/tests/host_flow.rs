//! Host-level flow: session manager feeding a broadcast subscriber

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use onboarding_agent::OnboardingEngine;
use onboarding_config::SessionConfig;
use onboarding_core::{EventType, Phase};
use onboarding_server::{BroadcastSink, FanoutSink, MetricsSink, SessionManager};

#[tokio::test]
async fn test_subscriber_sees_whole_conversation() {
    let broadcast = Arc::new(BroadcastSink::new(64));
    let mut rx = broadcast.subscribe();
    let sink = FanoutSink::new()
        .with(broadcast.clone())
        .with(Arc::new(MetricsSink));
    let manager = SessionManager::new(
        OnboardingEngine::default(),
        SessionConfig::default(),
        Arc::new(sink),
    );

    let id = manager.create().unwrap();
    manager.process_user_input(&id, "Hi, I need help with SOC 2").unwrap();
    let outcome = manager
        .process_assistant_response(&id, "Let me show you how this works")
        .unwrap();
    assert!(!outcome.pii_blocked);
    assert_eq!(manager.view(&id, |s| s.phase()), Some(Phase::Demo));

    let mut seen = Vec::new();
    while let Ok(Ok(event)) = timeout(Duration::from_millis(50), rx.recv()).await {
        assert_eq!(event.session_id, id);
        seen.push(event.event_type);
    }

    assert_eq!(seen.first(), Some(&EventType::SessionStarted));
    assert!(seen.contains(&EventType::GreetingCompleted));
    assert_eq!(seen.last(), Some(&EventType::DemoInitiated));
}

#[tokio::test]
async fn test_blocked_reply_reaches_subscribers() {
    let broadcast = Arc::new(BroadcastSink::new(16));
    let manager = SessionManager::new(
        OnboardingEngine::default(),
        SessionConfig::default(),
        broadcast.clone(),
    );
    let id = manager.create().unwrap();
    let mut rx = broadcast.subscribe();

    let outcome = manager
        .process_assistant_response(&id, "Before we start, what is your email address?")
        .unwrap();
    assert!(outcome.pii_blocked);

    let event = timeout(Duration::from_millis(50), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.event_type, EventType::PiiRequestBlocked);
    assert_eq!(manager.view(&id, |s| s.phase()), Some(Phase::Welcome));
}
