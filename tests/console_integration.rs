//! Integration tests for the terminal chat loop.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use iassist::ai::{CompletionClient, Role};
use iassist::chat::{ChatSettings, Orchestrator};
use iassist::config::CompletionConfig;
use iassist::knowledge::KnowledgeContext;

use common::{FakeService, PAIRING_FAQ};

fn orchestrator(service: &FakeService) -> Orchestrator {
    let config = CompletionConfig {
        base_url: Some(service.openai_base_url()),
        ..CompletionConfig::default()
    };
    let client = CompletionClient::with_api_key(config, "sk-test".to_string()).unwrap();
    let knowledge = KnowledgeContext::parse_str(PAIRING_FAQ).unwrap();
    Orchestrator::new(Arc::new(knowledge), Arc::new(client), ChatSettings::default())
}

#[tokio::test]
async fn test_console_chat_session() {
    let service = FakeService::openai_reply("Use Bluetooth settings.").await;
    let orchestrator = orchestrator(&service);
    let input: &[u8] = b"How do I pair my phone?\n\n   \nAnd again?\n";
    let mut out = Vec::new();

    let session = iassist::console::run(&orchestrator, input, &mut out)
        .await
        .unwrap();

    let turns = session.transcript().turns();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[3].content, "Use Bluetooth settings.");
    // Blank lines issued no requests.
    assert_eq!(service.requests().len(), 2);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("knowledge entries=1"));
    assert!(printed.contains("Use Bluetooth settings."));
}

#[tokio::test]
async fn test_console_reset_and_quit() {
    let service = FakeService::openai_reply("ok").await;
    let orchestrator = orchestrator(&service);
    let input: &[u8] = b"first\n/reset\nsecond\n/quit\nnever sent\n";
    let mut out = Vec::new();

    let session = iassist::console::run(&orchestrator, input, &mut out)
        .await
        .unwrap();

    assert_eq!(session.transcript().len(), 2);
    assert_eq!(session.transcript().turns()[0].content, "second");
    assert_eq!(service.requests().len(), 2);
    assert!(String::from_utf8(out).unwrap().contains("Chat history cleared."));
}

#[tokio::test]
async fn test_console_shows_alert_on_failure() {
    let service = FakeService::start(
        StatusCode::TOO_MANY_REQUESTS,
        serde_json::json!({ "error": "slow down" }),
    )
    .await;
    let orchestrator = orchestrator(&service);
    let input: &[u8] = b"hello\n";
    let mut out = Vec::new();

    let session = iassist::console::run(&orchestrator, input, &mut out)
        .await
        .unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("[ALERT]"));
    assert!(printed.contains("An API error occurred: Rate limit exceeded"));
    assert!(session.transcript().turns()[1].is_error());
}
