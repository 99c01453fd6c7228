//! Insights submission against a wiremock server

use cloud_client::Client;
use cloud_config::InsightsConfig;
use cloud_storage::Storage;
use cloud_user::{DataTypeRegistry, STAT_APP_OPENED, STAT_APP_OPENED_PUSH, Session};

use std::time::Duration;

use googletest::prelude::*;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const APP_ID: &str = "a1b2c3";

fn session_for(server: &MockServer, insights: InsightsConfig) -> Session {
    Session::with_insights(
        Client::new(&server.uri()),
        Storage::in_memory(),
        APP_ID,
        DataTypeRegistry::new(),
        Duration::from_secs(5),
        insights,
    )
}

async fn submitted_batches(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == "/insights")
        .map(|request| serde_json::from_slice::<Value>(&request.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_submit_posts_queued_stats_and_clears_queue() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/insights"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server, InsightsConfig::default());
    session.handle_push(json!({"title": "Hi", "additionalData": {"foreground": false}}));

    let sent = session.insights().submit().await.unwrap();

    assert_that!(sent, eq(2));
    assert_that!(session.insights().pending(), eq(0));
    let batches = submitted_batches(&server).await;
    let stats = batches[0]["insights"].as_array().unwrap();
    assert_eq!(stats[0]["app_id"], APP_ID);
    assert_eq!(stats[0]["stat"], STAT_APP_OPENED);
    assert_eq!(stats[0]["value"], 1);
    assert!(stats[0]["created"].as_str().unwrap().contains('T'));
    assert_eq!(stats[1]["stat"], STAT_APP_OPENED_PUSH);
}

#[tokio::test]
async fn test_rejected_submit_keeps_stats_for_next_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/insights"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/insights"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let session = session_for(&server, InsightsConfig::default());

    let error = session.insights().submit().await.unwrap_err();
    assert_that!(error.status(), some(eq(503)));
    assert_that!(session.insights().pending(), eq(1));

    session.resume();
    assert_that!(session.insights().submit().await.unwrap(), eq(2));
    assert_that!(session.insights().pending(), eq(0));
}

#[tokio::test]
async fn test_full_batch_is_submitted_in_background() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/insights"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let session = session_for(
        &server,
        InsightsConfig {
            submit_count: 2,
            ..InsightsConfig::default()
        },
    );
    session.resume();

    let mut batches = Vec::new();
    for _ in 0..50 {
        batches = submitted_batches(&server).await;
        if !batches.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert_that!(batches.len(), eq(1));
    assert_that!(batches[0]["insights"].as_array().unwrap().len(), eq(2));
    assert_that!(session.insights().pending(), eq(0));
}

#[tokio::test]
async fn test_disabled_insights_never_contact_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/insights"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let session = session_for(
        &server,
        InsightsConfig {
            enabled: false,
            ..InsightsConfig::default()
        },
    );
    session.resume();

    assert_that!(session.insights().submit().await.unwrap(), eq(0));
}
