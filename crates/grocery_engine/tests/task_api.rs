use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use grocery_core::TaskStatus;
use grocery_engine::{
    FailureKind, LogProgressSink, PollError, PollSettings, ReqwestTaskApi, TaskApi,
    TaskApiSettings, TaskHandle, TaskPoller, TaskSpec,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Hands out one canned response per request, then repeats the fallback.
struct Sequence {
    responses: Mutex<VecDeque<ResponseTemplate>>,
    fallback: ResponseTemplate,
}

impl Sequence {
    fn statuses(statuses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(statuses.iter().map(|s| status_body(s)).collect()),
            fallback: status_body("pending"),
        }
    }

    fn of(responses: Vec<ResponseTemplate>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback: status_body("pending"),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

fn status_body(status: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "id": "t-1", "status": status }))
}

fn api_for(server: &MockServer) -> ReqwestTaskApi {
    ReqwestTaskApi::new(TaskApiSettings {
        base_url: format!("{}/v1", server.uri()),
        api_key: Some("secret".to_string()),
        ..TaskApiSettings::default()
    })
    .expect("client builds")
}

fn fast(max_attempts: u32) -> PollSettings {
    PollSettings {
        max_attempts,
        interval: Duration::ZERO,
    }
}

#[tokio::test]
async fn create_sends_spec_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .and(header("authorization", "Bearer secret"))
        .and(body_partial_json(json!({
            "name": "Fetch Notion Grocery List",
            "type": "data_fetch",
            "source": "notion",
            "priority": "high",
            "timeout": 300,
            "parameters": { "database_id": "db-1" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "t-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let handle = api
        .create_task(&TaskSpec::notion_grocery_fetch("db-1", "token"))
        .await
        .expect("created");
    assert_eq!(handle.id(), "t-1");
}

#[tokio::test]
async fn numeric_task_ids_are_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42 })))
        .mount(&server)
        .await;

    let handle = api_for(&server)
        .create_task(&TaskSpec::notion_grocery_fetch("db", "tok"))
        .await
        .expect("created");
    assert_eq!(handle, TaskHandle::new("42"));
}

#[tokio::test]
async fn creation_without_id_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .create_task(&TaskSpec::notion_grocery_fetch("db", "tok"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::MissingField("id"));
}

#[tokio::test]
async fn non_success_creation_never_polls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(status_body("completed"))
        .expect(0)
        .mount(&server)
        .await;

    let poller = TaskPoller::new(api_for(&server), fast(3));
    let err = poller
        .run(&TaskSpec::notion_grocery_fetch("db", "tok"), &LogProgressSink)
        .await
        .unwrap_err();

    match err {
        PollError::CreationFailed(api_err) => {
            assert_eq!(api_err.kind, FailureKind::HttpStatus(401));
            assert_eq!(api_err.message, "bad key");
        }
        other => panic!("expected creation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn polls_over_http_until_completed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-1"))
        .respond_with(Sequence::statuses(&["pending", "processing", "completed"]))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-1/result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["milk", "eggs"])))
        .expect(1)
        .mount(&server)
        .await;

    let poller = TaskPoller::new(api_for(&server), fast(3));
    let result = poller
        .poll_until_done(&TaskHandle::new("t-1"), &LogProgressSink)
        .await
        .expect("completed");
    assert_eq!(result, json!(["milk", "eggs"]));
}

#[tokio::test]
async fn server_error_on_status_is_retried_by_the_loop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-1"))
        .respond_with(Sequence::of(vec![
            ResponseTemplate::new(503),
            ResponseTemplate::new(200).set_body_string("not json"),
            status_body("completed"),
        ]))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-1/result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let poller = TaskPoller::new(api_for(&server), fast(5));
    poller
        .poll_until_done(&TaskHandle::new("t-1"), &LogProgressSink)
        .await
        .expect("recovers after failed queries");
}

#[tokio::test]
async fn failed_task_over_http_skips_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-1"))
        .respond_with(Sequence::statuses(&["running", "failed"]))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-1/result"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let poller = TaskPoller::new(api_for(&server), fast(5));
    let err = poller
        .poll_until_done(&TaskHandle::new("t-1"), &LogProgressSink)
        .await
        .unwrap_err();
    match err {
        PollError::TaskFailed { details, .. } => assert_eq!(details["status"], "failed"),
        other => panic!("expected task failure, got {other:?}"),
    }
}

#[tokio::test]
async fn status_without_field_is_reported_as_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "t-9" })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .task_status(&TaskHandle::new("t-9"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::MissingField("status"));
}

#[tokio::test]
async fn unknown_status_strings_are_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-2"))
        .respond_with(status_body("paused"))
        .mount(&server)
        .await;

    let snapshot = api_for(&server)
        .task_status(&TaskHandle::new("t-2"))
        .await
        .expect("status read");
    assert_eq!(snapshot.status, TaskStatus::Unrecognized("paused".to_string()));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestTaskApi::new(TaskApiSettings {
        base_url: "not a url".to_string(),
        ..TaskApiSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
