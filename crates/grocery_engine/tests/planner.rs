use grocery_engine::{FailureKind, PlannerSettings, ShoppingPlanner};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn planner_for(server: &MockServer) -> ShoppingPlanner {
    ShoppingPlanner::new(PlannerSettings {
        base_url: format!("{}/v1", server.uri()),
        api_key: Some("plan-key".to_string()),
        ..PlannerSettings::default()
    })
    .expect("planner builds")
}

#[tokio::test]
async fn connection_check_requires_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer plan-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    planner_for(&server).check_connection().await.expect("reachable");
}

#[tokio::test]
async fn connection_check_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = planner_for(&server).check_connection().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(403));
}

#[tokio::test]
async fn plan_returns_first_choice_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4", "max_tokens": 1000 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "{\"search_strategy\": []}" } }
            ],
            "usage": { "total_tokens": 12 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let plan = planner_for(&server)
        .plan(&["Milk".to_string(), "Eggs".to_string()])
        .await
        .expect("plan");
    assert_eq!(plan.content, "{\"search_strategy\": []}");
    assert_eq!(plan.usage["total_tokens"], 12);
}

#[tokio::test]
async fn plan_without_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = planner_for(&server).plan(&[]).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MissingField("choices"));
}
