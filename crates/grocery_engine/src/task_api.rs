use std::time::Duration;

use grocery_core::TaskStatus;
use grocery_logging::grocery_debug;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use serde_json::Value;

use crate::http::{
    build_client, endpoint, map_reqwest_error, parse_base_url, read_json, secret_header,
};
use crate::{ApiError, FailureKind, TaskHandle, TaskSnapshot, TaskSpec};

#[derive(Debug, Clone)]
pub struct TaskApiSettings {
    pub base_url: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TaskApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.manus.ai/v1".to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The three calls the poller needs from a remote task service.
#[async_trait::async_trait]
pub trait TaskApi: Send + Sync {
    async fn create_task(&self, spec: &TaskSpec) -> Result<TaskHandle, ApiError>;

    async fn task_status(&self, task: &TaskHandle) -> Result<TaskSnapshot, ApiError>;

    /// Only meaningful once the task has reported `completed`.
    async fn task_result(&self, task: &TaskHandle) -> Result<Value, ApiError>;
}

/// `TaskApi` over HTTP: `POST /tasks`, `GET /tasks/{id}`, `GET /tasks/{id}/result`.
#[derive(Debug, Clone)]
pub struct ReqwestTaskApi {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl ReqwestTaskApi {
    pub fn new(settings: TaskApiSettings) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let mut headers = HeaderMap::new();
        if let Some(key) = settings.api_key.as_deref().filter(|key| !key.is_empty()) {
            headers.insert(AUTHORIZATION, secret_header(format!("Bearer {key}"))?);
        }
        let client = build_client(settings.connect_timeout, settings.request_timeout, headers)?;
        Ok(Self { client, base_url })
    }
}

#[async_trait::async_trait]
impl TaskApi for ReqwestTaskApi {
    async fn create_task(&self, spec: &TaskSpec) -> Result<TaskHandle, ApiError> {
        let url = endpoint(&self.base_url, &["tasks"])?;
        grocery_debug!("POST {} name={:?}", url, spec.name);
        let response = self
            .client
            .post(url)
            .json(spec)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = read_json(response).await?;
        task_id(&body)
            .ok_or_else(|| ApiError::new(FailureKind::MissingField("id"), body.to_string()))
    }

    async fn task_status(&self, task: &TaskHandle) -> Result<TaskSnapshot, ApiError> {
        let url = endpoint(&self.base_url, &["tasks", task.id()])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body = read_json(response).await?;
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(TaskStatus::from)
            .ok_or_else(|| ApiError::new(FailureKind::MissingField("status"), body.to_string()))?;
        Ok(TaskSnapshot { status, body })
    }

    async fn task_result(&self, task: &TaskHandle) -> Result<Value, ApiError> {
        let url = endpoint(&self.base_url, &["tasks", task.id(), "result"])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

fn task_id(body: &Value) -> Option<TaskHandle> {
    match body.get("id")? {
        Value::String(id) if !id.is_empty() => Some(TaskHandle::new(id.clone())),
        Value::Number(id) => Some(TaskHandle::new(id.to_string())),
        _ => None,
    }
}
