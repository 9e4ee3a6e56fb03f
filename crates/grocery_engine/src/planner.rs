use std::time::Duration;

use grocery_logging::grocery_info;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{
    build_client, endpoint, map_reqwest_error, parse_base_url, secret_header, success_or_status,
};
use crate::{ApiError, FailureKind};

const SYSTEM_PROMPT: &str = "You are a shopping optimization expert for Instacart";

#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.dedalus.ai/v1".to_string(),
            api_key: None,
            model: "gpt-4".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingPlan {
    pub content: String,
    /// Token accounting as reported by the service; `Null` when absent.
    pub usage: Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Value,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Chat-completion client that asks for a shopping strategy.
#[derive(Debug, Clone)]
pub struct ShoppingPlanner {
    client: reqwest::Client,
    base_url: reqwest::Url,
    settings: PlannerSettings,
}

impl ShoppingPlanner {
    pub fn new(settings: PlannerSettings) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let key = settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::new(FailureKind::InvalidRequest, "no planner api key"))?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, secret_header(format!("Bearer {key}"))?);
        let client = build_client(settings.connect_timeout, settings.request_timeout, headers)?;
        Ok(Self {
            client,
            base_url,
            settings,
        })
    }

    /// Probes `GET /models`; only a plain 200 counts as reachable.
    pub async fn check_connection(&self) -> Result<(), ApiError> {
        let url = endpoint(&self.base_url, &["models"])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }

    pub async fn plan(&self, items: &[String]) -> Result<ShoppingPlan, ApiError> {
        let url = endpoint(&self.base_url, &["chat", "completions"])?;
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: plan_prompt(items),
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let parsed: ChatResponse = success_or_status(response)
            .await?
            .json()
            .await
            .map_err(map_reqwest_error)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ApiError::new(FailureKind::MissingField("choices"), "empty"))?;
        grocery_info!("shopping plan received ({} chars)", content.len());
        Ok(ShoppingPlan {
            content,
            usage: parsed.usage,
        })
    }
}

fn plan_prompt(items: &[String]) -> String {
    format!(
        "Create an optimized shopping plan for Instacart with these items: {}\n\n\
         Provide:\n\
         1. Search strategy for each item\n\
         2. Price optimization tips\n\
         3. Cart management strategy\n\
         4. Checkout optimization\n\n\
         Format as JSON with sections: search_strategy, price_tips, cart_management, checkout_flow",
        items.join(", ")
    )
}
