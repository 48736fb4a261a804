use crate::config::Config;
use crate::error::{Error, GatewayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum OutputMode {
    PlainText,
    /// Ask the endpoint to constrain its output to `schema`.
    StructuredJson { schema: JsonValue },
}

impl OutputMode {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputMode::PlainText => "text/plain",
            OutputMode::StructuredJson { .. } => "application/json",
        }
    }

    fn schema(&self) -> Option<&JsonValue> {
        match self {
            OutputMode::PlainText => None,
            OutputMode::StructuredJson { schema } => Some(schema),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(JsonValue),
}

impl Payload {
    pub fn into_text(self) -> String {
        match self {
            Payload::Text(text) => text,
            Payload::Json(value) => value.to_string(),
        }
    }

    pub fn into_json(self) -> std::result::Result<JsonValue, GatewayError> {
        match self {
            Payload::Json(value) => Ok(value),
            Payload::Text(text) => {
                serde_json::from_str(&text).map_err(|e| GatewayError::InvalidJson(e.to_string()))
            }
        }
    }
}

/// The one seam every feature uses to reach the model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Sends one prompt. Never panics; every failure is a [`GatewayError`].
    async fn invoke(
        &self,
        prompt: &str,
        mode: &OutputMode,
    ) -> std::result::Result<Payload, GatewayError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a JsonValue>,
}

fn request_body<'a>(prompt: &'a str, mode: &'a OutputMode) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: mode.mime_type(),
            response_schema: mode.schema(),
        },
    }
}

/// Turns an HTTP status and (possibly unparseable) body into a payload.
pub fn interpret_response(
    status: u16,
    body: Option<JsonValue>,
    mode: &OutputMode,
) -> std::result::Result<Payload, GatewayError> {
    let success = (200..300).contains(&status);
    let Some(body) = body else {
        return Err(if success {
            GatewayError::MalformedResponse
        } else {
            GatewayError::Network(format!("HTTP status {}", status))
        });
    };

    if let Some(err) = body.get("error") {
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");
        return Err(GatewayError::Remote(message.to_string()));
    }
    if !success {
        return Err(GatewayError::Network(format!("HTTP status {}", status)));
    }

    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(|t| t.as_str())
        .ok_or(GatewayError::MalformedResponse)?;

    match mode {
        OutputMode::PlainText => Ok(Payload::Text(text.to_string())),
        OutputMode::StructuredJson { .. } => serde_json::from_str(text)
            .map(Payload::Json)
            .map_err(|e| GatewayError::InvalidJson(e.to_string())),
    }
}

/// `AiGateway` over the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GeminiGateway {
    pub fn new(api_key: String, client: Client, base_url: &Url, model: &str) -> Result<Self> {
        let raw = format!(
            "{}/models/{}:generateContent",
            base_url.as_str().trim_end_matches('/'),
            model
        );
        let endpoint = Url::parse(&raw)
            .map_err(|e| Error::Config(format!("Invalid Gemini endpoint {}: {}", raw, e)))?;
        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    pub fn from_config(config: &Config, client: Client) -> Result<Self> {
        Self::new(
            config.gemini_api_key.clone(),
            client,
            &config.gemini_base_url,
            &config.gemini_model,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    async fn invoke(
        &self,
        prompt: &str,
        mode: &OutputMode,
    ) -> std::result::Result<Payload, GatewayError> {
        tracing::debug!(
            mime = mode.mime_type(),
            prompt_chars = prompt.chars().count(),
            "Sending request to Gemini"
        );

        let res = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(prompt, mode))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini request failed");
                GatewayError::Network(e.to_string())
            })?;

        let status = res.status().as_u16();
        let text = res
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        let body = serde_json::from_str::<JsonValue>(&text).ok();

        let result = interpret_response(status, body, mode);
        if let Err(e) = &result {
            tracing::error!(status, error = %e, "Gemini returned no usable payload");
        }
        result
    }
}
