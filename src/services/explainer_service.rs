use crate::error::{Error, GatewayError, Result};
use crate::models::explainer::{CodeExplainerState, CodeLanguage};
use crate::services::gateway::{AiGateway, OutputMode};
use std::sync::Arc;
use tokio::sync::Mutex;

struct ExplainerSlot {
    state: CodeExplainerState,
    latest_request: u64,
}

/// Owner of the code explainer state. Independent of the interview session.
pub struct CodeExplainer {
    gateway: Arc<dyn AiGateway>,
    slot: Mutex<ExplainerSlot>,
}

impl CodeExplainer {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self {
            gateway,
            slot: Mutex::new(ExplainerSlot {
                state: CodeExplainerState::default(),
                latest_request: 0,
            }),
        }
    }

    pub async fn snapshot(&self) -> CodeExplainerState {
        self.slot.lock().await.state.clone()
    }

    pub async fn explain_code(&self, code: &str, language: &str) -> Result<CodeExplainerState> {
        let language = match validate_input(code, language) {
            Ok(language) => language,
            Err(e) => {
                let mut slot = self.slot.lock().await;
                slot.state.error = Some(e.user_message());
                return Err(e);
            }
        };

        let request = {
            let mut slot = self.slot.lock().await;
            slot.latest_request += 1;
            slot.state = CodeExplainerState {
                code: code.to_string(),
                language,
                explanation: String::new(),
                error: None,
                pending: true,
            };
            slot.latest_request
        };
        tracing::info!(request, %language, code_chars = code.chars().count(), "Explaining code");

        let prompt = explain_prompt(code, language);
        let outcome = self
            .gateway
            .invoke(&prompt, &OutputMode::PlainText)
            .await
            .map(|payload| payload.into_text())
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(GatewayError::MalformedResponse)
                } else {
                    Ok(text)
                }
            })
            .map_err(Error::from);

        let mut slot = self.slot.lock().await;
        if slot.latest_request != request {
            tracing::warn!(request, latest = slot.latest_request, "Discarding superseded explanation");
            return match outcome {
                Ok(_) => Ok(slot.state.clone()),
                Err(e) => Err(e),
            };
        }

        slot.state.pending = false;
        match outcome {
            Ok(text) => {
                slot.state.explanation = text;
                slot.state.error = None;
                Ok(slot.state.clone())
            }
            Err(e) => {
                tracing::error!(request, error = %e, "Code explanation failed");
                slot.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

fn validate_input(code: &str, language: &str) -> Result<CodeLanguage> {
    if code.trim().is_empty() {
        return Err(Error::BadRequest("Please paste some code to explain.".to_string()));
    }
    language.parse::<CodeLanguage>().map_err(Error::BadRequest)
}

pub fn explain_prompt(code: &str, language: CodeLanguage) -> String {
    format!(
        "Explain the following {lang} code step-by-step, focusing on its purpose, logic, and any potential improvements or common pitfalls. \
If it's a bug, explain the bug and suggest a fix. Provide the explanation in clear, concise paragraphs.\n\n\
Code:\n```{lang}\n{code}\n```\n",
        lang = language.tag(),
        code = code,
    )
}
