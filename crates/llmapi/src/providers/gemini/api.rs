use reqwest::Client;
use serde_json::{Value, json};

use crate::error::LLMError;
use crate::types::{LLMClient, LLMMessage, LLMMessageType};
use crate::utils::normalize_model_id;

use super::models::{GeminiErrorResponse, GeminiResponse};

pub fn convert_body_parts_gemini(body_part: Vec<LLMMessageType>) -> Vec<Value> {
    body_part
        .into_iter()
        .map(|part| match part {
            LLMMessageType::TEXT(text) => json!({ "text": text }),
            LLMMessageType::IMAGE {
                data_b64,
                mime_type,
            } => {
                json!({
                    "inlineData": {
                        "mimeType": mime_type,
                        "data": data_b64
                    }
                })
            }
        })
        .collect()
}

pub fn convert_messages_to_gemini_contents(messages: Vec<LLMMessage>) -> Vec<Value> {
    messages
        .into_iter()
        .map(|m| {
            let parts = convert_body_parts_gemini(m.content);
            json!({
                "role": "user",
                "parts": parts
            })
        })
        .collect()
}

pub fn build_generate_body(messages: Vec<LLMMessage>) -> Value {
    json!({
        "contents": convert_messages_to_gemini_contents(messages)
    })
}

pub async fn send_generate_request(
    api_client: &LLMClient,
    messages: Vec<LLMMessage>,
) -> Result<GeminiResponse, LLMError> {
    if api_client.api_key().trim().is_empty() {
        return Err(LLMError::MissingApiKey);
    }

    let endpoint = api_client.endpoint().trim_end_matches('/');
    let url = format!(
        "{}/{}:generateContent",
        endpoint,
        normalize_model_id(api_client.default_model())
    );

    let body = build_generate_body(messages);
    tracing::debug!(%url, "sending Gemini generateContent request");

    let client = Client::new();
    let response = client
        .post(&url)
        .header("x-goog-api-key", api_client.api_key().trim())
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &response_text));
    }

    let response: GeminiResponse =
        serde_json::from_str(&response_text).map_err(|source| LLMError::Decode {
            source,
            raw: response_text.clone(),
        })?;

    if let Some(usage) = &response.usage_metadata {
        tracing::debug!(
            prompt_tokens = usage.prompt_token_count,
            candidate_tokens = usage.candidates_token_count,
            total_tokens = usage.total_token_count,
            "Gemini usage"
        );
    }

    Ok(response)
}

fn api_error(status: u16, body: &str) -> LLMError {
    let message = match serde_json::from_str::<GeminiErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    };
    LLMError::Api { status, message }
}

pub fn response_to_text_data(response: &GeminiResponse) -> Result<String, LLMError> {
    //get only 1 text response
    let Some(candidate) = response.candidates.first() else {
        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
            .map(|reason| format!("prompt blocked ({reason})"))
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(LLMError::EmptyResponse(reason));
    };

    let mut full_text = String::new();
    for part in &candidate.content.parts {
        if let Some(text) = &part.text {
            full_text.push_str(text);
        }
    }

    if full_text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .as_deref()
            .map(|reason| format!("finish reason {reason}"))
            .unwrap_or_else(|| "candidate had no text parts".to_string());
        return Err(LLMError::EmptyResponse(reason));
    }

    Ok(full_text)
}
