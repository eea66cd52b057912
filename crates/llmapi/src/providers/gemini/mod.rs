mod api;
pub mod models;
pub use api::{
    build_generate_body, convert_body_parts_gemini, convert_messages_to_gemini_contents,
    response_to_text_data, send_generate_request,
};

use crate::error::LLMError;
use crate::types::{LLMClient, LLMMessage};

/// Sends `messages` to the client's model and returns the text of the first
/// candidate. One attempt, no retry.
pub async fn generate_text(client: &LLMClient, messages: Vec<LLMMessage>) -> Result<String, LLMError> {
    let response = send_generate_request(client, messages).await?;
    if let Some(response_id) = &response.response_id {
        tracing::debug!(%response_id, "Gemini response received");
    }
    response_to_text_data(&response)
}
