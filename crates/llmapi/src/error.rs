use thiserror::Error;

/// Failures surfaced by the Gemini client. Each variant keeps the underlying
/// message so callers can show it verbatim.
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode Gemini response JSON: {source}. Raw response: {raw}")]
    Decode {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("Gemini returned no text: {0}")]
    EmptyResponse(String),
}
