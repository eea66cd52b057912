use crate::utils;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LLMMessageType {
    TEXT(String),
    IMAGE { data_b64: String, mime_type: String },
}

impl LLMMessageType {
    pub fn text(text: impl Into<String>) -> Self {
        LLMMessageType::TEXT(text.into())
    }

    pub fn image_b64(data_b64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        LLMMessageType::IMAGE {
            data_b64: data_b64.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn image_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        LLMMessageType::IMAGE {
            data_b64: utils::encode_byte_to_base64(bytes),
            mime_type: mime_type.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, LLMMessageType::IMAGE { .. })
    }
}

/// One user turn. Gemini only ever sees the `user` role from this crate.
#[derive(Clone, Debug)]
pub struct LLMMessage {
    pub content: Vec<LLMMessageType>,
}

impl LLMMessage {
    pub fn user(content: Vec<LLMMessageType>) -> Self {
        Self { content }
    }
}

/// Connection settings for one Gemini model. The API key may be empty; the
/// request path reports that as [`crate::LLMError::MissingApiKey`].
#[derive(Clone)]
pub struct LLMClient {
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
    pub(crate) default_model: String,
}

impl LLMClient {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            default_model: default_model.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

impl std::fmt::Debug for LLMClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMClient")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("endpoint", &self.endpoint)
            .field("default_model", &self.default_model)
            .finish()
    }
}
