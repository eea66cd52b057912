use async_trait::async_trait;
use llmapi::{LLMClient, LLMError, LLMMessage, LLMMessageType};

use crate::config::AppConfig;
use crate::error::CaptionError;
use crate::models::{CaptionRequest, Image};

/// The external model, reduced to "send parts, receive text".
#[async_trait]
pub trait CaptionModel: Send + Sync {
    async fn generate_content(&self, parts: Vec<LLMMessageType>) -> Result<String, LLMError>;

    fn model_name(&self) -> &str;
}

pub struct GeminiCaptionModel {
    client: LLMClient,
}

impl GeminiCaptionModel {
    pub fn new(client: LLMClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(LLMClient::new(
            config.api_key.clone().unwrap_or_default(),
            config.endpoint.clone(),
            config.model.clone(),
        ))
    }
}

#[async_trait]
impl CaptionModel for GeminiCaptionModel {
    async fn generate_content(&self, parts: Vec<LLMMessageType>) -> Result<String, LLMError> {
        llmapi::generate_text(&self.client, vec![LLMMessage::user(parts)]).await
    }

    fn model_name(&self) -> &str {
        self.client.default_model()
    }
}

/// A blank instruction is left out rather than sent as an empty text part.
pub fn shape_request<'a>(prompt: &'a str, image: &'a Image) -> CaptionRequest<'a> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        CaptionRequest::ImageOnly(image)
    } else {
        CaptionRequest::TextAndImage { prompt, image }
    }
}

/// Requests a caption for `image`. Fails with [`CaptionError::MissingImage`]
/// without contacting the model when no image is available; any model failure
/// becomes [`CaptionError::GenerationFailed`]. Single attempt.
pub async fn generate(
    model: &dyn CaptionModel,
    prompt: &str,
    image: Option<&Image>,
) -> Result<String, CaptionError> {
    let image = image.ok_or(CaptionError::MissingImage)?;
    let request = shape_request(prompt, image);

    tracing::info!(
        shape = ?request.shape(),
        model = model.model_name(),
        source = ?image.source,
        "requesting caption"
    );

    model
        .generate_content(request.to_parts())
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "caption generation failed");
            CaptionError::from(err)
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::acquisition::tests::encoded;
    use crate::error::FailureKind;
    use crate::models::{ImageSource, RequestShape};
    use image::ImageFormat;
    use std::sync::Mutex;

    /// Records every call and answers with a fixed reply.
    pub(crate) struct FakeModel {
        pub calls: Mutex<Vec<Vec<LLMMessageType>>>,
        reply: Result<String, (u16, String)>,
    }

    impl FakeModel {
        pub fn replying(caption: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: Ok(caption.to_string()),
            }
        }

        pub fn failing(status: u16, message: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: Err((status, message.to_string())),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CaptionModel for FakeModel {
        async fn generate_content(&self, parts: Vec<LLMMessageType>) -> Result<String, LLMError> {
            self.calls.lock().unwrap().push(parts);
            match &self.reply {
                Ok(caption) => Ok(caption.clone()),
                Err((status, message)) => Err(LLMError::Api {
                    status: *status,
                    message: message.clone(),
                }),
            }
        }

        fn model_name(&self) -> &str {
            "fake-model"
        }
    }

    pub(crate) fn test_image(format: ImageFormat) -> Image {
        let (mime_type, bytes) = match format {
            ImageFormat::Jpeg => ("image/jpeg", encoded(ImageFormat::Jpeg, 2, 2)),
            _ => ("image/png", encoded(ImageFormat::Png, 2, 2)),
        };
        Image {
            source: ImageSource::Upload,
            mime_type: mime_type.to_string(),
            width: 2,
            height: 2,
            bytes,
        }
    }

    #[tokio::test]
    async fn missing_image_never_reaches_the_model() {
        let model = FakeModel::replying("unused");
        let err = generate(&model, "Describe the mood", None).await.unwrap_err();

        assert!(matches!(err, CaptionError::MissingImage));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_prompt_sends_image_only() {
        let model = FakeModel::replying("A dog on a beach");
        let image = test_image(ImageFormat::Png);

        let caption = generate(&model, "", Some(&image)).await.unwrap();

        assert_eq!(caption, "A dog on a beach");
        let calls = model.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert!(calls[0][0].is_image());
    }

    #[tokio::test]
    async fn whitespace_prompt_counts_as_empty() {
        let model = FakeModel::replying("caption");
        let image = test_image(ImageFormat::Png);

        generate(&model, " \t\n ", Some(&image)).await.unwrap();

        let calls = model.calls.lock().unwrap();
        assert_eq!(calls[0].len(), 1);
        assert!(calls[0][0].is_image());
    }

    #[tokio::test]
    async fn prompt_is_sent_before_the_image() {
        let model = FakeModel::replying("Melancholic and quiet");
        let image = test_image(ImageFormat::Jpeg);

        let caption = generate(&model, "  Describe the mood ", Some(&image)).await.unwrap();

        assert_eq!(caption, "Melancholic and quiet");
        let calls = model.calls.lock().unwrap();
        assert_eq!(calls[0][0], LLMMessageType::text("Describe the mood"));
        match &calls[0][1] {
            LLMMessageType::IMAGE { mime_type, .. } => assert_eq!(mime_type, "image/jpeg"),
            other => panic!("expected image part, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn model_failure_is_generation_failed_with_message() {
        let model = FakeModel::failing(503, "backend unavailable");
        let image = test_image(ImageFormat::Png);

        let err = generate(&model, "", Some(&image)).await.unwrap_err();

        assert_eq!(model.call_count(), 1);
        assert!(matches!(
            err,
            CaptionError::GenerationFailed { kind: FailureKind::Api, .. }
        ));
        assert!(err.to_string().contains("503 backend unavailable"));
    }

    #[test]
    fn shape_follows_trimmed_prompt() {
        let image = test_image(ImageFormat::Png);
        assert_eq!(shape_request("", &image).shape(), RequestShape::ImageOnly);
        assert_eq!(shape_request("   ", &image).shape(), RequestShape::ImageOnly);
        assert_eq!(shape_request("hi", &image).shape(), RequestShape::TextAndImage);
    }

    #[test]
    fn gemini_model_reports_configured_name() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let model = GeminiCaptionModel::from_config(&config);
        assert_eq!(model.model_name(), crate::constants::DEFAULT_CAPTION_MODEL);
    }
}
