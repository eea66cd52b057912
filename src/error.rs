use llmapi::LLMError;

/// Internal tag for why a generation failed. Never shown to the user; every
/// kind renders the same generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingCredential,
    Transport,
    Api,
    Decode,
    EmptyResponse,
}

impl From<&LLMError> for FailureKind {
    fn from(err: &LLMError) -> Self {
        match err {
            LLMError::MissingApiKey => FailureKind::MissingCredential,
            LLMError::Http(_) => FailureKind::Transport,
            LLMError::Api { .. } => FailureKind::Api,
            LLMError::Decode { .. } => FailureKind::Decode,
            LLMError::EmptyResponse(_) => FailureKind::EmptyResponse,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("No image provided. Please upload or capture an image.")]
    MissingImage,

    #[error("An error occurred while generating the caption: {message}")]
    GenerationFailed { kind: FailureKind, message: String },
}

impl CaptionError {
    pub fn kind(&self) -> &'static str {
        match self {
            CaptionError::MissingImage => "missing_image",
            CaptionError::GenerationFailed { .. } => "generation_failed",
        }
    }
}

impl From<LLMError> for CaptionError {
    fn from(err: LLMError) -> Self {
        CaptionError::GenerationFailed {
            kind: FailureKind::from(&err),
            message: err.to_string(),
        }
    }
}

/// Problems turning the submitted form into an image. These stop the flow
/// before any caption request is made.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("Could not read the image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Unsupported file type '{0}'. Please upload a JPG, JPEG or PNG image.")]
    UnsupportedType(String),

    #[error("Could not read the submitted form: {0}")]
    Multipart(String),
}

impl AcquisitionError {
    pub fn kind(&self) -> &'static str {
        "invalid_image"
    }
}
