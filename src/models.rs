use llmapi::LLMMessageType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Upload,
    Camera,
    /// Echoed back from the previous render. `from_camera` remembers where it
    /// first came from so the camera toggle still governs it.
    Retained { from_camera: bool },
}

impl ImageSource {
    pub fn label(&self) -> &'static str {
        match self {
            ImageSource::Upload => "Uploaded Image",
            ImageSource::Camera => "Captured Image",
            ImageSource::Retained { .. } => "Current Image",
        }
    }

    pub fn from_camera(&self) -> bool {
        matches!(
            self,
            ImageSource::Camera | ImageSource::Retained { from_camera: true }
        )
    }

    /// Value of the hidden `retained_source` form field.
    pub fn origin_field(&self) -> &'static str {
        if self.from_camera() { "camera" } else { "upload" }
    }
}

/// A decoded image owned by one session. `bytes` keeps the original encoding
/// so it can be forwarded without re-compression.
#[derive(Clone)]
pub struct Image {
    pub source: ImageSource,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("source", &self.source)
            .field("mime_type", &self.mime_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Undecoded bytes from one form field.
#[derive(Debug, Clone, Default)]
pub struct RawImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl RawImage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormAction {
    #[default]
    Preview,
    Generate,
}

impl FormAction {
    pub fn from_field(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "generate" | "submit" => FormAction::Generate,
            _ => FormAction::Preview,
        }
    }
}

/// Everything one form submission carries.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub upload: Option<RawImage>,
    pub camera_enabled: bool,
    pub camera: Option<RawImage>,
    pub retained: Option<RawImage>,
    pub retained_from_camera: bool,
    pub prompt: String,
    pub action: FormAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestShape {
    ImageOnly,
    TextAndImage,
}

#[derive(Debug, Clone, Copy)]
pub enum CaptionRequest<'a> {
    ImageOnly(&'a Image),
    TextAndImage { prompt: &'a str, image: &'a Image },
}

impl CaptionRequest<'_> {
    pub fn shape(&self) -> RequestShape {
        match self {
            CaptionRequest::ImageOnly(_) => RequestShape::ImageOnly,
            CaptionRequest::TextAndImage { .. } => RequestShape::TextAndImage,
        }
    }

    /// Parts in the order the model receives them: prompt text, then image.
    pub fn to_parts(&self) -> Vec<LLMMessageType> {
        match self {
            CaptionRequest::ImageOnly(image) => {
                vec![LLMMessageType::image_bytes(&image.bytes, image.mime_type.as_str())]
            }
            CaptionRequest::TextAndImage { prompt, image } => vec![
                LLMMessageType::text(*prompt),
                LLMMessageType::image_bytes(&image.bytes, image.mime_type.as_str()),
            ],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaptionResponsePayload {
    pub caption: String,
    pub request_shape: RequestShape,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub kind: &'static str,
}
