use crate::acquisition::acquire_image;
use crate::constants::{
    GENERATING_IMAGE_ONLY, GENERATING_WITH_PROMPT, GENERATION_RETRY_HINT, MISSING_IMAGE_ADVISORY,
};
use crate::dispatcher::{generate, shape_request, CaptionModel};
use crate::models::{Image, RawInputs, RequestShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingSubmit,
    Dispatching,
    DisplayingSuccess,
    DisplayingError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// One user's screen state. Built from a submission, advanced by [`Session::submit`],
/// then rendered. Nothing here outlives the request.
#[derive(Debug, Clone)]
pub struct Session {
    pub prompt: String,
    pub camera_enabled: bool,
    pub image: Option<Image>,
    pub phase: Phase,
    pub notices: Vec<Notice>,
    pub caption: Option<String>,
    pub request_shape: Option<RequestShape>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            prompt: String::new(),
            camera_enabled: false,
            image: None,
            phase: Phase::Idle,
            notices: vec![Notice::warning(MISSING_IMAGE_ADVISORY)],
            caption: None,
            request_shape: None,
        }
    }

    /// Acquires the image from `inputs`. A decode failure leaves the session
    /// idle with the error shown, so the trigger stays inert.
    pub fn from_inputs(inputs: &RawInputs) -> Self {
        let mut session = Self {
            prompt: inputs.prompt.clone(),
            camera_enabled: inputs.camera_enabled,
            ..Self::new()
        };
        session.notices.clear();

        match acquire_image(inputs) {
            Ok(Some(image)) => {
                session.image = Some(image);
                session.phase = Phase::AwaitingSubmit;
            }
            Ok(None) => session.notices.push(Notice::warning(MISSING_IMAGE_ADVISORY)),
            Err(err) => {
                tracing::warn!(error = %err, "image acquisition failed");
                session.notices.push(Notice::error(err.to_string()));
                session.notices.push(Notice::error(GENERATION_RETRY_HINT));
            }
        }

        session
    }

    pub fn with_error(message: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.notices = vec![Notice::error(message), Notice::error(GENERATION_RETRY_HINT)];
        session
    }

    /// The submit trigger. Does nothing without an image; otherwise makes one
    /// caption request and lands in a displaying phase.
    pub async fn submit(mut self, model: &dyn CaptionModel) -> Self {
        if matches!(self.phase, Phase::DisplayingSuccess | Phase::DisplayingError) {
            self = self.acknowledge();
        }
        if self.phase != Phase::AwaitingSubmit {
            tracing::debug!(phase = ?self.phase, "submit ignored");
            return self;
        }

        self.phase = Phase::Dispatching;
        if let Some(image) = &self.image {
            let shape = shape_request(&self.prompt, image).shape();
            self.request_shape = Some(shape);
            self.notices.push(Notice::info(match shape {
                RequestShape::TextAndImage => GENERATING_WITH_PROMPT,
                RequestShape::ImageOnly => GENERATING_IMAGE_ONLY,
            }));
        }

        match generate(model, &self.prompt, self.image.as_ref()).await {
            Ok(caption) => {
                self.caption = Some(caption);
                self.phase = Phase::DisplayingSuccess;
            }
            Err(err) => {
                self.caption = None;
                self.notices.push(Notice::error(err.to_string()));
                self.notices.push(Notice::error(GENERATION_RETRY_HINT));
                self.phase = Phase::DisplayingError;
            }
        }

        self
    }

    /// Leaves a displaying phase. The image is kept, the result is cleared.
    pub fn acknowledge(mut self) -> Self {
        if matches!(self.phase, Phase::DisplayingSuccess | Phase::DisplayingError) {
            self.phase = Phase::AwaitingSubmit;
            self.caption = None;
            self.request_shape = None;
            self.notices.clear();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::tests::encoded;
    use crate::dispatcher::tests::FakeModel;
    use crate::models::{ImageSource, RawImage};
    use image::ImageFormat;

    fn inputs_with_upload(prompt: &str) -> RawInputs {
        RawInputs {
            upload: Some(RawImage::new(encoded(ImageFormat::Png, 2, 2)).with_file_name("dog.png")),
            prompt: prompt.to_string(),
            ..RawInputs::default()
        }
    }

    #[test]
    fn new_session_is_idle_with_advisory() {
        let session = Session::new();
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.notices, vec![Notice::warning(MISSING_IMAGE_ADVISORY)]);
    }

    #[test]
    fn image_moves_session_to_awaiting_submit() {
        let session = Session::from_inputs(&inputs_with_upload(""));
        assert_eq!(session.phase, Phase::AwaitingSubmit);
        assert!(session.notices.is_empty());
        assert_eq!(session.image.as_ref().unwrap().source, ImageSource::Upload);
    }

    #[tokio::test]
    async fn submit_without_image_is_inert() {
        let model = FakeModel::replying("unused");
        let session = Session::from_inputs(&RawInputs::default()).submit(&model).await;

        assert_eq!(model.call_count(), 0);
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.caption.is_none());
        assert_eq!(session.notices, vec![Notice::warning(MISSING_IMAGE_ADVISORY)]);
    }

    #[tokio::test]
    async fn successful_submit_displays_caption() {
        let model = FakeModel::replying("A dog on a beach");
        let session = Session::from_inputs(&inputs_with_upload("")).submit(&model).await;

        assert_eq!(session.phase, Phase::DisplayingSuccess);
        assert_eq!(session.caption.as_deref(), Some("A dog on a beach"));
        assert_eq!(session.request_shape, Some(RequestShape::ImageOnly));
        assert_eq!(session.notices, vec![Notice::info(GENERATING_IMAGE_ONLY)]);
    }

    #[tokio::test]
    async fn failed_submit_shows_errors_and_no_caption() {
        let model = FakeModel::failing(500, "boom");
        let session = Session::from_inputs(&inputs_with_upload("Describe the mood"))
            .submit(&model)
            .await;

        assert_eq!(session.phase, Phase::DisplayingError);
        assert!(session.caption.is_none());
        assert_eq!(session.notices[0], Notice::info(GENERATING_WITH_PROMPT));
        assert_eq!(session.notices[1].level, NoticeLevel::Error);
        assert!(session.notices[1].message.contains("500 boom"));
        assert_eq!(session.notices[2], Notice::error(GENERATION_RETRY_HINT));
    }

    #[tokio::test]
    async fn resubmitting_loops_back_through_awaiting_submit() {
        let model = FakeModel::replying("again");
        let session = Session::from_inputs(&inputs_with_upload("")).submit(&model).await;
        let session = session.submit(&model).await;

        assert_eq!(model.call_count(), 2);
        assert_eq!(session.phase, Phase::DisplayingSuccess);
        assert_eq!(session.notices.len(), 1);
    }

    #[test]
    fn acknowledge_returns_to_awaiting_submit() {
        let mut session = Session::from_inputs(&inputs_with_upload(""));
        session.phase = Phase::DisplayingError;
        session.notices.push(Notice::error("x"));

        let session = session.acknowledge();
        assert_eq!(session.phase, Phase::AwaitingSubmit);
        assert!(session.notices.is_empty());
        assert!(session.image.is_some());
    }

    #[tokio::test]
    async fn undecodable_upload_aborts_before_dispatch() {
        let model = FakeModel::replying("unused");
        let inputs = RawInputs {
            upload: Some(RawImage::new(b"garbage".to_vec()).with_file_name("x.png")),
            ..RawInputs::default()
        };

        let session = Session::from_inputs(&inputs).submit(&model).await;

        assert_eq!(model.call_count(), 0);
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.notices.iter().all(|n| n.level == NoticeLevel::Error));
    }
}
