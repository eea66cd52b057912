pub const DEFAULT_CAPTION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const LEGACY_API_KEY_ENV: &str = "GOOGLE-API-KEY";
pub const MODEL_ENV: &str = "CAPTIONER_MODEL";
pub const ENDPOINT_ENV: &str = "CAPTIONER_GEMINI_ENDPOINT";
pub const BIND_ADDR_ENV: &str = "CAPTIONER_ADDR";
pub const MAX_UPLOAD_BYTES_ENV: &str = "CAPTIONER_MAX_UPLOAD_BYTES";

pub const ACCEPTED_UPLOAD_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub const MISSING_IMAGE_ADVISORY: &str = "Please upload or capture an image to generate a caption.";
pub const GENERATING_WITH_PROMPT: &str = "Generating caption with custom prompt...";
pub const GENERATING_IMAGE_ONLY: &str = "Generating caption based on the image alone...";
pub const GENERATION_RETRY_HINT: &str = "Could not generate a caption. Please try again.";
pub const FOOTER_TIP: &str = "Tip: Add a prompt to guide the AI for more specific captions or just leave it blank for an automatic caption.";
