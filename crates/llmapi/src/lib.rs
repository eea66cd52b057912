pub mod error;
pub mod providers;
pub mod types;
pub mod utils;

pub use error::LLMError;
pub use providers::gemini::generate_text;
pub use types::{LLMClient, LLMMessage, LLMMessageType};
