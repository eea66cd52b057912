pub mod gemini;

pub use gemini::{
    build_generate_body, convert_body_parts_gemini, generate_text, response_to_text_data,
    send_generate_request,
};
