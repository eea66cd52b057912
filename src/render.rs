use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::constants::FOOTER_TIP;
use crate::mime_utils::upload_accept_attr;
use crate::models::Image;
use crate::session::{NoticeLevel, Phase, Session};

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; color: #262730; }
.layout { display: flex; min-height: 100vh; }
aside { width: 320px; background: #f0f2f6; padding: 24px; box-sizing: border-box; }
main { flex: 1; padding: 24px 48px; }
h2.header { border-bottom: 2px solid #bbb; padding-bottom: 8px; }
.notice { padding: 12px 16px; border-radius: 8px; margin: 12px 0; }
.notice.info { background: #e8f0fe; color: #0b4fa8; }
.notice.warning { background: #fff8e1; color: #8a6d00; }
.notice.error { background: #fdecea; color: #a61b1b; }
.preview img { max-width: 100%; border-radius: 8px; }
.preview figcaption { color: #808495; font-size: 0.9em; text-align: center; }
.caption { background: #f8f9fb; border-radius: 8px; padding: 16px; white-space: pre-wrap; }
input[type=text] { width: 100%; padding: 8px; box-sizing: border-box; }
button { margin-top: 16px; padding: 10px 20px; font-size: 1em; cursor: pointer; }
footer { margin-top: 32px; color: #808495; font-size: 0.9em; }
"#;

const SCRIPT: &str = r#"
const form = document.getElementById('caption-form');
const toggle = document.getElementById('camera_enabled');
const camera = document.getElementById('camera');
const preview = document.getElementById('preview-action');
const submit = document.getElementById('generate-action');
toggle.addEventListener('change', () => { camera.disabled = !toggle.checked; });
for (const input of [document.getElementById('upload'), camera]) {
  input.addEventListener('change', () => form.requestSubmit(preview));
}
form.addEventListener('submit', (event) => {
  if (event.submitter === submit) { submit.disabled = true; submit.textContent = 'Generating caption...'; }
});
"#;

pub fn image_data_url(image: &Image) -> String {
    format!(
        "data:{};base64,{}",
        image.mime_type,
        BASE64_ENGINE.encode(&image.bytes)
    )
}

/// Renders the whole screen for `session`.
pub fn render_page(session: &Session) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>Image Captioner</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(
        "<form id=\"caption-form\" method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n",
    );
    html.push_str("<div class=\"layout\">\n");

    render_sidebar(&mut html, session);
    render_main(&mut html, session);

    html.push_str("</div>\n</form>\n<script>");
    html.push_str(SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, session: &Session) {
    let camera_checked = if session.camera_enabled { " checked" } else { "" };
    let camera_disabled = if session.camera_enabled { "" } else { " disabled" };

    html.push_str("<aside>\n<h3>Upload or Capture an Image</h3>\n");
    html.push_str(&format!(
        "<label for=\"upload\">Upload your file here...</label><br>\n\
         <input type=\"file\" id=\"upload\" name=\"upload\" accept=\"{}\"><br><br>\n",
        encode_double_quoted_attribute(&upload_accept_attr())
    ));
    html.push_str(&format!(
        "<label><input type=\"checkbox\" id=\"camera_enabled\" name=\"camera_enabled\" value=\"on\"{camera_checked}> Enable Camera</label><br><br>\n\
         <label for=\"camera\">Take a picture</label><br>\n\
         <input type=\"file\" id=\"camera\" name=\"camera\" accept=\"image/*\" capture=\"environment\"{camera_disabled}>\n"
    ));
    html.push_str("</aside>\n");
}

fn render_main(html: &mut String, session: &Session) {
    html.push_str("<main>\n<h2 class=\"header\">Captions for Images</h2>\n");
    html.push_str("<h1>\u{1F5BC}\u{FE0F} Image Captioner</h1>\n");
    html.push_str("<h3>Generate Captions with AI</h3>\n");
    html.push_str(&format!(
        "<label for=\"prompt\">Input an optional text prompt for more specific captions</label>\n\
         <input type=\"text\" id=\"prompt\" name=\"prompt\" value=\"{}\">\n",
        encode_double_quoted_attribute(&session.prompt)
    ));

    if let Some(image) = &session.image {
        let data_url = image_data_url(image);
        html.push_str(&format!(
            "<figure class=\"preview\"><img src=\"{}\" alt=\"{label}\"><figcaption>{label}</figcaption></figure>\n",
            encode_double_quoted_attribute(&data_url),
            label = encode_text(image.source.label())
        ));
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"retained_image\" value=\"{}\">\n\
             <input type=\"hidden\" name=\"retained_mime\" value=\"{}\">\n\
             <input type=\"hidden\" name=\"retained_source\" value=\"{}\">\n",
            BASE64_ENGINE.encode(&image.bytes),
            encode_double_quoted_attribute(&image.mime_type),
            image.source.origin_field()
        ));
    }

    for notice in &session.notices {
        let class = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        html.push_str(&format!(
            "<div class=\"notice {class}\">{}</div>\n",
            encode_text(&notice.message)
        ));
    }

    html.push_str(
        "<input type=\"hidden\" name=\"action\" value=\"preview\">\n\
         <button type=\"submit\" id=\"preview-action\" name=\"action\" value=\"preview\" hidden>Preview</button>\n\
         <button type=\"submit\" id=\"generate-action\" name=\"action\" value=\"generate\">\u{1F52E} Generate Caption</button>\n",
    );

    if session.phase == Phase::DisplayingSuccess {
        if let Some(caption) = &session.caption {
            html.push_str(&format!(
                "<section><h3>\u{1F4DD} Generated Caption:</h3><div class=\"caption\">{}</div></section>\n",
                encode_text(caption)
            ));
        }
    }

    html.push_str(&format!(
        "<hr>\n<footer>{}</footer>\n</main>\n",
        encode_text(FOOTER_TIP)
    ));
}
