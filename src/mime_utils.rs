use std::path::Path;

use image::ImageFormat;

use crate::constants::ACCEPTED_UPLOAD_EXTENSIONS;

pub fn resolve_mime_type(candidate: Option<&str>, file_name: Option<&str>) -> String {
    if let Some(value) = candidate {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    file_name
        .and_then(|name| mime_guess::from_path(name).first_raw())
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Mirrors the upload picker filter. Names without an extension are rejected.
pub fn is_accepted_upload(file_name: &str) -> bool {
    Path::new(file_name.trim())
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            ACCEPTED_UPLOAD_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

pub fn mime_for_format(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        _ => None,
    }
}

/// `accept` attribute value for the upload input.
pub fn upload_accept_attr() -> String {
    ACCEPTED_UPLOAD_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_extensions_are_case_insensitive() {
        assert!(is_accepted_upload("dog.PNG"));
        assert!(is_accepted_upload("dog.jpeg"));
        assert!(is_accepted_upload("dog.JPG"));
        assert!(!is_accepted_upload("dog.gif"));
        assert!(!is_accepted_upload("dog"));
    }

    #[test]
    fn resolve_mime_prefers_explicit_value() {
        assert_eq!(resolve_mime_type(Some(" image/png "), Some("a.jpg")), "image/png");
        assert_eq!(resolve_mime_type(Some(""), Some("a.jpg")), "image/jpeg");
        assert_eq!(resolve_mime_type(None, None), "application/octet-stream");
    }

    #[test]
    fn accept_attr_lists_extensions() {
        assert_eq!(upload_accept_attr(), ".jpg,.jpeg,.png");
    }
}
