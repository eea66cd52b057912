use crate::error::AcquisitionError;
use crate::mime_utils::{is_accepted_upload, mime_for_format, resolve_mime_type};
use crate::models::{Image, ImageSource, RawImage, RawInputs};

/// Picks and decodes the single active image.
///
/// Check order is the precedence: upload, then camera (only while the camera
/// toggle is on), then the image retained from the previous render. A retained
/// camera capture is dropped while the toggle is off. Empty fields count as
/// absent.
pub fn acquire_image(inputs: &RawInputs) -> Result<Option<Image>, AcquisitionError> {
    if let Some(upload) = present(&inputs.upload) {
        return decode_image(upload, ImageSource::Upload).map(Some);
    }

    if inputs.camera_enabled {
        if let Some(frame) = present(&inputs.camera) {
            return decode_image(frame, ImageSource::Camera).map(Some);
        }
    }

    if let Some(retained) = present(&inputs.retained) {
        if inputs.retained_from_camera && !inputs.camera_enabled {
            tracing::debug!("dropping retained camera capture, camera is disabled");
            return Ok(None);
        }
        let source = ImageSource::Retained {
            from_camera: inputs.retained_from_camera,
        };
        return decode_image(retained, source).map(Some);
    }

    Ok(None)
}

fn present(raw: &Option<RawImage>) -> Option<&RawImage> {
    raw.as_ref().filter(|raw| !raw.is_empty())
}

pub fn decode_image(raw: &RawImage, source: ImageSource) -> Result<Image, AcquisitionError> {
    if source == ImageSource::Upload {
        if let Some(file_name) = raw.file_name.as_deref().filter(|name| !name.trim().is_empty()) {
            if !is_accepted_upload(file_name) {
                return Err(AcquisitionError::UnsupportedType(file_name.to_string()));
            }
        }
    }

    let format = image::guess_format(&raw.bytes)?;
    let mime_type = mime_for_format(format).ok_or_else(|| {
        AcquisitionError::UnsupportedType(resolve_mime_type(
            raw.content_type.as_deref(),
            raw.file_name.as_deref(),
        ))
    })?;

    let decoded = image::load_from_memory_with_format(&raw.bytes, format)?;

    tracing::debug!(
        ?source,
        mime_type,
        width = decoded.width(),
        height = decoded.height(),
        "image decoded"
    );

    Ok(Image {
        source,
        mime_type: mime_type.to_string(),
        width: decoded.width(),
        height: decoded.height(),
        bytes: raw.bytes.clone(),
    })
}
