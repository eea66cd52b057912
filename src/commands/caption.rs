use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use llmapi::utils::decode_base64_to_bytes;

use crate::acquisition::acquire_image;
use crate::dispatcher::{generate, shape_request};
use crate::error::{AcquisitionError, CaptionError};
use crate::models::{
    CaptionResponsePayload, ErrorPayload, FormAction, RawImage, RawInputs, RequestShape,
};
use crate::render::render_page;
use crate::session::Session;
use crate::AppState;

/// GET / - the empty screen.
pub async fn index() -> Html<String> {
    Html(render_page(&Session::new()))
}

/// POST / - re-renders the screen; generates only for the `generate` action.
pub async fn submit_form(State(state): State<Arc<AppState>>, multipart: Multipart) -> Html<String> {
    let inputs = match read_inputs(multipart).await {
        Ok(inputs) => inputs,
        Err(err) => {
            tracing::warn!(error = %err, "rejecting form submission");
            return Html(render_page(&Session::with_error(err.to_string())));
        }
    };

    let session = Session::from_inputs(&inputs);
    let session = match inputs.action {
        FormAction::Generate => session.submit(state.model.as_ref()).await,
        FormAction::Preview => session,
    };

    Html(render_page(&session))
}

/// POST /api/caption - same fields as the form, JSON out.
pub async fn caption_api(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let inputs = match read_inputs(multipart).await {
        Ok(inputs) => inputs,
        Err(err) => return acquisition_failure(err),
    };

    let image = match acquire_image(&inputs) {
        Ok(image) => image,
        Err(err) => return acquisition_failure(err),
    };

    let request_shape = image
        .as_ref()
        .map(|image| shape_request(&inputs.prompt, image).shape());

    match generate(state.model.as_ref(), &inputs.prompt, image.as_ref()).await {
        Ok(caption) => {
            let payload = CaptionResponsePayload {
                caption,
                // generate only succeeds with an image, so the shape is known
                request_shape: request_shape.unwrap_or(RequestShape::ImageOnly),
                model: state.model.model_name().to_string(),
            };
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            let status = match err {
                CaptionError::MissingImage => StatusCode::BAD_REQUEST,
                CaptionError::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(ErrorPayload {
                    error: err.to_string(),
                    kind: err.kind(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "image-captioner" }))
}

fn acquisition_failure(err: AcquisitionError) -> Response {
    tracing::warn!(error = %err, "image acquisition failed");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorPayload {
            error: err.to_string(),
            kind: err.kind(),
        }),
    )
        .into_response()
}

/// Collects the known multipart fields. Unknown fields are skipped; for a
/// repeated field the last value wins, which is how the pressed submit button
/// overrides the default `action`.
pub async fn read_inputs(mut multipart: Multipart) -> Result<RawInputs, AcquisitionError> {
    let mut inputs = RawInputs::default();
    let mut retained_bytes: Option<Vec<u8>> = None;
    let mut retained_mime: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AcquisitionError::Multipart(err.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        match name.as_str() {
            "upload" | "camera" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AcquisitionError::Multipart(err.body_text()))?;
                let raw = RawImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                };
                if name == "upload" {
                    inputs.upload = Some(raw);
                } else {
                    inputs.camera = Some(raw);
                }
            }
            "camera_enabled" => {
                let value = field_text(field).await?;
                inputs.camera_enabled = is_checked(&value);
            }
            "prompt" => inputs.prompt = field_text(field).await?,
            "action" => inputs.action = FormAction::from_field(&field_text(field).await?),
            "retained_image" => {
                let value = field_text(field).await?;
                if !value.trim().is_empty() {
                    let bytes = decode_base64_to_bytes(&value).map_err(|_| {
                        AcquisitionError::Multipart("retained image is not valid base64".into())
                    })?;
                    retained_bytes = Some(bytes);
                }
            }
            "retained_mime" => retained_mime = Some(field_text(field).await?),
            "retained_source" => {
                inputs.retained_from_camera = field_text(field).await?.trim() == "camera";
            }
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    inputs.retained = retained_bytes.map(|bytes| RawImage {
        file_name: None,
        content_type: retained_mime,
        bytes,
    });

    Ok(inputs)
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AcquisitionError> {
    field
        .text()
        .await
        .map_err(|err| AcquisitionError::Multipart(err.body_text()))
}

fn is_checked(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}
