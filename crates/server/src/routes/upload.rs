use axum::{
    extract::{multipart::MultipartError, Multipart, Query},
    http::StatusCode,
    response::{Html, Redirect},
    Extension,
};
use chess_core::PlayerColor;
use serde::Deserialize;

use crate::error::AppError;
use crate::routes::SharedStore;
use crate::views;

/// GET /upload
pub async fn upload_form() -> Html<String> {
    Html(views::upload_page())
}

/// Fields collected from the multipart body before validation.
#[derive(Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    player_color: Option<String>,
}

impl UploadForm {
    /// Validate into (file name, bytes, color), reporting every field error.
    fn validate(self) -> Result<(String, Vec<u8>, PlayerColor), Vec<String>> {
        let mut errors = Vec::new();

        let file = match self.file {
            None => {
                errors.push("file: This field is required.".to_string());
                None
            }
            Some((_, bytes)) if bytes.is_empty() => {
                errors.push("file: The submitted file is empty.".to_string());
                None
            }
            Some(file) => Some(file),
        };

        // Absent or blank means white
        let color = match self.player_color.as_deref().map(str::trim) {
            None | Some("") => Some(PlayerColor::White),
            Some(raw) => match raw.parse::<PlayerColor>() {
                Ok(color) => Some(color),
                Err(e) => {
                    errors.push(format!("player_color: {e}"));
                    None
                }
            },
        };

        match (file, color) {
            (Some((name, bytes)), Some(color)) if errors.is_empty() => Ok((name, bytes, color)),
            _ => Err(errors),
        }
    }
}

fn form_error(detail: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(format!(
        "Form submission failed. Please check the form errors. {detail}"
    ))
}

/// Oversized bodies keep their 413; anything else is a form error.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %err, "Upload exceeds the size limit");
        AppError::PayloadTooLarge(err.body_text())
    } else {
        form_error(err)
    }
}

/// POST /upload
/// Multipart form with `file` and optional `player_color`.
pub async fn upload_file(
    Extension(store): Extension<SharedStore>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("game.pgn").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.file = Some((file_name, bytes.to_vec()));
            }
            Some("player_color") => {
                form.player_color = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (file_name, bytes, player_color) = form.validate().map_err(|errors| {
        tracing::warn!(?errors, "Upload form is not valid");
        form_error(errors.join(" "))
    })?;

    let record = store.save(&file_name, &bytes, player_color).await?;
    tracing::info!(id = record.id, file = %record.file_name, %player_color, "File saved");

    Ok(Redirect::to(&format!("/upload/success?record_id={}", record.id)))
}

#[derive(Deserialize)]
pub struct SuccessQuery {
    pub record_id: Option<i64>,
}

/// GET /upload/success
pub async fn upload_success(Query(q): Query<SuccessQuery>) -> Html<String> {
    Html(views::upload_success_page(q.record_id))
}
