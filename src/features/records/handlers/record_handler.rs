use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::session::Session;
use crate::features::auth::model::AuthenticatedAccount;
use crate::features::records::dtos::{format_size, UploadPageDto};
use crate::features::records::services::RecordService;
use crate::shared::constants::{MSG_NO_FILE, MSG_RECORD_UPLOADED};
use crate::shared::types::{render_page, PageLayout};

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body too large".to_string())
    } else {
        debug!("Failed to read multipart data: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

/// Upload form
pub async fn upload_page(
    account: AuthenticatedAccount,
    session: Session,
    State(service): State<Arc<RecordService>>,
) -> Result<Response> {
    let (session, messages) = session.take_flashes();
    let page = render_page(
        "upload.html",
        PageLayout::for_account(&account, messages),
        UploadPageDto::new(service.max_file_size()),
    )?;
    Ok((session, page).into_response())
}

/// Upload a medical record
///
/// Accepts multipart/form-data with a single `file` field. The size ceiling
/// is checked while streaming, before anything is written.
pub async fn upload_record(
    account: AuthenticatedAccount,
    session: Session,
    State(service): State<Arc<RecordService>>,
    mut multipart: Multipart,
) -> Result<Response> {
    let max_file_size = service.max_file_size();
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "file" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > max_file_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File too large. Maximum size is {}",
                    format_size(max_file_size)
                )));
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some((file_name, content_type, data));
    }

    let Some((file_name, content_type, data)) = upload.filter(|(name, _, _)| !name.is_empty())
    else {
        return Ok((session.flash(MSG_NO_FILE), Redirect::to("/upload")).into_response());
    };

    match service
        .upload(account.id, &file_name, &content_type, data)
        .await
    {
        Ok(_) => Ok((session.flash(MSG_RECORD_UPLOADED), Redirect::to("/dashboard")).into_response()),
        Err(AppError::BadRequest(msg)) => {
            Ok((session.flash(msg), Redirect::to("/upload")).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Serve a stored upload by name to any logged-in account.
///
/// Uploads are always sent as attachments in a sandbox so uploaded markup
/// never runs under the app's origin.
pub async fn serve_upload(
    _account: AuthenticatedAccount,
    State(service): State<Arc<RecordService>>,
    Path(filename): Path<String>,
) -> Result<Response> {
    let file = service.read_file(&filename).await?;
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_SECURITY_POLICY, "sandbox".to_string()),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        ],
        file.data,
    )
        .into_response())
}
