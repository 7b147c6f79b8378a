use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{api::ErrorDto, file::FileDto},
    server::{
        controller::util::admin::require_admin,
        error::{file::FileError, Error},
        model::app::AppState,
        service::file::{FileService, Upload},
    },
};

pub static FILE_TAG: &str = "file";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn parse_id_field(name: &str, value: &str) -> Result<Option<i32>, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<i32>()
        .map(Some)
        .map_err(|_| Error::Validation(format!("{} must be an integer", name)))
}

/// `Content-Disposition` value with an ASCII fallback and the UTF-8 file name
fn content_disposition(original_name: &str) -> String {
    let fallback: String = original_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded: String =
        url::form_urlencoded::byte_serialize(original_name.as_bytes()).collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        encoded.replace('+', "%20")
    )
}

/// Uploads a file
///
/// Multipart fields: `file` (required), `event_id` and `member_id` (optional).
///
/// # Responses
/// - 201 (Created): File stored
/// - 400 (Bad Request): Missing `file` field or malformed form
/// - 401 (Unauthorized): Admin login required
/// - 413 (Payload Too Large): File exceeds the upload limit
#[utoipa::path(
    post,
    path = "/api/files",
    tag = FILE_TAG,
    request_body(content_type = "multipart/form-data", description = "File with optional event_id and member_id"),
    responses(
        (status = 201, description = "File stored", body = FileDto),
        (status = 400, description = "Missing file field", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 413, description = "File too large", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn upload_file(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let mut file = None;
    let mut event_id = None;
    let mut member_id = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field.bytes().await?;

                file = Some((original_name, content_type, bytes.to_vec()));
            }
            Some("event_id") => event_id = parse_id_field("event_id", &field.text().await?)?,
            Some("member_id") => member_id = parse_id_field("member_id", &field.text().await?)?,
            _ => {}
        }
    }

    let Some((original_name, content_type, bytes)) = file else {
        return Err(FileError::MissingFile.into());
    };

    let file = FileService::new(
        &state.db,
        &state.config.upload_dir,
        state.config.max_upload_bytes,
    )
    .store(Upload {
        original_name,
        content_type,
        bytes,
        event_id,
        member_id,
    })
    .await?;

    Ok((StatusCode::CREATED, Json(file)))
}

#[utoipa::path(
    get,
    path = "/api/files",
    tag = FILE_TAG,
    responses(
        (status = 200, description = "Uploaded files, newest first", body = Vec<FileDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_files(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let files = FileService::new(
        &state.db,
        &state.config.upload_dir,
        state.config.max_upload_bytes,
    )
    .list()
    .await?;

    Ok((StatusCode::OK, Json(files)))
}

#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = FILE_TAG,
    params(("id" = i32, Path, description = "File ID")),
    responses(
        (status = 200, description = "File metadata", body = FileDto),
        (status = 404, description = "File not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let file = FileService::new(
        &state.db,
        &state.config.upload_dir,
        state.config.max_upload_bytes,
    )
    .get(id)
    .await?;

    Ok((StatusCode::OK, Json(file)))
}

/// Downloads the stored bytes of a file under its original name
#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    tag = FILE_TAG,
    params(("id" = i32, Path, description = "File ID")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let (file, bytes) = FileService::new(
        &state.db,
        &state.config.upload_dir,
        state.config.max_upload_bytes,
    )
    .read(id)
    .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&file.original_name),
            ),
        ],
        bytes,
    ))
}

/// Deletes a file and its stored bytes
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = FILE_TAG,
    params(("id" = i32, Path, description = "File ID")),
    responses(
        (status = 204, description = "File deleted"),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "File not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_file(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    FileService::new(
        &state.db,
        &state.config.upload_dir,
        state.config.max_upload_bytes,
    )
    .delete(id)
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
