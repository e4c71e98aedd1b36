use std::path::Path;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::error::HttpError;
use crate::AppState;

/// Listing entry: the stored file name, nothing else.
#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub name: String,
}

/// Query parameters for the download and delete endpoints.
///
/// A missing `name` parameter is treated as the empty string, so the request
/// resolves against the directory itself and fails through the normal
/// filesystem error paths.
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: String,
}

// ============================================================================
// Helper functions
// ============================================================================

/// Split an upload filename into basename and extension.
///
/// Only the first two dot-separated segments are used; trailing segments are
/// ignored, so `photo.png.bak` stores as a `png`. Returns None when the name
/// has no dot at all.
fn split_file_name(file_name: &str) -> Option<(&str, &str)> {
    let mut parts = file_name.split('.');
    let basename = parts.next()?;
    let extension = parts.next()?;
    Some((basename, extension))
}

/// Stored name for an upload: hex-encoded SHA-256 of the basename plus the
/// original extension. Deterministic and independent of the file content.
fn hashed_file_name(basename: &str, extension: &str) -> String {
    format!(
        "{}.{}",
        hex::encode(Sha256::digest(basename.as_bytes())),
        extension
    )
}

async fn create_dir_and_save(dir: &Path, dest: &Path, data: &[u8]) -> std::io::Result<()> {
    fs::create_dir_all(dir).await?;
    fs::write(dest, data).await
}

// ============================================================================
// Handlers
// ============================================================================

/// /upload - store a multipart image under its hashed name.
///
/// The `image` form field must carry a file named `<basename>.<extension>`
/// with an accepted image extension. Uploads never overwrite: a name collision
/// is rejected, and two concurrent uploads of the same basename race at the
/// filesystem (the existence check is not atomic with the write).
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StatusCode, HttpError> {
    let mut multipart = multipart
        .map_err(|_| HttpError::new(StatusCode::BAD_REQUEST, "error parsing form"))?;

    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("image") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => return Err(HttpError::new(StatusCode::BAD_REQUEST, "error getting file")),
            Err(_) => return Err(HttpError::new(StatusCode::BAD_REQUEST, "error parsing form")),
        }
    };

    let file_name = field
        .file_name()
        .map(str::to_owned)
        .ok_or_else(|| HttpError::new(StatusCode::BAD_REQUEST, "error getting file"))?;

    let (basename, extension) = split_file_name(&file_name)
        .ok_or_else(|| HttpError::new(StatusCode::BAD_REQUEST, "error splitting file name"))?;

    if !state.config.is_image_extension(extension) {
        return Err(HttpError::new(
            StatusCode::BAD_REQUEST,
            "file is not image type",
        ));
    }

    let stored_name = hashed_file_name(basename, extension);
    let dest = state.upload_dir.join(&stored_name);
    if dest.exists() {
        return Err(HttpError::new(
            StatusCode::BAD_REQUEST,
            "error image already exist",
        ));
    }

    let data = field
        .bytes()
        .await
        .map_err(|_| HttpError::new(StatusCode::BAD_REQUEST, "error parsing form"))?;

    info!("Storing upload {} as {}", file_name, stored_name);

    create_dir_and_save(&state.upload_dir, &dest, &data)
        .await
        .map_err(|_| {
            HttpError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "error making directory or saving file",
            )
        })?;

    Ok(StatusCode::CREATED)
}

/// /list - enumerate the upload directory, sorted ascending by name.
///
/// Every directory entry is listed regardless of type. An unreadable
/// directory answers 404 whatever the underlying cause.
pub async fn list_images(State(state): State<AppState>) -> Result<Response, HttpError> {
    let mut entries = fs::read_dir(&state.upload_dir)
        .await
        .map_err(|err| HttpError::new(StatusCode::NOT_FOUND, err))?;

    let mut list = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| HttpError::new(StatusCode::NOT_FOUND, err))?
    {
        list.push(FileInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
        });
    }

    list.sort_unstable_by(|a, b| a.name.cmp(&b.name));

    let body = serde_json::to_string(&list)
        .map_err(|err| HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, err))?;
    info!("{}", body);

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// /download - stage a server-side copy of an uploaded file.
///
/// The file is duplicated into the download directory; no bytes are returned
/// to the caller. An already-staged copy is never overwritten.
pub async fn download_image(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<StatusCode, HttpError> {
    let source = state.upload_dir.join(&query.name);
    let dest = state.download_dir.join(&query.name);

    if !source.exists() {
        return Err(HttpError::new(
            StatusCode::NOT_FOUND,
            "error file path does not exist",
        ));
    }

    let mut file = fs::File::open(&source)
        .await
        .map_err(|_| HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "error file path"))?;

    if dest.exists() {
        return Err(HttpError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "error downloaded path",
        ));
    }

    fs::create_dir_all(&state.download_dir)
        .await
        .map_err(|_| HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "error making directory"))?;

    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .await
        .map_err(|_| HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "error reading bytes"))?;

    fs::write(&dest, &contents)
        .await
        .map_err(|_| HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "error write file"))?;

    info!("Staged {} into {}", source.display(), dest.display());

    Ok(StatusCode::OK)
}

/// /delete - remove an uploaded file by name.
pub async fn delete_image(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<StatusCode, HttpError> {
    let path = state.upload_dir.join(&query.name);

    if !path.exists() {
        return Err(HttpError::new(StatusCode::NOT_FOUND, "error file not found"));
    }

    fs::remove_file(&path).await.map_err(|_| {
        HttpError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "error failed to remove file",
        )
    })?;

    info!("Deleted {}", path.display());

    Ok(StatusCode::NO_CONTENT)
}
