//! Upload coordination: a physical write to the content directory followed
//! by a metadata write to the store, kept mutually consistent by deleting
//! the file whenever the metadata step fails. A file with no row is a
//! harmless leak we clean up; a row with no file is a broken download we
//! never allow to be created.

use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use actix_web::web;
use futures_util::StreamExt;
use log::{info, warn};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{ApiError, StoreError};

/// Reduce a client-supplied filename to a single safe path segment.
///
/// Path separators and anything outside `[A-Za-z0-9._-]` become `_`, and
/// leading dots are stripped, so the result can never traverse out of the
/// content directory or hide itself.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// Pull the next part named `name` out of a multipart payload.
pub async fn find_file_field(payload: &mut Multipart, name: &str) -> Result<Field, ApiError> {
    while let Some(item) = payload.next().await {
        let field =
            item.map_err(|e| ApiError::InvalidInput(format!("malformed multipart payload: {e}")))?;
        if field.name() == name {
            return Ok(field);
        }
    }
    Err(ApiError::InvalidInput(format!(
        "no '{name}' file part in the request"
    )))
}

/// The non-empty client filename of a file part.
pub fn field_filename(field: &Field) -> Result<String, ApiError> {
    field
        .content_disposition()
        .get_filename()
        .map(str::to_string)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("no file selected".to_string()))
}

/// Drain one multipart part into memory, enforcing the upload cap before
/// anything touches the disk.
pub async fn read_field_bytes(field: &mut Field, cap: usize) -> Result<Vec<u8>, ApiError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk
            .map_err(|e| ApiError::InvalidInput(format!("malformed multipart payload: {e}")))?;
        if data.len() + bytes.len() > cap {
            return Err(ApiError::PayloadTooLarge);
        }
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}

/// Drain a small text form part.
pub async fn read_field_text(field: &mut Field) -> Result<String, ApiError> {
    let bytes = read_field_bytes(field, 64 * 1024).await?;
    String::from_utf8(bytes)
        .map_err(|_| ApiError::InvalidInput("form field is not valid UTF-8".to_string()))
}

/// Step 1 of an upload: the physical write.
///
/// Bytes land in `{filename}.{uuid}.part` first and are renamed into place,
/// so a half-written file never sits at the final path. Any failure maps to
/// a storage error and the store is never touched.
pub async fn write_file(
    content_dir: &Path,
    filename: &str,
    data: &[u8],
) -> Result<(PathBuf, i64), ApiError> {
    fs::create_dir_all(content_dir)
        .await
        .map_err(ApiError::Storage)?;
    let final_path = content_dir.join(filename);
    let part_path = content_dir.join(format!("{filename}.{}.part", Uuid::new_v4()));

    let written = async {
        let mut file = fs::File::create(&part_path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        drop(file);
        fs::rename(&part_path, &final_path).await
    }
    .await;

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&part_path).await {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!("could not remove partial upload {part_path:?}: {cleanup}");
            }
        }
        return Err(ApiError::Storage(e));
    }
    info!("wrote {} bytes to {final_path:?}", data.len());
    Ok((final_path, data.len() as i64))
}

/// Compensating action: delete a file whose metadata write failed.
/// Best-effort; failure here is logged and never alters the response
/// already decided for the caller.
pub async fn discard_upload(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => warn!("removed orphaned upload {path:?} after failed metadata write"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove orphaned upload {path:?}: {e}"),
    }
}

/// Steps 2-4 of an upload: run the metadata write on the blocking pool and
/// clean up the physical file on any failure, so no orphan survives an
/// unreachable store, a missing target row, or an unexpected store error.
/// On success the row and the file are both present and point at each other.
pub async fn commit_metadata<T, F>(path: &Path, what: &'static str, op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let outcome = match web::block(op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ApiError::from_store(e, what)),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    };
    if outcome.is_err() {
        discard_upload(path).await;
    }
    outcome
}
