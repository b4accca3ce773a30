//! Photo upload, listing, delete, and reorder handlers.
//!
//! Filenames are the external identifier: delete and reorder address photos
//! by the name they were uploaded under, not by id.

use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde_json::{json, Value};

use pw_core::filename::sanitize_filename;
use pw_core::{Error, Photo};

use crate::context::AppContext;
use crate::error::AppError;
use crate::uploads::PendingUpload;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "photo";

/// Run a blocking storage call off the async executor.
async fn blocking<T, F>(f: F) -> pw_core::Result<T>
where
    F: FnOnce() -> pw_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("spawn_blocking join error: {e}")))?
}

/// POST /upload
///
/// Streams the `photo` file to disk under its original base name, then
/// records it with `sort_order = 0`. The file is stored before the record so
/// a failed write never leaves a record without a file.
pub async fn upload_photo(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Photo>, AppError> {
    let mut multipart =
        multipart.map_err(|e| Error::validation(format!("expected a multipart form: {e}")))?;

    let mut stored: Option<(String, u64)> = None;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("failed to read multipart data: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        // A part without a file name is a plain form value, not a file.
        let Some(raw_name) = field.file_name().map(String::from) else {
            continue;
        };
        let filename = sanitize_filename(&raw_name)?;

        let mut pending = ctx.uploads.begin(&filename).await?;
        if let Err(e) = copy_field(&mut field, &mut pending).await {
            pending.abort().await;
            return Err(e.into());
        }
        let bytes = pending.finish().await?;
        stored = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = stored
        .ok_or_else(|| Error::validation(format!("missing '{UPLOAD_FIELD}' file field")))?;

    let photos = ctx.photos.clone();
    let name = filename.clone();
    let photo = blocking(move || photos.insert(&name)).await?;

    tracing::info!(id = %photo.id, filename = %filename, bytes, "Photo uploaded");
    Ok(Json(photo))
}

/// Drain a multipart field into `pending` one chunk at a time.
async fn copy_field(field: &mut Field<'_>, pending: &mut PendingUpload) -> pw_core::Result<()> {
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| Error::validation(format!("failed to read file data: {e}")))?
    {
        pending.write(&chunk).await?;
    }
    Ok(())
}

/// GET /api/photos
pub async fn list_photos(State(ctx): State<AppContext>) -> Result<Json<Vec<Photo>>, AppError> {
    let photos = ctx.photos.clone();
    let list = blocking(move || photos.list_ordered()).await?;
    Ok(Json(list))
}

/// DELETE /api/photos/{name}
///
/// Soft-deletes the records first, then removes the file. A failed file
/// removal is ignored and the delete still reports success.
pub async fn delete_photo(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let filename = sanitize_filename(&name)?;

    let photos = ctx.photos.clone();
    let name = filename.clone();
    let rows = blocking(move || photos.delete_by_filename(&name)).await?;

    let removed = ctx.uploads.remove(&filename).await;
    tracing::info!(filename = %filename, rows, file_removed = removed, "Photo deleted");

    Ok(Json(json!({"message": "deleted"})))
}

/// POST /api/reorder
///
/// Body is a JSON array of file names in display order. It is parsed from
/// the raw body so a missing or wrong content type is not an error.
pub async fn reorder_photos(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let order: Vec<String> = serde_json::from_slice(&body).map_err(|e| {
        Error::validation(format!("body must be a JSON array of file names: {e}"))
    })?;

    let photos = ctx.photos.clone();
    let count = order.len();
    blocking(move || photos.reorder(&order)).await?;

    tracing::info!(positions = count, "Photo order saved");
    Ok(Json(json!({"status": "order saved"})))
}
