use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, Scope, delete, get, post, put, web};
use futures_util::StreamExt;
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;
use tokio::fs;

use crate::entity::file_record::{FileKind, FileMetadataInput};
use crate::error::ApiError;
use crate::handlers::{exec, now_epoch};
use crate::repo::file_repo;
use crate::server::AppState;
use crate::uploads;

pub fn scope() -> Scope {
    web::scope("/files")
        .service(list)
        .service(get_one)
        .service(upload)
        .service(update)
        .service(remove)
        .service(download)
        .service(count_download)
}

fn parse_kind(raw: &str) -> Result<FileKind, ApiError> {
    FileKind::parse(raw).ok_or_else(|| {
        ApiError::InvalidInput("invalid file type, use 'firmware' or 'document'".to_string())
    })
}

#[derive(Debug, Deserialize)]
struct FileListQuery {
    equipment_id: Option<i32>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[get("/")]
async fn list(
    query: web::Query<FileListQuery>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let kind = match query.kind.as_deref() {
        Some(raw) => Some(parse_kind(raw)?),
        None => None,
    };
    let equipment_id = query.equipment_id;
    let pool = data.pool.clone();
    let rows = exec("file", move || file_repo::list(&pool, equipment_id, kind)).await?;
    info!("listed {} files", rows.len());
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/{id}")]
async fn get_one(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let pool = data.pool.clone();
    let row = exec("file", move || file_repo::get(&pool, id))
        .await?
        .ok_or_else(|| ApiError::NotFound("file".to_string()))?;
    Ok(HttpResponse::Ok().json(row))
}

#[post("/")]
async fn upload(mut payload: Multipart, data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let mut record_name: Option<String> = None;
    let mut kind_raw: Option<String> = None;
    let mut equipment_id: Option<i32> = None;
    let mut uploaded_by: Option<i32> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| ApiError::InvalidInput(format!("malformed multipart payload: {e}")))?;
        let part = field.name().to_string();
        match part.as_str() {
            "file" => {
                let original = uploads::field_filename(&field)?;
                let filename = uploads::sanitize_filename(&original);
                if filename.is_empty() {
                    return Err(ApiError::InvalidInput("invalid filename".to_string()));
                }
                let bytes = uploads::read_field_bytes(&mut field, data.max_upload_bytes).await?;
                file = Some((filename, bytes));
            }
            "name" => record_name = Some(uploads::read_field_text(&mut field).await?),
            "type" => kind_raw = Some(uploads::read_field_text(&mut field).await?),
            "equipment_id" => equipment_id = parse_int_part("equipment_id", &mut field).await?,
            "uploaded_by" => uploaded_by = parse_int_part("uploaded_by", &mut field).await?,
            _ => {
                // drain and ignore unknown parts
                while field.next().await.is_some() {}
            }
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| ApiError::InvalidInput("no 'file' part in the request".to_string()))?;
    // kind is validated against the closed set before the disk or the store
    // are touched
    let kind = kind_raw.as_deref().map(parse_kind).transpose()?.ok_or_else(|| {
        ApiError::InvalidInput("missing file type, use 'firmware' or 'document'".to_string())
    })?;
    let record_name = record_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| filename.clone());

    let (file_path, file_size) = uploads::write_file(&data.content_dir, &filename, &bytes).await?;
    let stored = file_path.to_string_lossy().to_string();
    let stored_for_db = stored.clone();
    let pool = data.pool.clone();
    let now = now_epoch();
    let id = uploads::commit_metadata(&file_path, "file", move || {
        file_repo::create(
            &pool,
            &record_name,
            kind,
            equipment_id,
            &stored_for_db,
            file_size,
            uploaded_by,
            now,
        )
    })
    .await?;
    info!("uploaded file {id} ({file_size} bytes) to {stored}");
    Ok(HttpResponse::Created().json(json!({
        "message": "file uploaded",
        "id": id,
        "file_path": stored,
    })))
}

async fn parse_int_part(
    name: &'static str,
    field: &mut actix_multipart::Field,
) -> Result<Option<i32>, ApiError> {
    let raw = uploads::read_field_text(field).await?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::InvalidInput(format!("'{name}' must be an integer")))
}

#[put("/{id}")]
async fn update(
    path: web::Path<i32>,
    body: web::Json<FileMetadataInput>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner();
    if input.name.is_none()
        && input.kind.is_none()
        && input.equipment_id.is_none()
        && input.uploaded_by.is_none()
    {
        return Err(ApiError::InvalidInput(
            "no fields provided for update".to_string(),
        ));
    }
    if let Some(raw) = input.kind.as_deref() {
        parse_kind(raw)?;
    }
    let pool = data.pool.clone();
    let now = now_epoch();
    exec("file", move || {
        file_repo::update_metadata(&pool, id, &input, now)
    })
    .await?;
    info!("updated file metadata {id}");
    Ok(HttpResponse::Ok().json(json!({ "message": "file metadata updated" })))
}

#[delete("/{id}")]
async fn remove(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let pool = data.pool.clone();
    let record = exec("file", move || file_repo::get(&pool, id))
        .await?
        .ok_or_else(|| ApiError::NotFound("file".to_string()))?;
    let pool = data.pool.clone();
    exec("file", move || file_repo::delete(&pool, id)).await?;
    // the row is gone; physical removal is best-effort and never fails the
    // request
    match fs::remove_file(&record.file_path).await {
        Ok(()) => info!("removed {} from disk for deleted file {id}", record.file_path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("no physical file at {} for deleted file {id}", record.file_path)
        }
        Err(e) => error!(
            "could not remove {} for deleted file {id}: {e}",
            record.file_path
        ),
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "file deleted" })))
}

#[get("/{id}/download")]
async fn download(path: web::Path<i32>, data: web::Data<AppState>) -> Result<NamedFile, ApiError> {
    let id = path.into_inner();
    let pool = data.pool.clone();
    let record = exec("file", move || file_repo::get(&pool, id))
        .await?
        .ok_or_else(|| ApiError::NotFound("file".to_string()))?;
    let file = NamedFile::open(&record.file_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ApiError::NotFound("physical file".to_string()),
        _ => ApiError::Storage(e),
    })?;
    info!("serving file {id} from {}", record.file_path);
    Ok(file.set_content_disposition(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(record.name)],
    }))
}

#[post("/{id}/download")]
async fn count_download(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let pool = data.pool.clone();
    let count = exec("file", move || {
        file_repo::increment_download_count(&pool, id)
    })
    .await?;
    info!("download count for file {id} is now {count}");
    Ok(HttpResponse::Ok().json(json!({
        "message": "download count incremented",
        "download_count": count,
    })))
}
