use std::path::PathBuf;

use actix_multipart::Multipart;
use actix_web::{App, HttpResponse, HttpServer, Responder, delete, get, middleware, post, web};
use anyhow::Result;
use log::info;
use serde_json::json;

use crate::db::Pool;
use crate::error::ApiError;
use crate::handlers;
use crate::uploads;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub content_dir: PathBuf,
    pub addr: String,
    pub max_upload_bytes: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub content_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().body("equipment catalog API running")
}

/// Unscoped upload into the content directory, no entity association.
#[post("/upload")]
async fn generic_upload(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let mut field = uploads::find_file_field(&mut payload, "file").await?;
    let original = uploads::field_filename(&field)?;
    let filename = uploads::sanitize_filename(&original);
    if filename.is_empty() {
        return Err(ApiError::InvalidInput("invalid filename".to_string()));
    }
    let bytes = uploads::read_field_bytes(&mut field, data.max_upload_bytes).await?;
    let (path, size) = uploads::write_file(&data.content_dir, &filename, &bytes).await?;
    info!("generic upload '{filename}' stored ({size} bytes)");
    Ok(HttpResponse::Created().json(json!({
        "message": "upload successful",
        "file_path": path.to_string_lossy(),
    })))
}

#[delete("/upload/{filename}")]
async fn generic_delete(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let filename = path.into_inner();
    // only accept names sanitization would leave untouched
    if filename.is_empty() || uploads::sanitize_filename(&filename) != filename {
        return Err(ApiError::InvalidInput("invalid filename".to_string()));
    }
    let target = data.content_dir.join(&filename);
    match tokio::fs::remove_file(&target).await {
        Ok(()) => {
            info!("deleted uploaded file '{filename}'");
            Ok(HttpResponse::Ok().json(json!({ "message": format!("file '{filename}' deleted") })))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound("file".to_string()))
        }
        Err(e) => Err(ApiError::Storage(e)),
    }
}

/// Register every route plus the extractor error handlers, so failures keep
/// the structured `{message}` body shape everywhere.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::InvalidInput(format!("invalid request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::InvalidInput(format!("invalid query string: {err}")).into()
    }))
    .service(index)
    .service(generic_upload)
    .service(generic_delete)
    .service(handlers::manufacturers::scope())
    .service(handlers::equipments::scope())
    .service(handlers::files::scope())
    .service(handlers::search::scope())
    .service(handlers::admin::scope());
}

pub async fn run(config: ServerConfig, pool: Pool) -> Result<()> {
    let state = AppState {
        pool,
        content_dir: config.content_dir.clone(),
        max_upload_bytes: config.max_upload_bytes,
    };
    let bind_addr = config.addr.clone();
    info!("starting catalog API at http://{}", &bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure_app)
    })
    .bind(&bind_addr)?
    .run()
    .await?;
    Ok(())
}
