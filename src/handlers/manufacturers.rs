use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder, Scope, delete, get, post, put, web};
use log::info;
use serde_json::json;

use crate::entity::manufacturer::ManufacturerInput;
use crate::error::ApiError;
use crate::handlers::{exec, now_epoch};
use crate::repo::manufacturer_repo;
use crate::server::AppState;
use crate::uploads;

pub fn scope() -> Scope {
    web::scope("/manufacturers")
        .service(list)
        .service(get_one)
        .service(create)
        .service(update)
        .service(remove)
        .service(upload_logo)
}

#[get("/")]
async fn list(data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let pool = data.pool.clone();
    let rows = exec("manufacturer", move || manufacturer_repo::list(&pool)).await?;
    info!("listed {} manufacturers", rows.len());
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/{id}")]
async fn get_one(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let pool = data.pool.clone();
    let row = exec("manufacturer", move || manufacturer_repo::get(&pool, id))
        .await?
        .ok_or_else(|| ApiError::NotFound("manufacturer".to_string()))?;
    Ok(HttpResponse::Ok().json(row))
}

#[post("/")]
async fn create(
    body: web::Json<ManufacturerInput>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let input = body.into_inner();
    if input.name.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "manufacturer name is required".to_string(),
        ));
    }
    let pool = data.pool.clone();
    let now = now_epoch();
    let id = exec("manufacturer", move || {
        manufacturer_repo::create(&pool, &input.name, input.logo_path.as_deref(), now)
    })
    .await?;
    info!("created manufacturer {id}");
    Ok(HttpResponse::Created().json(json!({ "message": "manufacturer created", "id": id })))
}

#[put("/{id}")]
async fn update(
    path: web::Path<i32>,
    body: web::Json<ManufacturerInput>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner();
    if input.name.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "manufacturer name is required".to_string(),
        ));
    }
    let pool = data.pool.clone();
    let now = now_epoch();
    exec("manufacturer", move || {
        manufacturer_repo::update(&pool, id, &input.name, input.logo_path.as_deref(), now)
    })
    .await?;
    info!("updated manufacturer {id}");
    Ok(HttpResponse::Ok().json(json!({ "message": "manufacturer updated" })))
}

#[delete("/{id}")]
async fn remove(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let pool = data.pool.clone();
    exec("manufacturer", move || manufacturer_repo::delete(&pool, id)).await?;
    info!("deleted manufacturer {id}");
    Ok(HttpResponse::Ok().json(json!({ "message": "manufacturer deleted" })))
}

#[post("/{id}/logo")]
async fn upload_logo(
    path: web::Path<i32>,
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let mut field = uploads::find_file_field(&mut payload, "logo").await?;
    let original = uploads::field_filename(&field)?;
    // namespace by entity so logos cannot collide in the shared content dir
    let filename = uploads::sanitize_filename(&format!("manufacturer_logo_{id}_{original}"));
    let bytes = uploads::read_field_bytes(&mut field, data.max_upload_bytes).await?;

    let (file_path, _size) = uploads::write_file(&data.content_dir, &filename, &bytes).await?;
    let stored = file_path.to_string_lossy().to_string();
    let stored_for_db = stored.clone();
    let pool = data.pool.clone();
    let now = now_epoch();
    uploads::commit_metadata(&file_path, "manufacturer", move || {
        manufacturer_repo::set_logo_path(&pool, id, &stored_for_db, now)
    })
    .await?;
    info!("logo for manufacturer {id} stored at {stored}");
    Ok(HttpResponse::Ok().json(json!({
        "message": "manufacturer logo uploaded",
        "logo_path": stored,
    })))
}
