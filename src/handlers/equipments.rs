use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder, Scope, delete, get, post, put, web};
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::entity::equipment::EquipmentInput;
use crate::error::ApiError;
use crate::handlers::{exec, now_epoch};
use crate::repo::equipment_repo;
use crate::server::AppState;
use crate::uploads;

pub fn scope() -> Scope {
    web::scope("/equipments")
        .service(list)
        .service(get_one)
        .service(create)
        .service(update)
        .service(remove)
        .service(upload_image)
}

#[derive(Debug, Deserialize)]
struct EquipmentListQuery {
    manufacturer_id: Option<i32>,
}

#[get("/")]
async fn list(
    query: web::Query<EquipmentListQuery>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let manufacturer_id = query.manufacturer_id;
    let pool = data.pool.clone();
    let rows = exec("equipment", move || {
        equipment_repo::list(&pool, manufacturer_id)
    })
    .await?;
    info!("listed {} equipments", rows.len());
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/{id}")]
async fn get_one(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let pool = data.pool.clone();
    let row = exec("equipment", move || equipment_repo::get(&pool, id))
        .await?
        .ok_or_else(|| ApiError::NotFound("equipment".to_string()))?;
    Ok(HttpResponse::Ok().json(row))
}

fn validate(input: &EquipmentInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() || input.model.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "equipment name and model are required".to_string(),
        ));
    }
    Ok(())
}

#[post("/")]
async fn create(
    body: web::Json<EquipmentInput>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let input = body.into_inner();
    validate(&input)?;
    let pool = data.pool.clone();
    let now = now_epoch();
    let id = exec("equipment", move || {
        equipment_repo::create(
            &pool,
            &input.name,
            &input.model,
            input.manufacturer_id,
            input.image_path.as_deref(),
            now,
        )
    })
    .await?;
    info!("created equipment {id}");
    Ok(HttpResponse::Created().json(json!({ "message": "equipment created", "id": id })))
}

#[put("/{id}")]
async fn update(
    path: web::Path<i32>,
    body: web::Json<EquipmentInput>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner();
    validate(&input)?;
    let pool = data.pool.clone();
    let now = now_epoch();
    exec("equipment", move || {
        equipment_repo::update(
            &pool,
            id,
            &input.name,
            &input.model,
            input.manufacturer_id,
            input.image_path.as_deref(),
            now,
        )
    })
    .await?;
    info!("updated equipment {id}");
    Ok(HttpResponse::Ok().json(json!({ "message": "equipment updated" })))
}

#[delete("/{id}")]
async fn remove(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let pool = data.pool.clone();
    exec("equipment", move || equipment_repo::delete(&pool, id)).await?;
    info!("deleted equipment {id}");
    Ok(HttpResponse::Ok().json(json!({ "message": "equipment deleted" })))
}

#[post("/{id}/image")]
async fn upload_image(
    path: web::Path<i32>,
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let mut field = uploads::find_file_field(&mut payload, "image").await?;
    let original = uploads::field_filename(&field)?;
    let filename = uploads::sanitize_filename(&format!("equipment_image_{id}_{original}"));
    let bytes = uploads::read_field_bytes(&mut field, data.max_upload_bytes).await?;

    let (file_path, _size) = uploads::write_file(&data.content_dir, &filename, &bytes).await?;
    let stored = file_path.to_string_lossy().to_string();
    let stored_for_db = stored.clone();
    let pool = data.pool.clone();
    let now = now_epoch();
    uploads::commit_metadata(&file_path, "equipment", move || {
        equipment_repo::set_image_path(&pool, id, &stored_for_db, now)
    })
    .await?;
    info!("image for equipment {id} stored at {stored}");
    Ok(HttpResponse::Ok().json(json!({
        "message": "equipment image uploaded",
        "image_path": stored,
    })))
}
