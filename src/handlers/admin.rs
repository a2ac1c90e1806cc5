use actix_web::{HttpResponse, Responder, Scope, delete, get, put, web};
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::exec;
use crate::repo::stats_repo;
use crate::server::AppState;

pub fn scope() -> Scope {
    web::scope("/admin")
        .service(stats)
        .service(list_users)
        .service(update_user)
        .service(delete_user)
}

#[get("/stats")]
async fn stats(data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let pool = data.pool.clone();
    let stats = exec("stats", move || stats_repo::collect(&pool)).await?;
    Ok(HttpResponse::Ok().json(stats))
}

// User management has no backing table; the routes exist as declared stubs.

#[get("/users")]
async fn list_users() -> impl Responder {
    HttpResponse::NotImplemented()
        .json(json!({ "message": "user management requires a backing users table" }))
}

#[put("/users/{id}")]
async fn update_user(path: web::Path<i32>) -> impl Responder {
    let id = path.into_inner();
    HttpResponse::NotImplemented().json(json!({
        "message": format!("updating user {id} requires a backing users table")
    }))
}

#[delete("/users/{id}")]
async fn delete_user(path: web::Path<i32>) -> impl Responder {
    let id = path.into_inner();
    HttpResponse::NotImplemented().json(json!({
        "message": format!("deleting user {id} requires a backing users table")
    }))
}
