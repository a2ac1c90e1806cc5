use actix_web::{HttpResponse, Responder, Scope, get, web};
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::error::{ApiError, StoreError};
use crate::handlers::exec;
use crate::repo::search_repo;
use crate::server::AppState;

pub fn scope() -> Scope {
    web::scope("/search")
        .service(global)
        .service(manufacturers)
        .service(equipments)
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

fn require_term(query: SearchQuery) -> Result<String, ApiError> {
    query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidInput("search parameter 'q' is required".to_string()))
}

#[get("/")]
async fn global(
    query: web::Query<SearchQuery>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let term = require_term(query.into_inner())?;
    let pool = data.pool.clone();
    let (manufacturer_matches, equipment_matches) = exec("search", move || {
        let manufacturer_matches = search_repo::manufacturers_matching(&pool, &term)?;
        let equipment_matches = search_repo::equipments_matching(&pool, &term)?;
        Ok::<_, StoreError>((manufacturer_matches, equipment_matches))
    })
    .await?;
    info!(
        "global search matched {} manufacturers, {} equipments",
        manufacturer_matches.len(),
        equipment_matches.len()
    );
    Ok(HttpResponse::Ok().json(json!({
        "manufacturers": manufacturer_matches,
        "equipments": equipment_matches,
    })))
}

#[get("/manufacturers")]
async fn manufacturers(
    query: web::Query<SearchQuery>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let term = require_term(query.into_inner())?;
    let pool = data.pool.clone();
    let rows = exec("search", move || {
        search_repo::manufacturers_matching(&pool, &term)
    })
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/equipments")]
async fn equipments(
    query: web::Query<SearchQuery>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let term = require_term(query.into_inner())?;
    let pool = data.pool.clone();
    let rows = exec("search", move || {
        search_repo::equipments_matching(&pool, &term)
    })
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}
