use diesel::prelude::*;
use serde::Serialize;

use crate::db::{self, Pool};
use crate::error::StoreError;
use crate::schema::{equipments, manufacturers};

/// Row subset returned by manufacturer searches.
#[derive(Debug, Queryable, Serialize)]
pub struct ManufacturerMatch {
    pub id: i32,
    pub name: String,
    pub logo_path: Option<String>,
}

/// Row subset returned by equipment searches.
#[derive(Debug, Queryable, Serialize)]
pub struct EquipmentMatch {
    pub id: i32,
    pub name: String,
    pub model: String,
    pub manufacturer_id: Option<i32>,
    pub image_path: Option<String>,
}

// Pattern wildcards in the term pass through unescaped; matching keeps the
// store's native LIKE semantics.
pub fn manufacturers_matching(
    pool: &Pool,
    term: &str,
) -> Result<Vec<ManufacturerMatch>, StoreError> {
    let mut conn = db::acquire(pool)?;
    let pattern = format!("%{term}%");
    let rows = manufacturers::table
        .filter(manufacturers::name.like(&pattern))
        .select((
            manufacturers::id,
            manufacturers::name,
            manufacturers::logo_path,
        ))
        .load::<ManufacturerMatch>(&mut conn)?;
    Ok(rows)
}

pub fn equipments_matching(pool: &Pool, term: &str) -> Result<Vec<EquipmentMatch>, StoreError> {
    let mut conn = db::acquire(pool)?;
    let pattern = format!("%{term}%");
    let rows = equipments::table
        .filter(
            equipments::name
                .like(&pattern)
                .or(equipments::model.like(&pattern)),
        )
        .select((
            equipments::id,
            equipments::name,
            equipments::model,
            equipments::manufacturer_id,
            equipments::image_path,
        ))
        .load::<EquipmentMatch>(&mut conn)?;
    Ok(rows)
}
