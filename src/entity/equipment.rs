use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::equipments;

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = equipments)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub model: String,
    pub manufacturer_id: Option<i32>,
    pub image_path: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = equipments)]
pub struct NewEquipment<'a> {
    pub name: &'a str,
    pub model: &'a str,
    pub manufacturer_id: Option<i32>,
    pub image_path: Option<&'a str>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of `POST /equipments/` and `PUT /equipments/{id}` (full replace).
#[derive(Debug, Deserialize)]
pub struct EquipmentInput {
    pub name: String,
    pub model: String,
    pub manufacturer_id: Option<i32>,
    pub image_path: Option<String>,
}
