use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::manufacturers;

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = manufacturers)]
pub struct Manufacturer {
    pub id: i32,
    pub name: String,
    pub logo_path: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = manufacturers)]
pub struct NewManufacturer<'a> {
    pub name: &'a str,
    pub logo_path: Option<&'a str>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of `POST /manufacturers/` and `PUT /manufacturers/{id}`.
/// PUT is a full-row replace: an omitted `logo_path` clears the column.
#[derive(Debug, Deserialize)]
pub struct ManufacturerInput {
    pub name: String,
    pub logo_path: Option<String>,
}
