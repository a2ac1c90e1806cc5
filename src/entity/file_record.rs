use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::files;

/// Closed set of file kinds the catalog stores. Serialized as `type` on the
/// wire, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Firmware,
    Document,
}

impl FileKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "firmware" => Some(FileKind::Firmware),
            "document" => Some(FileKind::Document),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Firmware => "firmware",
            FileKind::Document => "document",
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = files)]
pub struct FileRecord {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub equipment_id: Option<i32>,
    pub file_path: String,
    pub file_size: i64,
    pub download_count: i64,
    pub uploaded_by: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

// download_count is left to its schema default of 0.
#[derive(Insertable)]
#[diesel(table_name = files)]
pub struct NewFileRecord<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub equipment_id: Option<i32>,
    pub file_path: &'a str,
    pub file_size: i64,
    pub uploaded_by: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of `PUT /files/{id}`: a partial update, only supplied fields change.
#[derive(Debug, Deserialize)]
pub struct FileMetadataInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub equipment_id: Option<i32>,
    pub uploaded_by: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = files)]
pub struct FileChanges<'a> {
    pub name: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub equipment_id: Option<i32>,
    pub uploaded_by: Option<i32>,
    pub updated_at: i64,
}
