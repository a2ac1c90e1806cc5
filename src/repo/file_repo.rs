use diesel::prelude::*;

use crate::db::{self, Pool};
use crate::entity::file_record::{FileChanges, FileKind, FileMetadataInput, FileRecord, NewFileRecord};
use crate::error::StoreError;
use crate::schema::files;

pub fn list(
    pool: &Pool,
    equipment_id: Option<i32>,
    kind: Option<FileKind>,
) -> Result<Vec<FileRecord>, StoreError> {
    let mut conn = db::acquire(pool)?;
    let mut query = files::table.order(files::id.asc()).into_boxed();
    if let Some(eid) = equipment_id {
        query = query.filter(files::equipment_id.eq(eid));
    }
    if let Some(kind) = kind {
        query = query.filter(files::kind.eq(kind.as_str()));
    }
    Ok(query.load::<FileRecord>(&mut conn)?)
}

pub fn get(pool: &Pool, id: i32) -> Result<Option<FileRecord>, StoreError> {
    let mut conn = db::acquire(pool)?;
    let row = files::table
        .find(id)
        .first::<FileRecord>(&mut conn)
        .optional()?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub fn create(
    pool: &Pool,
    name: &str,
    kind: FileKind,
    equipment_id: Option<i32>,
    file_path: &str,
    file_size: i64,
    uploaded_by: Option<i32>,
    now: i64,
) -> Result<i32, StoreError> {
    let mut conn = db::acquire(pool)?;
    let row = NewFileRecord {
        name,
        kind: kind.as_str(),
        equipment_id,
        file_path,
        file_size,
        uploaded_by,
        created_at: now,
        updated_at: now,
    };
    let id = diesel::insert_into(files::table)
        .values(&row)
        .returning(files::id)
        .get_result::<i32>(&mut conn)?;
    Ok(id)
}

/// Partial metadata update; only the supplied fields change.
pub fn update_metadata(
    pool: &Pool,
    id: i32,
    input: &FileMetadataInput,
    now: i64,
) -> Result<(), StoreError> {
    let mut conn = db::acquire(pool)?;
    let changes = FileChanges {
        name: input.name.as_deref(),
        kind: input.kind.as_deref(),
        equipment_id: input.equipment_id,
        uploaded_by: input.uploaded_by,
        updated_at: now,
    };
    let affected = diesel::update(files::table.find(id))
        .set(&changes)
        .execute(&mut conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn delete(pool: &Pool, id: i32) -> Result<(), StoreError> {
    let mut conn = db::acquire(pool)?;
    let affected = diesel::delete(files::table.find(id)).execute(&mut conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Single-statement increment; concurrent requests serialize at the store,
/// never through a read-modify-write in this process. Returns the new count.
pub fn increment_download_count(pool: &Pool, id: i32) -> Result<i64, StoreError> {
    let mut conn = db::acquire(pool)?;
    let affected = diesel::update(files::table.find(id))
        .set(files::download_count.eq(files::download_count + 1))
        .execute(&mut conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    let count = files::table
        .find(id)
        .select(files::download_count)
        .first::<i64>(&mut conn)?;
    Ok(count)
}
