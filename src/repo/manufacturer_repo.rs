use diesel::prelude::*;

use crate::db::{self, Pool};
use crate::entity::manufacturer::{Manufacturer, NewManufacturer};
use crate::error::StoreError;
use crate::schema::manufacturers;

pub fn list(pool: &Pool) -> Result<Vec<Manufacturer>, StoreError> {
    let mut conn = db::acquire(pool)?;
    let rows = manufacturers::table
        .order(manufacturers::id.asc())
        .load::<Manufacturer>(&mut conn)?;
    Ok(rows)
}

pub fn get(pool: &Pool, id: i32) -> Result<Option<Manufacturer>, StoreError> {
    let mut conn = db::acquire(pool)?;
    let row = manufacturers::table
        .find(id)
        .first::<Manufacturer>(&mut conn)
        .optional()?;
    Ok(row)
}

pub fn create(
    pool: &Pool,
    name: &str,
    logo_path: Option<&str>,
    now: i64,
) -> Result<i32, StoreError> {
    let mut conn = db::acquire(pool)?;
    let row = NewManufacturer {
        name,
        logo_path,
        created_at: now,
        updated_at: now,
    };
    let id = diesel::insert_into(manufacturers::table)
        .values(&row)
        .returning(manufacturers::id)
        .get_result::<i32>(&mut conn)?;
    Ok(id)
}

/// Full-row replace; an absent logo clears the column.
pub fn update(
    pool: &Pool,
    id: i32,
    name: &str,
    logo_path: Option<&str>,
    now: i64,
) -> Result<(), StoreError> {
    let mut conn = db::acquire(pool)?;
    let affected = diesel::update(manufacturers::table.find(id))
        .set((
            manufacturers::name.eq(name),
            manufacturers::logo_path.eq(logo_path),
            manufacturers::updated_at.eq(now),
        ))
        .execute(&mut conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn delete(pool: &Pool, id: i32) -> Result<(), StoreError> {
    let mut conn = db::acquire(pool)?;
    let affected = diesel::delete(manufacturers::table.find(id)).execute(&mut conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Point the logo column at a freshly written file.
pub fn set_logo_path(pool: &Pool, id: i32, path: &str, now: i64) -> Result<(), StoreError> {
    let mut conn = db::acquire(pool)?;
    let affected = diesel::update(manufacturers::table.find(id))
        .set((
            manufacturers::logo_path.eq(Some(path)),
            manufacturers::updated_at.eq(now),
        ))
        .execute(&mut conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}
