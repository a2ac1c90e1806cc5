use diesel::prelude::*;

use crate::db::{self, Pool};
use crate::entity::equipment::{Equipment, NewEquipment};
use crate::error::StoreError;
use crate::schema::equipments;

pub fn list(pool: &Pool, manufacturer_id: Option<i32>) -> Result<Vec<Equipment>, StoreError> {
    let mut conn = db::acquire(pool)?;
    let mut query = equipments::table.order(equipments::id.asc()).into_boxed();
    if let Some(mid) = manufacturer_id {
        query = query.filter(equipments::manufacturer_id.eq(mid));
    }
    Ok(query.load::<Equipment>(&mut conn)?)
}

pub fn get(pool: &Pool, id: i32) -> Result<Option<Equipment>, StoreError> {
    let mut conn = db::acquire(pool)?;
    let row = equipments::table
        .find(id)
        .first::<Equipment>(&mut conn)
        .optional()?;
    Ok(row)
}

pub fn create(
    pool: &Pool,
    name: &str,
    model: &str,
    manufacturer_id: Option<i32>,
    image_path: Option<&str>,
    now: i64,
) -> Result<i32, StoreError> {
    let mut conn = db::acquire(pool)?;
    let row = NewEquipment {
        name,
        model,
        manufacturer_id,
        image_path,
        created_at: now,
        updated_at: now,
    };
    let id = diesel::insert_into(equipments::table)
        .values(&row)
        .returning(equipments::id)
        .get_result::<i32>(&mut conn)?;
    Ok(id)
}

/// Full-row replace; absent optional columns are cleared.
pub fn update(
    pool: &Pool,
    id: i32,
    name: &str,
    model: &str,
    manufacturer_id: Option<i32>,
    image_path: Option<&str>,
    now: i64,
) -> Result<(), StoreError> {
    let mut conn = db::acquire(pool)?;
    let affected = diesel::update(equipments::table.find(id))
        .set((
            equipments::name.eq(name),
            equipments::model.eq(model),
            equipments::manufacturer_id.eq(manufacturer_id),
            equipments::image_path.eq(image_path),
            equipments::updated_at.eq(now),
        ))
        .execute(&mut conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn delete(pool: &Pool, id: i32) -> Result<(), StoreError> {
    let mut conn = db::acquire(pool)?;
    let affected = diesel::delete(equipments::table.find(id)).execute(&mut conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Point the image column at a freshly written file.
pub fn set_image_path(pool: &Pool, id: i32, path: &str, now: i64) -> Result<(), StoreError> {
    let mut conn = db::acquire(pool)?;
    let affected = diesel::update(equipments::table.find(id))
        .set((
            equipments::image_path.eq(Some(path)),
            equipments::updated_at.eq(now),
        ))
        .execute(&mut conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}
