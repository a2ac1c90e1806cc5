use std::collections::BTreeMap;

use diesel::dsl::{count_star, sql};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};
use serde::Serialize;

use crate::db::{self, Pool};
use crate::error::StoreError;
use crate::schema::{equipments, files, manufacturers};

/// Aggregate counters served by `GET /admin/stats`.
#[derive(Debug, Serialize)]
pub struct SystemStats {
    pub total_manufacturers: i64,
    pub total_equipments: i64,
    pub total_files: i64,
    pub total_downloads: i64,
    pub files_by_type: BTreeMap<String, i64>,
}

pub fn collect(pool: &Pool) -> Result<SystemStats, StoreError> {
    let mut conn = db::acquire(pool)?;
    let total_manufacturers = manufacturers::table.count().get_result::<i64>(&mut conn)?;
    let total_equipments = equipments::table.count().get_result::<i64>(&mut conn)?;
    let total_files = files::table.count().get_result::<i64>(&mut conn)?;
    let total_downloads = files::table
        .select(sql::<Nullable<BigInt>>("SUM(download_count)"))
        .get_result::<Option<i64>>(&mut conn)?
        .unwrap_or(0);
    let by_kind = files::table
        .group_by(files::kind)
        .select((files::kind, count_star()))
        .load::<(String, i64)>(&mut conn)?;
    Ok(SystemStats {
        total_manufacturers,
        total_equipments,
        total_files,
        total_downloads,
        files_by_type: by_kind.into_iter().collect(),
    })
}
