pub mod admin;
pub mod equipments;
pub mod files;
pub mod manufacturers;
pub mod search;

use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::web;

use crate::error::{ApiError, StoreError};

/// Run one store call on the blocking pool, labelling NOT-FOUND results
/// with the entity they concern.
pub(crate) async fn exec<T, F>(what: &'static str, op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    match web::block(op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ApiError::from_store(e, what)),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

pub(crate) fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
