//! CRUD handlers, generic over the record type.
//!
//! Each collection is mounted by [`resource`]; the handlers reach their
//! table through [`Stored::repository`].

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use crate::db::Stored;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{Draft, Entity, Patch};
use crate::state::AppState;

/// Routes for one collection under `/api/{collection}`.
pub fn resource<T: Stored>() -> Router<AppState> {
    let collection = format!("/api/{}", T::COLLECTION);
    let item = format!("{collection}/{{id}}");

    Router::new()
        .route(&collection, get(list::<T>).post(create::<T>))
        .route(
            &item,
            get(detail::<T>)
                .put(replace::<T>)
                .patch(update::<T>)
                .delete(remove::<T>),
        )
}

fn not_found<T: Entity>(id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} {id}", T::KIND))
}

/// Keys are integers; anything else cannot name a record.
fn record_id<T: Entity>(path: std::result::Result<Path<i32>, PathRejection>) -> Result<T::Id> {
    path.map(|Path(id)| T::Id::from(id))
        .map_err(|_| AppError::NotFound(T::KIND.to_string()))
}

/// List every record, ordered by key.
///
/// GET /api/{collection}
#[instrument(skip(state), fields(kind = T::KIND))]
pub async fn list<T: Stored>(State(state): State<AppState>) -> Result<Json<Vec<T>>> {
    let records = T::repository(state.store()).list().await?;
    Ok(Json(records))
}

/// Fetch one record.
///
/// GET /api/{collection}/{id}
#[instrument(skip_all, fields(kind = T::KIND))]
pub async fn detail<T: Stored>(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<T>> {
    let id = record_id::<T>(path)?;
    let record = T::repository(state.store())
        .get(id)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    Ok(Json(record))
}

/// Create a record.
///
/// POST /api/{collection}
#[instrument(skip_all, fields(kind = T::KIND))]
pub async fn create<T: Stored>(
    State(state): State<AppState>,
    payload: std::result::Result<Json<T::Draft>, JsonRejection>,
) -> Result<(StatusCode, Json<T>)> {
    let Json(draft) = payload?;
    draft.validate()?;

    let record = T::repository(state.store()).create(&draft).await?;
    let id = record.id().to_string();
    add_breadcrumb("records", &format!("Created {}", T::KIND), Some(&[("id", &id)]));
    tracing::info!(id = %id, "Record created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// Replace every writable field of a record.
///
/// PUT /api/{collection}/{id}
#[instrument(skip_all, fields(kind = T::KIND))]
pub async fn replace<T: Stored>(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<T::Draft>, JsonRejection>,
) -> Result<Json<T>> {
    let id = record_id::<T>(path)?;
    let Json(draft) = payload?;
    draft.validate()?;

    let record = T::repository(state.store())
        .update(id, &draft)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    add_breadcrumb("records", &format!("Replaced {}", T::KIND), Some(&[("id", &id.to_string())]));

    Ok(Json(record))
}

/// Update the fields present in the body.
///
/// PATCH /api/{collection}/{id}
#[instrument(skip_all, fields(kind = T::KIND))]
pub async fn update<T: Stored>(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<T::Patch>, JsonRejection>,
) -> Result<Json<T>> {
    let id = record_id::<T>(path)?;
    let Json(patch) = payload?;
    let repository = T::repository(state.store());

    let current = repository.get(id).await?.ok_or_else(|| not_found::<T>(id))?;
    let mut draft = current.to_draft();
    patch.apply_to(&mut draft);
    draft.validate()?;

    // A concurrent delete between the read and the write also lands here.
    let record = repository
        .update(id, &draft)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    add_breadcrumb("records", &format!("Updated {}", T::KIND), Some(&[("id", &id.to_string())]));

    Ok(Json(record))
}

/// Delete a record.
///
/// DELETE /api/{collection}/{id}
#[instrument(skip_all, fields(kind = T::KIND))]
pub async fn remove<T: Stored>(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<StatusCode> {
    let id = record_id::<T>(path)?;
    if !T::repository(state.store()).delete(id).await? {
        return Err(not_found::<T>(id));
    }
    add_breadcrumb("records", &format!("Deleted {}", T::KIND), Some(&[("id", &id.to_string())]));
    tracing::info!(id = %id, "Record deleted");

    Ok(StatusCode::NO_CONTENT)
}
