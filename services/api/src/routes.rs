//! Entity routes
//!
//! The list/get/create/update/delete handlers are written once and
//! instantiated per entity through [`Details`].

use std::sync::Arc;

use auth::middleware::AuthUser;
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::{ApiError, ApiResult, Envelope, JsonBody, Record, Repository};
use serde_json::{Value, json};
use tracing::info;

use crate::models::{Details, Stamped};

/// Shared handle to an entity collection
pub type Store<D> = Arc<dyn Repository<Stamped<D>>>;

/// Routes for one entity type: `/{path}` and `/{path}/:id`
pub fn entity_routes<D: Details>(store: Store<D>) -> Router {
    let collection = format!("/{}", D::PATH);
    let item = format!("/{}/:id", D::PATH);

    Router::new()
        .route(&collection, get(list::<D>).post(create::<D>))
        .route(
            &item,
            get(fetch::<D>).put(update::<D>).delete(remove::<D>),
        )
        .with_state(store)
}

/// Health check endpoint
pub async fn ping(State(message): State<Arc<str>>) -> impl IntoResponse {
    Json(json!({ "message": &*message }))
}

/// Username for log lines; `anonymous` when entity routes are unprotected
fn actor(caller: &Option<Extension<AuthUser>>) -> &str {
    caller
        .as_ref()
        .map_or("anonymous", |Extension(user)| user.username.as_str())
}

fn not_found<D: Details>() -> ApiError {
    ApiError::NotFound(format!("{} not found", D::LABEL))
}

/// List all records
pub async fn list<D: Details>(
    State(store): State<Store<D>>,
) -> ApiResult<Envelope<Vec<Stamped<D>>>> {
    let records = store.list().await?;
    Ok(Envelope::list(records))
}

/// Get a record by ID
pub async fn fetch<D: Details>(
    State(store): State<Store<D>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<Stamped<D>>> {
    let record = store.get(&id).await?.ok_or_else(not_found::<D>)?;
    Ok(Envelope::ok(record))
}

/// Create a new record
pub async fn create<D: Details>(
    State(store): State<Store<D>>,
    caller: Option<Extension<AuthUser>>,
    JsonBody(details): JsonBody<D>,
) -> ApiResult<(StatusCode, Envelope<Stamped<D>>)> {
    details.validate().map_err(ApiError::Validation)?;

    let record = store.create(details).await?;
    info!("{} created {} {}", actor(&caller), D::LABEL, record.id());

    Ok((
        StatusCode::CREATED,
        Envelope::ok(record).with_message(format!("{} created successfully", D::LABEL)),
    ))
}

/// Merge a partial update into a record.
///
/// A `version` key in the body turns the update into a compare-and-swap
/// against the stored version.
pub async fn update<D: Details>(
    State(store): State<Store<D>>,
    caller: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Envelope<Stamped<D>>> {
    let Value::Object(mut patch) = body else {
        return Err(ApiError::Validation(
            "Update body must be a JSON object".to_string(),
        ));
    };

    let expected_version = match patch.remove("version") {
        None | Some(Value::Null) => None,
        Some(version) => Some(version.as_u64().ok_or_else(|| {
            ApiError::Validation("version must be a non-negative integer".to_string())
        })?),
    };

    let record = store
        .update(&id, patch, expected_version)
        .await?
        .ok_or_else(not_found::<D>)?;
    info!(
        "{} updated {} {} to version {}",
        actor(&caller),
        D::LABEL,
        record.id,
        record.version
    );

    Ok(Envelope::ok(record).with_message(format!("{} updated successfully", D::LABEL)))
}

/// Delete a record by ID
pub async fn remove<D: Details>(
    State(store): State<Store<D>>,
    caller: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<()>> {
    if !store.delete(&id).await? {
        return Err(not_found::<D>());
    }

    info!("{} deleted {} {}", actor(&caller), D::LABEL, id);
    Ok(Envelope::done(format!("{} deleted successfully", D::LABEL)))
}
