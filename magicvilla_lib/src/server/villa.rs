//! `/api/villa` handlers.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Json, Router,
};

use super::resp;
use super::AppState;
use crate::db::{Db, DbError, VillaFilter};
use crate::patch::apply_patch;
use crate::types::{
    PatchOperation, VillaCreateDto, VillaDto, VillaID, VillaUpdateDto,
};

pub fn router() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/api/villa", get(list_villas).post(create_villa))
        .route(
            "/api/villa/:id",
            get(get_villa)
                .put(update_villa)
                .patch(patch_villa)
                .delete(delete_villa),
        )
}

fn storage_failure(err: DbError) -> Response {
    tracing::error!("Villa storage failed: {}", err);
    resp::internal(err.to_string())
}

fn zero_id() -> Response {
    resp::bad_request("Villa id must not be 0")
}

fn missing(id: VillaID) -> Response {
    resp::not_found(format!("Villa with id {} was not found", id))
}

fn duplicate_name() -> Response {
    resp::bad_request("Villa already Exists!")
}

/// True when another villa already uses `name`, ignoring case.
fn name_taken(db: &Db, name: &str, own_id: Option<VillaID>) -> Result<bool, DbError> {
    let existing = db.get(&VillaFilter::by_name(name))?;
    Ok(existing.map_or(false, |villa| Some(villa.id) != own_id))
}

async fn list_villas(State(state): State<AppState>) -> Response {
    let db = state.db();
    match db.get_all(None) {
        Ok(villas) => resp::ok(villas.into_iter().map(VillaDto::from).collect::<Vec<_>>()),
        Err(e) => storage_failure(e),
    }
}

async fn get_villa(State(state): State<AppState>, Path(id): Path<VillaID>) -> Response {
    if id == 0 {
        tracing::warn!("Get villa error with id {}", id);
        return zero_id();
    }

    let db = state.db();
    match db.get(&VillaFilter::by_id(id)) {
        Ok(Some(villa)) => resp::ok(VillaDto::from(villa)),
        Ok(None) => missing(id),
        Err(e) => storage_failure(e),
    }
}

async fn create_villa(State(state): State<AppState>, Json(mut dto): Json<VillaCreateDto>) -> Response {
    dto.name = dto.name.trim().to_string();
    let errors = dto.validation_errors();
    if !errors.is_empty() {
        return resp::error(axum::http::StatusCode::BAD_REQUEST, errors);
    }

    let db = state.db();
    match name_taken(&db, &dto.name, None) {
        Ok(true) => return duplicate_name(),
        Ok(false) => {}
        Err(e) => return storage_failure(e),
    }

    match db.create(&dto) {
        Ok(villa) => {
            tracing::info!("Created villa {} ({})", villa.id, villa.name);
            let location = format!("/api/villa/{}", villa.id);
            resp::created(VillaDto::from(villa), location)
        }
        Err(e) => storage_failure(e),
    }
}

async fn update_villa(
    State(state): State<AppState>,
    Path(id): Path<VillaID>,
    Json(mut dto): Json<VillaUpdateDto>,
) -> Response {
    if id == 0 {
        return zero_id();
    }
    dto.name = dto.name.trim().to_string();
    if id != dto.id {
        return resp::bad_request(format!(
            "Route id {} does not match body id {}",
            id, dto.id
        ));
    }
    let errors = dto.validation_errors();
    if !errors.is_empty() {
        return resp::error(axum::http::StatusCode::BAD_REQUEST, errors);
    }

    let db = state.db();
    match db.get(&VillaFilter::by_id(id)) {
        Ok(Some(_)) => {}
        Ok(None) => return missing(id),
        Err(e) => return storage_failure(e),
    }
    match name_taken(&db, &dto.name, Some(id)) {
        Ok(true) => return duplicate_name(),
        Ok(false) => {}
        Err(e) => return storage_failure(e),
    }

    match db.update(&dto) {
        Ok(true) => resp::no_content(),
        Ok(false) => missing(id),
        Err(e) => storage_failure(e),
    }
}

async fn patch_villa(
    State(state): State<AppState>,
    Path(id): Path<VillaID>,
    Json(ops): Json<Vec<PatchOperation>>,
) -> Response {
    if id == 0 {
        return zero_id();
    }
    if ops.is_empty() {
        return resp::bad_request("Patch document must contain at least one operation");
    }

    let db = state.db();
    let villa = match db.get(&VillaFilter::by_id(id)) {
        Ok(Some(villa)) => villa,
        Ok(None) => return missing(id),
        Err(e) => return storage_failure(e),
    };

    let mut patched = match apply_patch(&VillaUpdateDto::from(&villa), &ops) {
        Ok(patched) => patched,
        Err(e) => return resp::bad_request(e.to_string()),
    };
    patched.name = patched.name.trim().to_string();
    let errors = patched.validation_errors();
    if !errors.is_empty() {
        return resp::error(axum::http::StatusCode::BAD_REQUEST, errors);
    }
    match name_taken(&db, &patched.name, Some(id)) {
        Ok(true) => return duplicate_name(),
        Ok(false) => {}
        Err(e) => return storage_failure(e),
    }

    match db.update(&patched) {
        Ok(true) => resp::no_content(),
        Ok(false) => missing(id),
        Err(e) => storage_failure(e),
    }
}

async fn delete_villa(State(state): State<AppState>, Path(id): Path<VillaID>) -> Response {
    if id == 0 {
        return zero_id();
    }

    let db = state.db();
    match db.remove(id) {
        Ok(true) => {
            tracing::info!("Deleted villa {}", id);
            resp::no_content()
        }
        Ok(false) => missing(id),
        Err(e) => storage_failure(e),
    }
}
