use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

use super::{
    ApiResult,
    models::{CreateItemRequest, DeleteResponse, HealthResponse, UpdateItemRequest, parse_body},
    state::AppState,
};
use crate::core::Item;

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

pub async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Item>>> {
    let items = state.store.list().await?;
    Ok(Json(items))
}

pub async fn create_item(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let draft = parse_body::<CreateItemRequest>(&body)?.validate()?;

    let existing = state.store.list().await?;
    let id = mint_id(|candidate| existing.iter().any(|item| item.id == candidate));

    let item = state.store.append(draft.into_item(id)).await?;
    info!(id = %item.id, name = %item.name, "item created");

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Item>> {
    let patch = parse_body::<UpdateItemRequest>(&body)?.into_patch();

    let item = state.store.update(&id, &patch).await?;
    info!(id = %item.id, "item updated");

    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let removed = state.store.remove(&id).await?;
    info!(id = %removed.id, "item deleted");

    Ok(Json(DeleteResponse {
        success: true,
        removed,
    }))
}

fn mint_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if !is_taken(&candidate) {
            return candidate;
        }
    }
}
