//! Bot handlers, including bulk operations.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Bot, BotPatch, NewBot};
use crate::errors::AppResult;
use crate::query::ListQuery;
use crate::services::{BulkCreated, BulkDeleted, BulkModified};
use crate::types::{ApiResponse, Created, PaginatedResult};

/// Bulk creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkCreateRequest {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 bots required"), nested)]
    pub bots: Vec<NewBot>,
}

/// One entry of a bulk update
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct BotUpdate {
    pub id: i32,
    #[validate(nested)]
    pub data: BotPatch,
}

/// Bulk update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkUpdateRequest {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 updates required"), nested)]
    pub updates: Vec<BotUpdate>,
}

/// Bulk deletion request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkDeleteRequest {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 ids required"))]
    pub ids: Vec<i32>,
}

/// Create bot routes
pub fn bot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bots).post(create_bot))
        .route("/all", get(list_all_bots))
        .route(
            "/bulk",
            post(bulk_create_bots)
                .patch(bulk_update_bots)
                .delete(bulk_delete_bots),
        )
        .route("/:id", get(get_bot).patch(update_bot).delete(delete_bot))
}

/// List bots
#[utoipa::path(
    get,
    path = "/bots",
    tag = "Bots",
    params(
        ("filter" = Option<String>, Query, description = "Text searched in `fields`"),
        ("fields" = Option<String>, Query, description = "Comma separated fields to search"),
        ("sort" = Option<String>, Query, description = "Sort field, defaults to createdAt"),
        ("order" = Option<String>, Query, description = "asc or desc"),
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses((status = 200, description = "Paginated bots")),
    security(("bearer_auth" = []))
)]
pub async fn list_bots(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PaginatedResult<Bot>>> {
    Ok(Json(state.bot_service.list(&ListQuery::from(params)).await?))
}

/// List every bot matching the filters in one page
#[utoipa::path(
    get,
    path = "/bots/all",
    tag = "Bots",
    responses((status = 200, description = "All matching bots")),
    security(("bearer_auth" = []))
)]
pub async fn list_all_bots(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PaginatedResult<Bot>>> {
    Ok(Json(state.bot_service.list_all(&ListQuery::from(params)).await?))
}

/// Get a bot by id
#[utoipa::path(
    get,
    path = "/bots/{id}",
    tag = "Bots",
    params(("id" = i32, Path, description = "Bot id")),
    responses(
        (status = 200, description = "Bot found", body = Bot),
        (status = 404, description = "Bot not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_bot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Bot>>> {
    Ok(Json(ApiResponse::success(state.bot_service.get(id).await?)))
}

/// Create a bot
#[utoipa::path(
    post,
    path = "/bots",
    tag = "Bots",
    request_body = NewBot,
    responses(
        (status = 201, description = "Bot created", body = Bot),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Name already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_bot(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewBot>,
) -> AppResult<Created<Bot>> {
    Ok(Created(state.bot_service.create(payload).await?))
}

/// Update a bot
#[utoipa::path(
    patch,
    path = "/bots/{id}",
    tag = "Bots",
    params(("id" = i32, Path, description = "Bot id")),
    request_body = BotPatch,
    responses(
        (status = 200, description = "Bot updated", body = Bot),
        (status = 404, description = "Bot not found"),
        (status = 409, description = "Name already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_bot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<BotPatch>,
) -> AppResult<Json<ApiResponse<Bot>>> {
    Ok(Json(ApiResponse::success(
        state.bot_service.update(id, payload).await?,
    )))
}

/// Delete a bot, returning it
#[utoipa::path(
    delete,
    path = "/bots/{id}",
    tag = "Bots",
    params(("id" = i32, Path, description = "Bot id")),
    responses(
        (status = 200, description = "Bot deleted", body = Bot),
        (status = 404, description = "Bot not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_bot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Bot>>> {
    Ok(Json(ApiResponse::success(state.bot_service.delete(id).await?)))
}

/// Create several bots at once
#[utoipa::path(
    post,
    path = "/bots/bulk",
    tag = "Bots",
    request_body = BulkCreateRequest,
    responses(
        (status = 200, description = "Bots created", body = BulkCreated),
        (status = 400, description = "Validation error or duplicate names"),
        (status = 409, description = "A name is already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn bulk_create_bots(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BulkCreateRequest>,
) -> AppResult<Json<ApiResponse<BulkCreated>>> {
    Ok(Json(ApiResponse::success(
        state.bot_service.bulk_create(payload.bots).await?,
    )))
}

/// Update several bots at once
#[utoipa::path(
    patch,
    path = "/bots/bulk",
    tag = "Bots",
    request_body = BulkUpdateRequest,
    responses(
        (status = 200, description = "Bots updated", body = BulkModified),
        (status = 404, description = "A bot was not found"),
        (status = 409, description = "A name is already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn bulk_update_bots(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BulkUpdateRequest>,
) -> AppResult<Json<ApiResponse<BulkModified>>> {
    let updates = payload
        .updates
        .into_iter()
        .map(|update| (update.id, update.data))
        .collect();

    Ok(Json(ApiResponse::success(
        state.bot_service.bulk_update(updates).await?,
    )))
}

/// Delete several bots at once
#[utoipa::path(
    delete,
    path = "/bots/bulk",
    tag = "Bots",
    request_body = BulkDeleteRequest,
    responses((status = 200, description = "Bots deleted", body = BulkDeleted)),
    security(("bearer_auth" = []))
)]
pub async fn bulk_delete_bots(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BulkDeleteRequest>,
) -> AppResult<Json<ApiResponse<BulkDeleted>>> {
    Ok(Json(ApiResponse::success(
        state.bot_service.bulk_delete(payload.ids).await?,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_requests_validate_each_item() {
        let request: BulkCreateRequest = serde_json::from_value(serde_json::json!({
            "bots": [{ "name": "Atlas" }, { "name": "" }]
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("bots"));

        let request: BulkUpdateRequest = serde_json::from_value(serde_json::json!({
            "updates": [{ "id": 1, "data": { "description": "x".repeat(1001) } }]
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: BulkUpdateRequest = serde_json::from_value(serde_json::json!({
            "updates": [{ "id": 1, "data": { "isActive": false } }]
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }
}
