//! Case REST API Routes

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use precinct_core::{Agent, Case, CaseInput, CasePatch};

use crate::{
    error::{ApiError, ApiResult},
    extractors::{JsonBody, PathId, QueryParams},
    services::case_service,
    state::AppState,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /cases - List cases, optionally filtered and sorted
#[utoipa::path(
    get,
    path = "/cases",
    tag = "Cases",
    params(
        ("status" = Option<String>, Query, description = "open, in-progress or solved; case-insensitive"),
        ("agentId" = Option<String>, Query, description = "Owning agent (alias: agente_id)"),
        ("q" = Option<String>, Query, description = "Substring of title or description"),
        ("sort" = Option<String>, Query, description = "title or status, prefix with - for descending"),
    ),
    responses(
        (status = 200, description = "Matching cases (possibly empty)", body = [Case]),
        (status = 400, description = "Invalid query parameters", body = ApiError),
    ),
)]
pub async fn list_cases(
    State(state): State<AppState>,
    params: QueryParams,
) -> ApiResult<Json<Vec<Case>>> {
    let query = case_service::list_query(params)?;
    Ok(Json(case_service::list(&state.stores.cases, &query)?))
}

/// GET /cases/search - Full-text search over title and description
#[utoipa::path(
    get,
    path = "/cases/search",
    tag = "Cases",
    params(("q" = String, Query, description = "Search term, matched case-insensitively")),
    responses(
        (status = 200, description = "Matching cases", body = [Case]),
        (status = 400, description = "Missing or blank search term", body = ApiError),
        (status = 404, description = "Nothing matched", body = ApiError),
    ),
)]
pub async fn search_cases(
    State(state): State<AppState>,
    params: QueryParams,
) -> ApiResult<Json<Vec<Case>>> {
    Ok(Json(case_service::search(&state.stores.cases, params)?))
}

/// POST /cases - Open a new case
#[utoipa::path(
    post,
    path = "/cases",
    tag = "Cases",
    request_body = CaseInput,
    responses(
        (status = 201, description = "Case created", body = Case),
        (status = 400, description = "Invalid payload", body = ApiError),
        (status = 409, description = "Referenced agent does not exist", body = ApiError),
    ),
)]
pub async fn create_case(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody,
) -> ApiResult<impl IntoResponse> {
    let stores = &state.stores;
    let case = case_service::create(&stores.cases, &stores.agents, &payload, state.today())?;
    Ok((StatusCode::CREATED, Json(case)))
}

/// GET /cases/{id} - Get a case by ID
#[utoipa::path(
    get,
    path = "/cases/{id}",
    tag = "Cases",
    params(("id" = String, Path, description = "Case ID (UUID)")),
    responses(
        (status = 200, description = "Case details", body = Case),
        (status = 400, description = "Malformed ID", body = ApiError),
        (status = 404, description = "Case not found", body = ApiError),
    ),
)]
pub async fn get_case(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<Case>> {
    Ok(Json(case_service::get(&state.stores.cases, id)?))
}

/// PUT /cases/{id} - Replace every mutable field of a case
#[utoipa::path(
    put,
    path = "/cases/{id}",
    tag = "Cases",
    params(("id" = String, Path, description = "Case ID (UUID)")),
    request_body = CaseInput,
    responses(
        (status = 200, description = "Case replaced", body = Case),
        (status = 400, description = "Invalid payload or ID", body = ApiError),
        (status = 404, description = "Case not found", body = ApiError),
        (status = 409, description = "Referenced agent does not exist", body = ApiError),
    ),
)]
pub async fn replace_case(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(payload): JsonBody,
) -> ApiResult<Json<Case>> {
    let stores = &state.stores;
    let case = case_service::replace(&stores.cases, &stores.agents, id, &payload, state.today())?;
    Ok(Json(case))
}

/// PATCH /cases/{id} - Update some fields of a case
#[utoipa::path(
    patch,
    path = "/cases/{id}",
    tag = "Cases",
    params(("id" = String, Path, description = "Case ID (UUID)")),
    request_body = CasePatch,
    responses(
        (status = 200, description = "Case updated", body = Case),
        (status = 400, description = "Invalid payload or ID", body = ApiError),
        (status = 404, description = "Case not found", body = ApiError),
        (status = 409, description = "Referenced agent does not exist", body = ApiError),
    ),
)]
pub async fn patch_case(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(payload): JsonBody,
) -> ApiResult<Json<Case>> {
    let stores = &state.stores;
    let case = case_service::patch(&stores.cases, &stores.agents, id, &payload, state.today())?;
    Ok(Json(case))
}

/// DELETE /cases/{id} - Remove a case
#[utoipa::path(
    delete,
    path = "/cases/{id}",
    tag = "Cases",
    params(("id" = String, Path, description = "Case ID (UUID)")),
    responses(
        (status = 204, description = "Case deleted"),
        (status = 400, description = "Malformed ID", body = ApiError),
        (status = 404, description = "Case not found", body = ApiError),
    ),
)]
pub async fn delete_case(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    case_service::delete(&state.stores.cases, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /cases/{id}/agent - The agent responsible for a case
#[utoipa::path(
    get,
    path = "/cases/{id}/agent",
    tag = "Cases",
    params(("id" = String, Path, description = "Case ID (UUID)")),
    responses(
        (status = 200, description = "Owning agent", body = Agent),
        (status = 400, description = "Malformed ID", body = ApiError),
        (status = 404, description = "Case or agent not found", body = ApiError),
    ),
)]
pub async fn get_case_agent(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<Agent>> {
    let stores = &state.stores;
    Ok(Json(case_service::owning_agent(&stores.cases, &stores.agents, id)?))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the case routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cases).post(create_case))
        .route("/search", get(search_cases))
        .route(
            "/:id",
            get(get_case)
                .put(replace_case)
                .patch(patch_case)
                .delete(delete_case),
        )
        .route("/:id/agent", get(get_case_agent))
}
