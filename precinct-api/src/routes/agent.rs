//! Agent REST API Routes
//!
//! Thin handlers over [`agent_service`]; all rules live there.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use precinct_core::{Agent, AgentInput, AgentPatch};

use crate::{
    error::{ApiError, ApiResult},
    extractors::{JsonBody, PathId, QueryParams},
    services::agent_service,
    state::AppState,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /agents - List agents, optionally filtered and sorted
#[utoipa::path(
    get,
    path = "/agents",
    tag = "Agents",
    params(
        ("role" = Option<String>, Query, description = "Filter by role (alias: cargo), case-insensitive"),
        ("sort" = Option<String>, Query, description = "name or incorporationDate, prefix with - for descending"),
    ),
    responses(
        (status = 200, description = "Matching agents (possibly empty)", body = [Agent]),
        (status = 400, description = "Invalid query parameters", body = ApiError),
    ),
)]
pub async fn list_agents(
    State(state): State<AppState>,
    params: QueryParams,
) -> ApiResult<Json<Vec<Agent>>> {
    let query = agent_service::list_query(params)?;
    let agents = agent_service::list(&state.stores.agents, &query)?;
    Ok(Json(agents))
}

/// POST /agents - Register a new agent
#[utoipa::path(
    post,
    path = "/agents",
    tag = "Agents",
    request_body = AgentInput,
    responses(
        (status = 201, description = "Agent created", body = Agent),
        (status = 400, description = "Invalid payload", body = ApiError),
    ),
)]
pub async fn create_agent(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody,
) -> ApiResult<impl IntoResponse> {
    let agent = agent_service::create(&state.stores.agents, &payload, state.today())?;
    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /agents/{id} - Get an agent by ID
#[utoipa::path(
    get,
    path = "/agents/{id}",
    tag = "Agents",
    params(("id" = String, Path, description = "Agent ID (UUID)")),
    responses(
        (status = 200, description = "Agent details", body = Agent),
        (status = 400, description = "Malformed ID", body = ApiError),
        (status = 404, description = "Agent not found", body = ApiError),
    ),
)]
pub async fn get_agent(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<Agent>> {
    Ok(Json(agent_service::get(&state.stores.agents, id)?))
}

/// PUT /agents/{id} - Replace every mutable field of an agent
#[utoipa::path(
    put,
    path = "/agents/{id}",
    tag = "Agents",
    params(("id" = String, Path, description = "Agent ID (UUID)")),
    request_body = AgentInput,
    responses(
        (status = 200, description = "Agent replaced", body = Agent),
        (status = 400, description = "Invalid payload or ID", body = ApiError),
        (status = 404, description = "Agent not found", body = ApiError),
    ),
)]
pub async fn replace_agent(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(payload): JsonBody,
) -> ApiResult<Json<Agent>> {
    let agent = agent_service::replace(&state.stores.agents, id, &payload, state.today())?;
    Ok(Json(agent))
}

/// PATCH /agents/{id} - Update some fields of an agent
#[utoipa::path(
    patch,
    path = "/agents/{id}",
    tag = "Agents",
    params(("id" = String, Path, description = "Agent ID (UUID)")),
    request_body = AgentPatch,
    responses(
        (status = 200, description = "Agent updated", body = Agent),
        (status = 400, description = "Invalid payload or ID", body = ApiError),
        (status = 404, description = "Agent not found", body = ApiError),
    ),
)]
pub async fn patch_agent(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(payload): JsonBody,
) -> ApiResult<Json<Agent>> {
    let agent = agent_service::patch(&state.stores.agents, id, &payload, state.today())?;
    Ok(Json(agent))
}

/// DELETE /agents/{id} - Remove an agent
#[utoipa::path(
    delete,
    path = "/agents/{id}",
    tag = "Agents",
    params(("id" = String, Path, description = "Agent ID (UUID)")),
    responses(
        (status = 204, description = "Agent deleted"),
        (status = 400, description = "Malformed ID", body = ApiError),
        (status = 404, description = "Agent not found", body = ApiError),
    ),
)]
pub async fn delete_agent(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    agent_service::delete(&state.stores.agents, id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the agent routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_agents).post(create_agent))
        .route(
            "/:id",
            get(get_agent)
                .put(replace_agent)
                .patch(patch_agent)
                .delete(delete_agent),
        )
}
