//! OpenAPI Specification for PRECINCT API
//!
//! Generated with utoipa from the route annotations and the schema types of
//! `precinct-core`.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{agent, case, health};

use precinct_core::{
    Agent, AgentInput, AgentPatch, AgentRole, Case, CaseInput, CasePatch, CaseStatus, FieldError,
};

/// OpenAPI document for PRECINCT API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PRECINCT API",
        version = "0.1.0",
        description = "Police department registry of agents and the cases assigned to them",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Agents", description = "Agent roster management"),
        (name = "Cases", description = "Case registration, search and assignment"),
        (name = "Health", description = "Liveness and readiness checks")
    ),
    paths(
        // === Agent Routes ===
        agent::list_agents,
        agent::create_agent,
        agent::get_agent,
        agent::replace_agent,
        agent::patch_agent,
        agent::delete_agent,

        // === Case Routes ===
        case::list_cases,
        case::search_cases,
        case::create_case,
        case::get_case,
        case::replace_case,
        case::patch_case,
        case::delete_case,
        case::get_case_agent,

        // === Health Routes ===
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            Agent,
            AgentInput,
            AgentPatch,
            AgentRole,
            Case,
            CaseInput,
            CasePatch,
            CaseStatus,
            FieldError,
            ApiError,
            ErrorCode,
            health::HealthResponse,
            health::HealthStatus,
            health::HealthDetails,
            health::ComponentHealth,
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
