//! Agent Service
//!
//! Roster operations shared by the agent routes.

use chrono::NaiveDate;
use precinct_core::{
    Agent, AgentId, AgentInput, AgentPatch, AgentRole, Predicate, Query, QueryError,
    SchemaPayload, SortDirective,
};
use precinct_storage::EntityStore;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::extractors::QueryParams;

/// Query parameters accepted by the agent listing.
pub const LIST_PARAMS: &[&str] = &["role", "sort"];

/// Build the listing query from `role` (alias `cargo`) and `sort`.
pub fn list_query(mut params: QueryParams) -> Result<Query, QueryError> {
    let mut query = Query::new();

    if let Some(raw) = params.take("role", &["cargo"])? {
        let role = raw
            .parse::<AgentRole>()
            .map_err(|e| QueryError::InvalidValue {
                param: "role".to_string(),
                reason: e.to_string(),
            })?;
        query = query.filter(Predicate::equals("role", role.as_str()));
    }

    if let Some(raw) = params.take("sort", &[])? {
        query = query.sort_by(SortDirective::parse(&raw, Agent::SORTABLE)?);
    }

    params.finish(LIST_PARAMS)?;
    Ok(query)
}

pub fn list(agents: &impl EntityStore<Agent>, query: &Query) -> ApiResult<Vec<Agent>> {
    let snapshot = agents.list()?;
    Ok(query.apply(&snapshot))
}

pub fn get(agents: &impl EntityStore<Agent>, id: AgentId) -> ApiResult<Agent> {
    agents.get(id)?.ok_or_else(|| ApiError::agent_not_found(id))
}

pub fn create(agents: &impl EntityStore<Agent>, payload: &Value, today: NaiveDate) -> ApiResult<Agent> {
    let input = AgentInput::parse(payload, today)?;
    let agent = agents.create(input)?;
    tracing::info!(agent_id = %agent.id, role = %agent.role, "Agent created");
    Ok(agent)
}

/// Full update: every mutable field is required.
pub fn replace(
    agents: &impl EntityStore<Agent>,
    id: AgentId,
    payload: &Value,
    today: NaiveDate,
) -> ApiResult<Agent> {
    let input = AgentInput::parse(payload, today)?;
    let agent = agents
        .replace(id, input)?
        .ok_or_else(|| ApiError::agent_not_found(id))?;
    tracing::info!(agent_id = %agent.id, "Agent replaced");
    Ok(agent)
}

/// Partial update: any non-empty subset of the mutable fields.
pub fn patch(
    agents: &impl EntityStore<Agent>,
    id: AgentId,
    payload: &Value,
    today: NaiveDate,
) -> ApiResult<Agent> {
    let patch = AgentPatch::parse(payload, today)?;
    let agent = agents
        .merge(id, patch)?
        .ok_or_else(|| ApiError::agent_not_found(id))?;
    tracing::info!(agent_id = %agent.id, "Agent patched");
    Ok(agent)
}

/// Remove an agent. Cases that reference it are left untouched.
pub fn delete(agents: &impl EntityStore<Agent>, id: AgentId) -> ApiResult<()> {
    if !agents.delete(id)? {
        return Err(ApiError::agent_not_found(id));
    }
    tracing::info!(agent_id = %id, "Agent deleted");
    Ok(())
}
