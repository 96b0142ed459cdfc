//! Case Service
//!
//! Case operations shared by the case routes. Every write that names an
//! agent goes through [`ensure_agent_exists`] before touching the store.

use chrono::NaiveDate;
use precinct_core::{
    parse_entity_id, Agent, Case, CaseId, CaseInput, CasePatch, CaseStatus, Predicate, Query,
    QueryError, SchemaPayload, SortDirective,
};
use precinct_storage::EntityStore;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::extractors::QueryParams;
use crate::services::integrity::ensure_agent_exists;

/// Query parameters accepted by the case listing.
pub const LIST_PARAMS: &[&str] = &["status", "agentId", "q", "sort"];

/// Query parameters accepted by the search endpoint.
pub const SEARCH_PARAMS: &[&str] = &["q"];

/// Build the listing query from `status`, `agentId` (alias `agente_id`),
/// `q` and `sort`.
pub fn list_query(mut params: QueryParams) -> Result<Query, QueryError> {
    let mut query = Query::new();

    if let Some(raw) = params.take("status", &[])? {
        let status = raw
            .parse::<CaseStatus>()
            .map_err(|e| QueryError::InvalidValue {
                param: "status".to_string(),
                reason: e.to_string(),
            })?;
        query = query.filter(Predicate::equals("status", status.as_str()));
    }

    if let Some(raw) = params.take("agentId", &["agente_id"])? {
        let agent_id = parse_entity_id(&raw).ok_or_else(|| QueryError::InvalidValue {
            param: "agentId".to_string(),
            reason: format!("'{}' is not a valid UUID", raw),
        })?;
        query = query.filter(Predicate::equals("agentId", &agent_id.to_string()));
    }

    if let Some(raw) = params.take_raw("q", &[])? {
        query = query.filter(Predicate::search(&raw)?);
    }

    if let Some(raw) = params.take("sort", &[])? {
        query = query.sort_by(SortDirective::parse(&raw, Case::SORTABLE)?);
    }

    params.finish(LIST_PARAMS)?;
    Ok(query)
}

/// Build the search query. `q` is mandatory and must not be blank.
pub fn search_query(mut params: QueryParams) -> Result<(Query, String), QueryError> {
    let term = params
        .take_raw("q", &[])?
        .ok_or(QueryError::MissingSearchTerm)?;
    let predicate = Predicate::search(&term)?;
    params.finish(SEARCH_PARAMS)?;
    Ok((Query::new().filter(predicate), term))
}

pub fn list(cases: &impl EntityStore<Case>, query: &Query) -> ApiResult<Vec<Case>> {
    let snapshot = cases.list()?;
    Ok(query.apply(&snapshot))
}

/// Run a search. An empty result is a 404, unlike the plain listing.
pub fn search(cases: &impl EntityStore<Case>, params: QueryParams) -> ApiResult<Vec<Case>> {
    let (query, term) = search_query(params)?;
    let found = list(cases, &query)?;
    if found.is_empty() {
        return Err(ApiError::no_matches(&term));
    }
    Ok(found)
}

pub fn get(cases: &impl EntityStore<Case>, id: CaseId) -> ApiResult<Case> {
    cases.get(id)?.ok_or_else(|| ApiError::case_not_found(id))
}

pub fn create(
    cases: &impl EntityStore<Case>,
    agents: &impl EntityStore<Agent>,
    payload: &Value,
    today: NaiveDate,
) -> ApiResult<Case> {
    let input = CaseInput::parse(payload, today)?;
    ensure_agent_exists(agents, input.agent_id)?;
    let case = cases.create(input)?;
    tracing::info!(case_id = %case.id, agent_id = %case.agent_id, status = %case.status, "Case created");
    Ok(case)
}

pub fn replace(
    cases: &impl EntityStore<Case>,
    agents: &impl EntityStore<Agent>,
    id: CaseId,
    payload: &Value,
    today: NaiveDate,
) -> ApiResult<Case> {
    let input = CaseInput::parse(payload, today)?;
    ensure_agent_exists(agents, input.agent_id)?;
    let case = cases
        .replace(id, input)?
        .ok_or_else(|| ApiError::case_not_found(id))?;
    tracing::info!(case_id = %case.id, "Case replaced");
    Ok(case)
}

/// Partial update. The agent reference is only checked when it changes.
pub fn patch(
    cases: &impl EntityStore<Case>,
    agents: &impl EntityStore<Agent>,
    id: CaseId,
    payload: &Value,
    today: NaiveDate,
) -> ApiResult<Case> {
    let patch = CasePatch::parse(payload, today)?;
    if let Some(agent_id) = patch.agent_id {
        ensure_agent_exists(agents, agent_id)?;
    }
    let case = cases
        .merge(id, patch)?
        .ok_or_else(|| ApiError::case_not_found(id))?;
    tracing::info!(case_id = %case.id, "Case patched");
    Ok(case)
}

pub fn delete(cases: &impl EntityStore<Case>, id: CaseId) -> ApiResult<()> {
    if !cases.delete(id)? {
        return Err(ApiError::case_not_found(id));
    }
    tracing::info!(case_id = %id, "Case deleted");
    Ok(())
}

/// The agent a case points at. The reference may dangle, in which case the
/// lookup fails while the case itself stays readable.
pub fn owning_agent(
    cases: &impl EntityStore<Case>,
    agents: &impl EntityStore<Agent>,
    id: CaseId,
) -> ApiResult<Agent> {
    let case = get(cases, id)?;
    agents.get(case.agent_id)?.ok_or_else(|| {
        tracing::debug!(case_id = %case.id, agent_id = %case.agent_id, "Case references a deleted agent");
        ApiError::agent_not_found(case.agent_id)
    })
}
