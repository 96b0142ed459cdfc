//! Case-to-agent reference checks.
//!
//! References are checked when a case is written and never again, so a case
//! may outlive its agent.

use precinct_core::{Agent, AgentId};
use precinct_storage::EntityStore;

use crate::error::{ApiError, ApiResult};

/// Whether `agent_id` names a stored agent.
pub fn agent_exists(agents: &impl EntityStore<Agent>, agent_id: AgentId) -> ApiResult<bool> {
    Ok(agents.exists(agent_id)?)
}

/// Refuse a case write whose agent does not exist (409).
pub fn ensure_agent_exists(agents: &impl EntityStore<Agent>, agent_id: AgentId) -> ApiResult<()> {
    if agent_exists(agents, agent_id)? {
        return Ok(());
    }
    tracing::warn!(agent_id = %agent_id, "Case write references unknown agent");
    Err(ApiError::referenced_agent_not_found(agent_id))
}
