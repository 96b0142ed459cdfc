//! Identity types for PRECINCT records

use uuid::Uuid;

/// Record identifier using UUIDv7 for timestamp-sortable IDs.
pub type EntityId = Uuid;

/// Identifier of an [`crate::Agent`].
pub type AgentId = EntityId;

/// Identifier of a [`crate::Case`].
pub type CaseId = EntityId;

/// Length of the canonical hyphenated UUID form (8-4-4-4-12).
const HYPHENATED_LEN: usize = 36;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

/// Parse an identifier in its hyphenated form.
///
/// `Uuid::parse_str` also accepts the simple, braced and URN forms; those are
/// not identifiers this service ever hands out, so they are refused here.
pub fn parse_entity_id(raw: &str) -> Option<EntityId> {
    if raw.len() != HYPHENATED_LEN {
        return None;
    }
    Uuid::parse_str(raw).ok()
}
