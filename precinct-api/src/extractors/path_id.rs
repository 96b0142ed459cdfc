//! Path extractor for entity identifiers.
//!
//! Unlike `Path<Uuid>`, which also accepts simple and braced forms and
//! rejects with plain text, `PathId` only accepts the hyphenated form and
//! rejects with a structured `INVALID_FORMAT` body.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use precinct_core::{parse_entity_id, EntityId};

use crate::error::ApiError;

/// Extractor for the `:id` path parameter.
///
/// ```rust,ignore
/// async fn get_agent(PathId(agent_id): PathId) -> ApiResult<Json<Agent>> {
///     // agent_id is a parsed EntityId
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub EntityId);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                ApiError::invalid_format("id", &format!("a single path identifier ({})", e))
            })?;

        parse_entity_id(&raw)
            .map(PathId)
            .ok_or_else(|| ApiError::invalid_format("id", &format!("a UUID, got '{}'", raw)))
    }
}
