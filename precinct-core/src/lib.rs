//! PRECINCT Core - Records, Schemas and Queries
//!
//! Data types for the agents & cases service plus the two pieces of logic
//! every layer above relies on: payload validation ([`schema`]) and the
//! snapshot query engine ([`query`]). Nothing in this crate performs I/O.

pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod query;
pub mod schema;

pub use entities::{
    Agent, AgentInput, AgentPatch, Case, CaseInput, CasePatch, Record, SchemaPayload,
};
pub use enums::{AgentRole, CaseStatus, UnknownVariant};
pub use error::{FieldError, QueryError, StorageError, StorageResult, ValidationErrors};
pub use identity::{new_entity_id, parse_entity_id, AgentId, CaseId, EntityId};
pub use query::{Predicate, Query, Queryable, SortDirective, SortKey};
pub use schema::{
    parse_calendar_date, DateProblem, FieldKind, FieldSpec, FieldValue, Mode, Schema, Validated,
    BODY_FIELD, ID_FIELD,
};
