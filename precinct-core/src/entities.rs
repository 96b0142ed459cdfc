//! Stored records and the write payloads that produce them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::str::FromStr;

use crate::enums::{AgentRole, CaseStatus, UnknownVariant};
use crate::error::{FieldError, ValidationErrors};
use crate::identity::{AgentId, CaseId, EntityId};
use crate::query::{Queryable, SortKey};
use crate::schema::{FieldKind, FieldSpec, Mode, Schema, Validated};

// ============================================================================
// RECORD TRAIT
// ============================================================================

/// A record kept in an entity store.
///
/// `Input` carries every mutable field (create/replace), `Patch` carries any
/// subset of them (merge). The identifier is never part of either.
pub trait Record: Clone + Send + Sync + 'static {
    type Input: Send;
    type Patch: Send;

    /// Human-readable type name used in messages and logs.
    const ENTITY_NAME: &'static str;

    fn id(&self) -> EntityId;

    fn from_input(id: EntityId, input: Self::Input) -> Self;

    /// Overwrite all mutable fields.
    fn replace(&mut self, input: Self::Input);

    /// Overwrite only the fields present in `patch`.
    fn merge(&mut self, patch: Self::Patch);
}

/// A write payload described by a [`Schema`].
pub trait SchemaPayload: Sized {
    const MODE: Mode;

    fn schema() -> &'static Schema;

    /// Build the typed payload from fields the schema already accepted.
    fn from_validated(validated: &Validated) -> Result<Self, ValidationErrors>;

    /// Validate a raw JSON payload and convert it.
    fn parse(payload: &Value, today: NaiveDate) -> Result<Self, ValidationErrors> {
        let validated = Self::schema().validate(payload, Self::MODE, today)?;
        Self::from_validated(&validated)
    }
}

fn parse_variant<T>(validated: &Validated, field: &str) -> Result<Option<T>, ValidationErrors>
where
    T: FromStr<Err = UnknownVariant>,
{
    validated
        .choice(field)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ValidationErrors::single(FieldError::new(field, e.to_string())))
        })
        .transpose()
}

fn require_variant<T>(validated: &Validated, field: &str) -> Result<T, ValidationErrors>
where
    T: FromStr<Err = UnknownVariant>,
{
    parse_variant(validated, field)?
        .ok_or_else(|| ValidationErrors::single(FieldError::required(field)))
}

// ============================================================================
// AGENT
// ============================================================================

/// An investigator on the department roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: AgentId,
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date", example = "2015-03-12"))]
    pub incorporation_date: NaiveDate,
    pub role: AgentRole,
}

/// Every mutable agent field (create and replace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AgentInput {
    /// 3 to 50 characters
    pub name: String,
    /// `YYYY-MM-DD`, not in the future
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date", example = "2015-03-12"))]
    pub incorporation_date: NaiveDate,
    pub role: AgentRole,
}

/// Any subset of the mutable agent fields (patch).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AgentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub incorporation_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AgentRole>,
}

fn parse_role(raw: &str) -> Option<&'static str> {
    raw.parse::<AgentRole>().ok().map(|role| role.as_str())
}

static AGENT_SCHEMA: Schema = Schema {
    fields: &[
        FieldSpec::required(
            "name",
            FieldKind::Text {
                min_len: 3,
                max_len: Some(50),
            },
        ),
        FieldSpec::required("incorporationDate", FieldKind::PastDate),
        FieldSpec::required(
            "role",
            FieldKind::Choice {
                allowed: AgentRole::NAMES,
                parse: parse_role,
            },
        ),
    ],
};

impl Agent {
    /// Filterable fields.
    pub const FILTERABLE: &'static [&'static str] = &["role"];
    /// Fields accepted by a sort directive.
    pub const SORTABLE: &'static [&'static str] = &["name", "incorporationDate"];
}

impl Record for Agent {
    type Input = AgentInput;
    type Patch = AgentPatch;

    const ENTITY_NAME: &'static str = "Agent";

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_input(id: EntityId, input: AgentInput) -> Self {
        Self {
            id,
            name: input.name,
            incorporation_date: input.incorporation_date,
            role: input.role,
        }
    }

    fn replace(&mut self, input: AgentInput) {
        self.name = input.name;
        self.incorporation_date = input.incorporation_date;
        self.role = input.role;
    }

    fn merge(&mut self, patch: AgentPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(date) = patch.incorporation_date {
            self.incorporation_date = date;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

impl SchemaPayload for AgentInput {
    const MODE: Mode = Mode::Full;

    fn schema() -> &'static Schema {
        &AGENT_SCHEMA
    }

    fn from_validated(validated: &Validated) -> Result<Self, ValidationErrors> {
        Ok(Self {
            name: validated.require_text("name")?,
            incorporation_date: validated.require_date("incorporationDate")?,
            role: require_variant(validated, "role")?,
        })
    }
}

impl SchemaPayload for AgentPatch {
    const MODE: Mode = Mode::Partial;

    fn schema() -> &'static Schema {
        &AGENT_SCHEMA
    }

    fn from_validated(validated: &Validated) -> Result<Self, ValidationErrors> {
        Ok(Self {
            name: validated.text("name"),
            incorporation_date: validated.date("incorporationDate"),
            role: parse_variant(validated, "role")?,
        })
    }
}

impl Queryable for Agent {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "role" => Some(Cow::Borrowed(self.role.as_str())),
            "name" => Some(Cow::Borrowed(self.name.as_str())),
            _ => None,
        }
    }

    fn search_haystacks(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn sort_key(&self, field: &str) -> Option<SortKey<'_>> {
        match field {
            "name" => Some(SortKey::Text(self.name.as_str())),
            "incorporationDate" => Some(SortKey::Date(self.incorporation_date)),
            _ => None,
        }
    }
}

// ============================================================================
// CASE
// ============================================================================

/// An investigation owned by one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Case {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: CaseId,
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
    /// Owning agent; checked at write time only, so it may dangle later
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub agent_id: AgentId,
}

/// Every mutable case field (create and replace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CaseInput {
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub agent_id: AgentId,
}

/// Any subset of the mutable case fields (patch).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CasePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub agent_id: Option<AgentId>,
}

fn parse_status(raw: &str) -> Option<&'static str> {
    raw.parse::<CaseStatus>().ok().map(|status| status.as_str())
}

const FREE_TEXT: FieldKind = FieldKind::Text {
    min_len: 1,
    max_len: None,
};

static CASE_SCHEMA: Schema = Schema {
    fields: &[
        FieldSpec::required("title", FREE_TEXT),
        FieldSpec::required("description", FREE_TEXT),
        FieldSpec::required(
            "status",
            FieldKind::Choice {
                allowed: CaseStatus::NAMES,
                parse: parse_status,
            },
        ),
        FieldSpec::required("agentId", FieldKind::Reference),
    ],
};

impl Case {
    /// Filterable fields.
    pub const FILTERABLE: &'static [&'static str] = &["status", "agentId"];
    /// Fields accepted by a sort directive.
    pub const SORTABLE: &'static [&'static str] = &["title", "status"];
}

impl Record for Case {
    type Input = CaseInput;
    type Patch = CasePatch;

    const ENTITY_NAME: &'static str = "Case";

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_input(id: EntityId, input: CaseInput) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            status: input.status,
            agent_id: input.agent_id,
        }
    }

    fn replace(&mut self, input: CaseInput) {
        self.title = input.title;
        self.description = input.description;
        self.status = input.status;
        self.agent_id = input.agent_id;
    }

    fn merge(&mut self, patch: CasePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(agent_id) = patch.agent_id {
            self.agent_id = agent_id;
        }
    }
}

impl SchemaPayload for CaseInput {
    const MODE: Mode = Mode::Full;

    fn schema() -> &'static Schema {
        &CASE_SCHEMA
    }

    fn from_validated(validated: &Validated) -> Result<Self, ValidationErrors> {
        Ok(Self {
            title: validated.require_text("title")?,
            description: validated.require_text("description")?,
            status: require_variant(validated, "status")?,
            agent_id: validated.require_reference("agentId")?,
        })
    }
}

impl SchemaPayload for CasePatch {
    const MODE: Mode = Mode::Partial;

    fn schema() -> &'static Schema {
        &CASE_SCHEMA
    }

    fn from_validated(validated: &Validated) -> Result<Self, ValidationErrors> {
        Ok(Self {
            title: validated.text("title"),
            description: validated.text("description"),
            status: parse_variant(validated, "status")?,
            agent_id: validated.reference("agentId"),
        })
    }
}

impl Queryable for Case {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "agentId" => Some(Cow::Owned(self.agent_id.to_string())),
            "title" => Some(Cow::Borrowed(self.title.as_str())),
            _ => None,
        }
    }

    fn search_haystacks(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn sort_key(&self, field: &str) -> Option<SortKey<'_>> {
        match field {
            "title" => Some(SortKey::Text(self.title.as_str())),
            "status" => Some(SortKey::Text(self.status.as_str())),
            _ => None,
        }
    }
}
