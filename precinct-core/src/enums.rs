//! Enum types for PRECINCT records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase and trim a token; spaces and underscores become hyphens so
/// "In Progress" and "in_progress" both land on "in-progress".
fn normalize_token(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

// ============================================================================
// AGENT ROLE
// ============================================================================

/// Rank an agent holds within the department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Inspector,
    Delegate,
    Investigator,
    Clerk,
}

impl AgentRole {
    /// Canonical spellings, in declaration order.
    pub const NAMES: &'static [&'static str] = &["inspector", "delegate", "investigator", "clerk"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Inspector => "inspector",
            AgentRole::Delegate => "delegate",
            AgentRole::Investigator => "investigator",
            AgentRole::Clerk => "clerk",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "inspector" => Ok(AgentRole::Inspector),
            "delegate" => Ok(AgentRole::Delegate),
            "investigator" => Ok(AgentRole::Investigator),
            "clerk" => Ok(AgentRole::Clerk),
            _ => Err(UnknownVariant::new("role", s, Self::NAMES)),
        }
    }
}

// ============================================================================
// CASE STATUS
// ============================================================================

/// Progress of an investigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    Open,
    InProgress,
    Solved,
}

impl CaseStatus {
    /// Canonical spellings, in declaration order.
    pub const NAMES: &'static [&'static str] = &["open", "in-progress", "solved"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Open => "open",
            CaseStatus::InProgress => "in-progress",
            CaseStatus::Solved => "solved",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "open" => Ok(CaseStatus::Open),
            "in-progress" => Ok(CaseStatus::InProgress),
            "solved" => Ok(CaseStatus::Solved),
            _ => Err(UnknownVariant::new("status", s, Self::NAMES)),
        }
    }
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// Error when a string names no member of a fixed enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str, allowed: &'static [&'static str]) -> Self {
        Self {
            field,
            value: value.to_string(),
            allowed,
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must be one of: {}",
            self.field,
            self.allowed.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}
