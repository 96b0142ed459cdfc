//! PRECINCT Test Utilities
//!
//! Shared test infrastructure for the PRECINCT workspace:
//! - Proptest generators for payloads and enum values
//! - Fixtures for seeded stores and a fixed evaluation date
//! - Assertions over field-level validation errors

pub use precinct_core::{
    Agent, AgentId, AgentInput, AgentRole, Case, CaseInput, CaseStatus, FieldError,
};
pub use precinct_storage::{EntityStore, InMemoryStore, Stores};

use chrono::NaiveDate;
use serde_json::{json, Value};

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating PRECINCT payloads.

    use super::*;
    use chrono::Days;
    use proptest::prelude::*;

    /// Generate an AgentRole variant.
    pub fn arb_agent_role() -> impl Strategy<Value = AgentRole> {
        prop_oneof![
            Just(AgentRole::Inspector),
            Just(AgentRole::Delegate),
            Just(AgentRole::Investigator),
            Just(AgentRole::Clerk),
        ]
    }

    /// Generate a CaseStatus variant.
    pub fn arb_case_status() -> impl Strategy<Value = CaseStatus> {
        prop_oneof![
            Just(CaseStatus::Open),
            Just(CaseStatus::InProgress),
            Just(CaseStatus::Solved),
        ]
    }

    /// A canonical spelling in random letter case, e.g. `In-PROGress`.
    pub fn arb_mixed_case(canonical: &'static str) -> impl Strategy<Value = String> {
        prop::collection::vec(any::<bool>(), canonical.len()).prop_map(move |upper| {
            canonical
                .chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    /// A date between 1970-01-01 and `today`, inclusive.
    pub fn arb_past_date(today: NaiveDate) -> impl Strategy<Value = NaiveDate> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
        let span = (today - epoch).num_days().max(0) as u64;
        (0..=span).prop_map(move |back| today - Days::new(back))
    }

    /// A date 1 to 3650 days after `today`.
    pub fn arb_future_date(today: NaiveDate) -> impl Strategy<Value = NaiveDate> {
        (1u64..=3650).prop_map(move |ahead| today + Days::new(ahead))
    }

    /// A valid agent name (3 to 50 characters after trimming).
    pub fn arb_agent_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{2,20}( [A-Z][a-z]{1,20})?"
    }

    /// Non-blank free text.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ,.]{0,60}"
    }

    /// A well-formed agent payload valid on `today`.
    pub fn arb_agent_payload(today: NaiveDate) -> impl Strategy<Value = Value> {
        (arb_agent_name(), arb_past_date(today), arb_agent_role()).prop_map(|(name, date, role)| {
            json!({
                "name": name,
                "incorporationDate": date.format("%Y-%m-%d").to_string(),
                "role": role.as_str(),
            })
        })
    }

    /// A well-formed case payload referencing `agent_id`.
    pub fn arb_case_payload(agent_id: AgentId) -> impl Strategy<Value = Value> {
        (arb_text(), arb_text(), arb_case_status()).prop_map(move |(title, description, status)| {
            json!({
                "title": title,
                "description": description,
                "status": status.as_str(),
                "agentId": agent_id.to_string(),
            })
        })
    }

    /// Strings that are not `YYYY-MM-DD` dates at all.
    pub fn arb_malformed_date() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}",
            "[0-9]{4}-[0-9]{1,2}",
            "[a-z]{3,10}",
        ]
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// The evaluation date used across tests.
    pub fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn agent_payload(name: &str, incorporation_date: &str, role: &str) -> Value {
        json!({
            "name": name,
            "incorporationDate": incorporation_date,
            "role": role,
        })
    }

    pub fn case_payload(title: &str, description: &str, status: &str, agent_id: AgentId) -> Value {
        json!({
            "title": title,
            "description": description,
            "status": status,
            "agentId": agent_id.to_string(),
        })
    }

    /// The three agents used by most listing tests, in insertion order.
    pub fn roster() -> Vec<AgentInput> {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
        vec![
            AgentInput {
                name: "Carla Mendes".to_string(),
                incorporation_date: date(2021, 11, 30),
                role: AgentRole::Inspector,
            },
            AgentInput {
                name: "Bruno Lima".to_string(),
                incorporation_date: date(2009, 7, 1),
                role: AgentRole::Delegate,
            },
            AgentInput {
                name: "Ana Pereira".to_string(),
                incorporation_date: date(2015, 3, 12),
                role: AgentRole::Inspector,
            },
        ]
    }

    /// Stores holding [`roster`] and one case per status, all owned by the
    /// first agent.
    pub fn seeded_stores() -> (Stores, Vec<Agent>, Vec<Case>) {
        let stores = Stores::new();
        let agents: Vec<Agent> = roster()
            .into_iter()
            .filter_map(|input| stores.agents.create(input).ok())
            .collect();
        let owner = agents[0].id;
        let cases: Vec<Case> = [
            ("Vehicle theft", "Car stolen from a downtown garage", CaseStatus::Open),
            ("Bank robbery", "Armed robbery at the central branch", CaseStatus::InProgress),
            ("Stolen bicycle", "Bicycle taken near the station", CaseStatus::Solved),
        ]
        .into_iter()
        .filter_map(|(title, description, status)| {
            stores
                .cases
                .create(CaseInput {
                    title: title.to_string(),
                    description: description.to_string(),
                    status,
                    agent_id: owner,
                })
                .ok()
        })
        .collect();
        (stores, agents, cases)
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over field-level validation output.

    use super::*;

    /// Assert the reported fields, in order.
    #[track_caller]
    pub fn assert_fields(errors: &[FieldError], expected: &[&str]) {
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, expected, "unexpected field errors: {:?}", errors);
    }

    /// Assert that some error names `field`.
    #[track_caller]
    pub fn assert_mentions(errors: &[FieldError], field: &str) {
        assert!(
            errors.iter().any(|e| e.field == field),
            "expected an error for '{}', got: {:?}",
            field,
            errors
        );
    }
}
