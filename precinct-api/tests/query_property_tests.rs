//! Property-based tests for listing, filtering and record identity,
//! driven through the HTTP router.

use axum::http::StatusCode;
use chrono::NaiveDate;
use precinct_test_utils::fixtures::{agent_payload, fixed_today};
use precinct_test_utils::generators::{
    arb_agent_payload, arb_case_payload, arb_case_status, arb_future_date, arb_malformed_date,
    arb_mixed_case,
};
use precinct_test_utils::{AgentId, CaseStatus};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;
use tokio::runtime::Runtime;

#[path = "support/http.rs"]
mod http_support;
use http_support::TestApp;

// ============================================================================
// TEST CONFIGURATION
// ============================================================================

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

fn dates(listed: &Value) -> Vec<NaiveDate> {
    listed
        .as_array()
        .map(|agents| {
            agents
                .iter()
                .filter_map(|a| a["incorporationDate"].as_str())
                .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .collect()
        })
        .unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_date_sort_is_monotonic(
        payloads in prop::collection::vec(arb_agent_payload(fixed_today()), 1..12)
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = TestApp::new();
            for payload in &payloads {
                let (status, _) = app.post("/agents", payload).await;
                prop_assert_eq!(status, StatusCode::CREATED);
            }

            let (status, desc) = app.get("/agents?sort=-incorporationDate").await;
            prop_assert_eq!(status, StatusCode::OK);
            let desc = dates(&desc);
            prop_assert_eq!(desc.len(), payloads.len());
            prop_assert!(desc.windows(2).all(|w| w[0] >= w[1]));

            let (_, asc) = app.get("/agents?sort=incorporationDate").await;
            let asc = dates(&asc);
            prop_assert!(asc.windows(2).all(|w| w[0] <= w[1]));
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_created_ids_unique_and_round_trip(
        payloads in prop::collection::vec(arb_agent_payload(fixed_today()), 1..8)
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = TestApp::new();
            let mut seen = HashSet::new();
            for payload in &payloads {
                let (_, created) = app.post("/agents", payload).await;
                let id = created["id"].as_str().unwrap_or_default().to_string();
                prop_assert!(seen.insert(id.clone()), "id {} issued twice", id);

                let (status, fetched) = app.get(&format!("/agents/{}", id)).await;
                prop_assert_eq!(status, StatusCode::OK);
                prop_assert_eq!(fetched, created);
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_status_filter_selects_exact_subset(
        statuses in prop::collection::vec(arb_case_status(), 1..10),
        filter in arb_case_status().prop_flat_map(|s| arb_mixed_case(s.as_str())),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = TestApp::new();
            let agent = app
                .create("/agents", &agent_payload("Ana Pereira", "2015-03-12", "inspector"))
                .await;
            for (i, status) in statuses.iter().enumerate() {
                let payload = json!({
                    "title": format!("Case {}", i),
                    "description": "Reported downtown",
                    "status": status.as_str(),
                    "agentId": agent,
                });
                app.create("/cases", &payload).await;
            }

            let wanted: CaseStatus = filter.parse().map_err(|_| TestCaseError::fail("bad filter"))?;
            let expected: Vec<String> = statuses
                .iter()
                .enumerate()
                .filter(|(_, s)| **s == wanted)
                .map(|(i, _)| format!("Case {}", i))
                .collect();

            let (status, listed) = app.get(&format!("/cases?status={}", filter)).await;
            prop_assert_eq!(status, StatusCode::OK);
            let titles: Vec<String> = listed
                .as_array()
                .map(|cases| {
                    cases
                        .iter()
                        .filter_map(|c| c["title"].as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            prop_assert_eq!(titles, expected);
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_agent_filter_lists_created_cases_in_order(
        payloads in prop::collection::vec(arb_case_payload(AgentId::nil()), 1..8)
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = TestApp::new();
            let owner = app
                .create("/agents", &agent_payload("Ana Pereira", "2015-03-12", "inspector"))
                .await;
            let other = app
                .create("/agents", &agent_payload("Bruno Lima", "2009-07-01", "delegate"))
                .await;

            let mut expected = Vec::new();
            for (i, payload) in payloads.iter().enumerate() {
                let agent = if i % 2 == 0 { &owner } else { &other };
                let mut payload = payload.clone();
                payload["agentId"] = json!(agent);
                let id = app.create("/cases", &payload).await;
                if agent == &owner {
                    expected.push(id);
                }
            }

            let (status, listed) = app.get(&format!("/cases?agentId={}", owner)).await;
            prop_assert_eq!(status, StatusCode::OK);
            let ids: Vec<String> = listed
                .as_array()
                .map(|cases| {
                    cases
                        .iter()
                        .filter_map(|c| c["id"].as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            prop_assert_eq!(ids, expected);
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_bad_dates_never_stored(
        future in arb_future_date(fixed_today()),
        malformed in arb_malformed_date(),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = TestApp::new();
            let future = future.format("%Y-%m-%d").to_string();
            for date in [future.as_str(), malformed.as_str()] {
                let (status, body) = app
                    .post("/agents", &agent_payload("Ana Pereira", date, "clerk"))
                    .await;
                prop_assert_eq!(status, StatusCode::BAD_REQUEST);
                prop_assert_eq!(body["errors"][0]["field"].as_str(), Some("incorporationDate"));
            }
            let (_, listed) = app.get("/agents").await;
            prop_assert_eq!(listed, json!([]));
            Ok::<(), TestCaseError>(())
        })?;
    }
}
