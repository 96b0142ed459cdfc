//! Shared application state for Axum routers.

use chrono::{NaiveDate, Utc};
use precinct_storage::Stores;
use std::sync::Arc;
use std::time::Instant;

/// Application-wide state shared across all routes.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Agent and case collections. Dropped with the last clone at shutdown.
    pub stores: Arc<Stores>,
    pub start_time: Instant,
    /// Evaluation date override for date validation. `None` means the UTC date.
    fixed_today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(stores: Arc<Stores>) -> Self {
        Self {
            stores,
            start_time: Instant::now(),
            fixed_today: None,
        }
    }

    /// Validate dates against a fixed day instead of the wall clock.
    pub fn with_fixed_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    /// The date "not in the future" is checked against.
    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(Stores::new()))
    }
}
