//! Request-level operations.
//!
//! Writes run validate, then the integrity check (case writes only), then the
//! store mutation. Reads take a store snapshot and run it through the query
//! engine.

pub mod agent_service;
pub mod case_service;
pub mod integrity;
