//! Request extractors whose rejections share the [`ApiError`] body.
//!
//! [`ApiError`]: crate::error::ApiError

pub mod json_body;
pub mod path_id;
pub mod query_params;

pub use json_body::JsonBody;
pub use path_id::PathId;
pub use query_params::QueryParams;
