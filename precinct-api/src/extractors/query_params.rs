//! Query-string extractor with strict parameter accounting.
//!
//! Handlers `take` every parameter they understand and then call
//! [`QueryParams::finish`], which rejects whatever is left over.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use precinct_core::QueryError;

use crate::error::ApiError;

/// Raw `key=value` pairs in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs): Query<Vec<(String, String)>> = Query::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;
        Ok(Self { pairs })
    }
}

impl QueryParams {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Remove and return the value of `name` (or one of its aliases) as sent.
    ///
    /// A parameter given more than once, under any spelling, is refused.
    pub fn take_raw(&mut self, name: &str, aliases: &[&str]) -> Result<Option<String>, QueryError> {
        let is_match = |key: &str| key == name || aliases.contains(&key);

        let count = self.pairs.iter().filter(|(key, _)| is_match(key.as_str())).count();
        if count > 1 {
            return Err(QueryError::InvalidValue {
                param: name.to_string(),
                reason: "given more than once".to_string(),
            });
        }

        Ok(self
            .pairs
            .iter()
            .position(|(key, _)| is_match(key.as_str()))
            .map(|idx| self.pairs.remove(idx).1))
    }

    /// Like [`take_raw`](Self::take_raw), but trims the value and refuses blanks.
    pub fn take(&mut self, name: &str, aliases: &[&str]) -> Result<Option<String>, QueryError> {
        match self.take_raw(name, aliases)? {
            Some(value) if value.trim().is_empty() => Err(QueryError::EmptyParameter {
                param: name.to_string(),
            }),
            Some(value) => Ok(Some(value.trim().to_string())),
            None => Ok(None),
        }
    }

    /// Fail on the first parameter nobody took.
    pub fn finish(self, accepted: &[&str]) -> Result<(), QueryError> {
        match self.pairs.into_iter().next() {
            Some((param, _)) => Err(QueryError::UnknownParameter {
                param,
                accepted: accepted.iter().map(|p| p.to_string()).collect(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_by_alias() {
        let mut params = QueryParams::from_pairs([("cargo", "Inspector")]);
        assert_eq!(
            params.take("role", &["cargo"]),
            Ok(Some("Inspector".to_string()))
        );
        assert!(params.is_empty());
        assert_eq!(params.finish(&["role"]), Ok(()));
    }

    #[test]
    fn test_blank_value_refused() {
        let mut params = QueryParams::from_pairs([("status", "  ")]);
        assert_eq!(
            params.take("status", &[]),
            Err(QueryError::EmptyParameter {
                param: "status".to_string()
            })
        );
    }

    #[test]
    fn test_raw_keeps_blank_value() {
        let mut params = QueryParams::from_pairs([("q", " ")]);
        assert_eq!(params.take_raw("q", &[]), Ok(Some(" ".to_string())));
    }

    #[test]
    fn test_repeated_parameter_refused() {
        let mut params = QueryParams::from_pairs([("agentId", "a"), ("agente_id", "b")]);
        assert!(matches!(
            params.take("agentId", &["agente_id"]),
            Err(QueryError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_leftover_parameter_reported() {
        let mut params = QueryParams::from_pairs([("sort", "name"), ("page", "2")]);
        assert_eq!(params.take("sort", &[]), Ok(Some("name".to_string())));
        let err = params.finish(&["role", "sort"]).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownParameter {
                param: "page".to_string(),
                accepted: vec!["role".to_string(), "sort".to_string()],
            }
        );
    }
}
