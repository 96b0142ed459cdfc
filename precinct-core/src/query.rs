//! Filtering and sorting of collection snapshots
//!
//! A [`Query`] is a conjunction of [`Predicate`]s plus an optional
//! [`SortDirective`]. Applying it never touches the input: matching records
//! are cloned into a new vector, then sorted with a stable sort so records
//! that compare equal keep their snapshot order.

use chrono::NaiveDate;
use std::borrow::Cow;
use std::cmp::Ordering;

use crate::error::QueryError;

// ============================================================================
// QUERYABLE RECORDS
// ============================================================================

/// A comparable value extracted from a record for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey<'a> {
    /// Compared case-insensitively.
    Text(&'a str),
    /// Compared as calendar dates, never as strings.
    Date(NaiveDate),
}

impl SortKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => cmp_ignore_case(a, b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            // One field always yields one kind of key.
            _ => Ordering::Equal,
        }
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Records the query engine can filter and sort.
pub trait Queryable {
    /// Text form of a filterable field, or `None` for unknown fields.
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>>;

    /// Text fields a search term is matched against.
    fn search_haystacks(&self) -> Vec<&str>;

    /// Sort key of a sortable field, or `None` for unknown fields.
    fn sort_key(&self, field: &str) -> Option<SortKey<'_>>;
}

// ============================================================================
// DIRECTIVES
// ============================================================================

/// Ordering request: a field name, optionally prefixed with `-` for descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDirective {
    pub field: &'static str,
    pub descending: bool,
}

impl SortDirective {
    pub fn ascending(field: &'static str) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn descending(field: &'static str) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parse `field` or `-field`, accepting only names from `sortable`.
    pub fn parse(raw: &str, sortable: &[&'static str]) -> Result<Self, QueryError> {
        let raw = raw.trim();
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        sortable
            .iter()
            .copied()
            .find(|field| *field == name)
            .map(|field| Self {
                field,
                descending,
            })
            .ok_or_else(|| QueryError::UnsortableField {
                field: name.to_string(),
                allowed: sortable.iter().map(|f| f.to_string()).collect(),
            })
    }

    fn compare<T: Queryable>(&self, a: &T, b: &T) -> Ordering {
        let ordering = match (a.sort_key(self.field), b.sort_key(self.field)) {
            (Some(a), Some(b)) => a.compare(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field equals value, ignoring case.
    Equals { field: &'static str, value: String },
    /// Term occurs in any search haystack, ignoring case.
    Contains { term: String },
}

impl Predicate {
    pub fn equals(field: &'static str, value: &str) -> Self {
        Predicate::Equals {
            field,
            value: value.to_lowercase(),
        }
    }

    /// Substring search. Blank terms are refused rather than matching everything.
    pub fn search(term: &str) -> Result<Self, QueryError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(QueryError::EmptySearchTerm);
        }
        Ok(Predicate::Contains {
            term: term.to_lowercase(),
        })
    }

    pub fn matches<T: Queryable>(&self, record: &T) -> bool {
        match self {
            Predicate::Equals { field, value } => record
                .field_text(field)
                .is_some_and(|text| text.to_lowercase() == *value),
            Predicate::Contains { term } => record
                .search_haystacks()
                .iter()
                .any(|haystack| haystack.to_lowercase().contains(term.as_str())),
        }
    }
}

// ============================================================================
// QUERY
// ============================================================================

/// Filters (ANDed) followed by an optional sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    predicates: Vec<Predicate>,
    sort: Option<SortDirective>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn sort_by(mut self, directive: SortDirective) -> Self {
        self.sort = Some(directive);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn sort(&self) -> Option<SortDirective> {
        self.sort
    }

    pub fn matches<T: Queryable>(&self, record: &T) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// Project `snapshot` through the filters and sort.
    pub fn apply<T: Queryable + Clone>(&self, snapshot: &[T]) -> Vec<T> {
        let mut results: Vec<T> = snapshot
            .iter()
            .filter(|record| self.matches(*record))
            .cloned()
            .collect();

        if let Some(directive) = self.sort {
            results.sort_by(|a, b| directive.compare(a, b));
        }
        results
    }
}
