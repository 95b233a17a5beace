//! Ticket search modes and request bodies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building a search request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Please enter search text")]
    EmptyQuery,

    #[error("unknown search mode: {0}")]
    UnknownMode(String),
}

/// How the search text is matched against tickets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Contact phone number contains the text.
    #[default]
    Phone,
    /// Description contains the exact sentence.
    Match,
    /// Semantic similarity of the description.
    Semantic,
    /// Vector search for tickets similar to a given ticket id.
    Ticket,
}

impl SearchMode {
    /// Every mode in toggle order.
    pub const ALL: [SearchMode; 4] = [
        SearchMode::Phone,
        SearchMode::Match,
        SearchMode::Semantic,
        SearchMode::Ticket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Phone => "phone",
            SearchMode::Match => "match",
            SearchMode::Semantic => "semantic",
            SearchMode::Ticket => "ticket",
        }
    }

    /// Prompt shown in an empty search input.
    pub fn placeholder(&self) -> &'static str {
        match self {
            SearchMode::Phone => "Search tickets by phone number.",
            SearchMode::Match => "Search tickets by exact sentence match.",
            SearchMode::Semantic => "Search tickets by semantic description.",
            SearchMode::Ticket => "Search for similar tickets using vectors.",
        }
    }

    /// Search type as named in result headings.
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::Phone => "phone number",
            SearchMode::Match => "exact match",
            SearchMode::Semantic => "semantic similarity",
            SearchMode::Ticket => "ticket-based vector search",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SearchError::UnknownMode(s.to_string()))
    }
}

/// Body of a `search-tickets` request; its JSON shape depends on the mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchRequest {
    #[serde(rename_all = "camelCase")]
    Phone { contact_method: String, contains: bool },
    Match { description: String, contains: bool },
    #[serde(rename_all = "camelCase")]
    Semantic { semantic_description: String },
    #[serde(rename_all = "camelCase")]
    Ticket { ticket_id: String },
}

impl SearchRequest {
    /// Build a request for `value`, trimmed. Blank text is rejected.
    pub fn new(mode: SearchMode, value: &str) -> Result<Self, SearchError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let value = value.to_string();

        Ok(match mode {
            SearchMode::Phone => SearchRequest::Phone {
                contact_method: value,
                contains: true,
            },
            SearchMode::Match => SearchRequest::Match {
                description: value,
                contains: true,
            },
            SearchMode::Semantic => SearchRequest::Semantic {
                semantic_description: value,
            },
            SearchMode::Ticket => SearchRequest::Ticket { ticket_id: value },
        })
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            SearchRequest::Phone { .. } => SearchMode::Phone,
            SearchRequest::Match { .. } => SearchMode::Match,
            SearchRequest::Semantic { .. } => SearchMode::Semantic,
            SearchRequest::Ticket { .. } => SearchMode::Ticket,
        }
    }

    /// The searched text.
    pub fn value(&self) -> &str {
        match self {
            SearchRequest::Phone { contact_method, .. } => contact_method,
            SearchRequest::Match { description, .. } => description,
            SearchRequest::Semantic {
                semantic_description,
            } => semantic_description,
            SearchRequest::Ticket { ticket_id } => ticket_id,
        }
    }
}
