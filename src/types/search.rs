use serde::{Deserialize, Serialize};

use handle_errors::Error;

use crate::types::question::Question;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

/// A search term known to contain something other than whitespace.
/// Stored lowercased for case-insensitive matching.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn parse(term: Option<&str>) -> Result<SearchTerm, Error> {
        match term {
            Some(term) if !term.trim().is_empty() => Ok(SearchTerm(term.to_lowercase())),
            _ => Err(Error::EmptySearchTerm),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn matches(question: &Question, term: &SearchTerm) -> bool {
    question.text.to_lowercase().contains(term.as_str())
}
