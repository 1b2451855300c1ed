use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::ParamError,
    models::{ContentType, Identity},
    types::JournalId,
};

const PHRASE_QUOTE: char = '"';

/// How the query terms are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Operator {
    /// Any term matches
    #[default]
    Or,
    /// The query must appear as an exact phrase
    And,
}

impl FromStr for Operator {
    type Err = ParamError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "or" => Ok(Operator::Or),
            "and" => Ok(Operator::And),
            other => Err(ParamError::InvalidOperator(other.to_string())),
        }
    }
}

/// Which content collections a request searches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Images,
    Documents,
    Videos,
}

impl TypeFilter {
    pub fn content_types(&self) -> Vec<ContentType> {
        match self {
            TypeFilter::All => ContentType::ALL.to_vec(),
            TypeFilter::Images => vec![ContentType::Image],
            TypeFilter::Documents => vec![ContentType::Document],
            TypeFilter::Videos => vec![ContentType::Video],
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ParamError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(TypeFilter::All),
            "images" => Ok(TypeFilter::Images),
            "documents" => Ok(TypeFilter::Documents),
            "videos" => Ok(TypeFilter::Videos),
            other => Err(ParamError::InvalidType(other.to_string())),
        }
    }
}

/// A validated search request
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub identity: Identity,
    pub query: Option<String>,
    pub operator: Operator,
    pub type_filter: TypeFilter,
    /// Restricts the search to one journal
    pub journal_id: Option<JournalId>,
}

impl SearchRequest {
    /// Builds a request from raw parameter values.
    ///
    /// Unknown operator or type values are rejected. When no operator is given a
    /// query wrapped in double quotes is searched as a phrase.
    pub fn from_params(
        identity: Identity,
        journal_id: Option<JournalId>,
        query: Option<&str>,
        operator: Option<&str>,
        type_filter: Option<&str>,
    ) -> Result<Self, ParamError> {
        let type_filter = type_filter
            .map(TypeFilter::from_str)
            .transpose()?
            .unwrap_or_default();

        let (query, operator) = match operator {
            Some(operator) => (query.map(str::to_string), operator.parse()?),
            None => match query {
                Some(query) => {
                    let (query, operator) = split_phrase(query);
                    (Some(query), operator)
                }
                None => (None, Operator::default()),
            },
        };

        Ok(Self {
            identity,
            query,
            operator,
            type_filter,
            journal_id,
        })
    }

    /// The query text, `None` when absent or blank
    pub fn query_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

fn split_phrase(query: &str) -> (String, Operator) {
    let trimmed = query.trim();
    if trimmed.len() >= 2 && trimmed.starts_with(PHRASE_QUOTE) && trimmed.ends_with(PHRASE_QUOTE) {
        (trimmed.replace(PHRASE_QUOTE, ""), Operator::And)
    } else {
        (query.to_string(), Operator::Or)
    }
}

/// Canonical form under which a query is counted for popularity
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
