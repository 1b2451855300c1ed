use std::{collections::HashMap, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    engines::{ScoredMatch, ScoringOracle},
    models::{ContentItem, ContentType, Operator},
};

const PRE_TAG: &str = "<b>";
const POST_TAG: &str = "</b>";
/// Default `index.max_result_window`, larger candidate sets are split over several requests
const MAX_RESULT_WINDOW: usize = 10_000;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(default)]
    highlight: HashMap<String, Vec<String>>,
}

/// Full-text index backed by an elasticsearch cluster
#[derive(Clone, Debug)]
pub struct Elasticsearch {
    client: Client,
    url: String,
    index_prefix: String,
}

impl Elasticsearch {
    pub(crate) fn new(url: &str, index_prefix: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.trim_end_matches('/').to_string(),
            index_prefix: index_prefix.to_string(),
        })
    }

    fn index_name(&self, content_type: ContentType) -> String {
        format!("{}__{}", self.index_prefix, content_type)
    }

    fn fields(content_type: ContentType) -> &'static [&'static str] {
        match content_type {
            ContentType::PageBody => &["title", "sub_title", "author", "search_description", "body"],
            ContentType::Document => &["title", "attachment.content"],
            ContentType::Image => &["title", "caption"],
            ContentType::Video => &["display_name", "transcript", "tags.name"],
        }
    }

    /// `or` is a plain multi_match, `and` a phrase match
    fn query_body(
        content_type: ContentType,
        candidates: &[ContentItem],
        query: &str,
        operator: Operator,
    ) -> Value {
        let fields = Self::fields(content_type);

        let inner = match operator {
            Operator::Or => json!({
                "multi_match": {
                    "query": query,
                    "fields": fields,
                    "operator": "or",
                }
            }),
            Operator::And => json!({
                "multi_match": {
                    "query": query,
                    "fields": fields,
                    "type": "phrase",
                }
            }),
        };

        let ids: Vec<String> = candidates.iter().map(|item| item.id().to_string()).collect();
        let highlight_fields: serde_json::Map<String, Value> = fields
            .iter()
            .map(|field| (field.to_string(), json!({})))
            .collect();

        json!({
            "query": {
                "bool": {
                    "must": [inner],
                    "filter": [{ "ids": { "values": ids } }],
                }
            },
            "highlight": {
                "fields": highlight_fields,
                "pre_tags": [PRE_TAG],
                "post_tags": [POST_TAG],
            },
            "_source": false,
            "size": candidates.len(),
        })
    }

    fn request_bodies(
        content_type: ContentType,
        candidates: &[ContentItem],
        query: &str,
        operator: Operator,
    ) -> Vec<Value> {
        candidates
            .chunks(MAX_RESULT_WINDOW)
            .map(|chunk| Self::query_body(content_type, chunk, query, operator))
            .collect()
    }

    fn parse_hit(content_type: ContentType, mut hit: Hit) -> Option<ScoredMatch> {
        let id = match hit.id.parse() {
            Ok(id) => id,
            Err(_) => {
                log::warn!("Ignoring elasticsearch hit with non numeric id {}", hit.id);
                return None;
            }
        };

        let mut highlights = Vec::new();
        for field in Self::fields(content_type) {
            if let Some(fragments) = hit.highlight.remove(*field) {
                highlights.extend(fragments);
            }
        }
        let mut rest: Vec<_> = hit.highlight.into_iter().collect();
        rest.sort_by(|a, b| a.0.cmp(&b.0));
        highlights.extend(rest.into_iter().flat_map(|(_, fragments)| fragments));

        Some(ScoredMatch {
            id,
            score: hit.score.unwrap_or(0.0),
            highlights,
        })
    }
}

#[async_trait]
impl ScoringOracle for Elasticsearch {
    fn name(&self) -> &'static str {
        "elasticsearch"
    }

    async fn search(
        &self,
        content_type: ContentType,
        candidates: &[ContentItem],
        query: &str,
        operator: Operator,
    ) -> Result<Vec<ScoredMatch>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let index = self.index_name(content_type);
        log::info!("Searching elasticsearch index {} for '{}'", index, query);

        let mut matches = Vec::new();
        for body in Self::request_bodies(content_type, candidates, query, operator) {
            let response = self
                .client
                .post(format!("{}/{}/_search", self.url, index))
                .json(&body)
                .send()
                .await
                .with_context(|| format!("Request to index {} failed", index))?
                .error_for_status()?;

            let body: SearchResponse = response
                .json()
                .await
                .with_context(|| format!("Invalid response from index {}", index))?;

            matches.extend(
                body.hits
                    .hits
                    .into_iter()
                    .filter_map(|hit| Self::parse_hit(content_type, hit)),
            );
        }

        Ok(matches)
    }
}
