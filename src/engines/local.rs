use anyhow::Result;
use async_trait::async_trait;

use crate::{
    engines::{ScoredMatch, ScoringOracle},
    models::{ContentItem, ContentType, Operator},
};

const PRE_TAG: &str = "<b>";
const POST_TAG: &str = "</b>";
/// Tokens kept in front of the first match of a highlight
const CONTEXT_TOKENS: usize = 8;
const MAX_HIGHLIGHT_TOKENS: usize = 32;

#[derive(Debug, Clone, PartialEq)]
struct Token {
    start: usize,
    end: usize,
    term: String,
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (idx, c) in text.char_indices() {
        match (c.is_alphanumeric(), start) {
            (true, None) => start = Some(idx),
            (false, Some(begin)) => {
                tokens.push(Token {
                    start: begin,
                    end: idx,
                    term: text[begin..idx].to_lowercase(),
                });
                start = None;
            }
            _ => (),
        }
    }

    if let Some(begin) = start {
        tokens.push(Token {
            start: begin,
            end: text.len(),
            term: text[begin..].to_lowercase(),
        });
    }

    tokens
}

/// Marks matching tokens and returns how many matches were found
fn mark(tokens: &[Token], query: &[String], operator: Operator) -> (usize, Vec<bool>) {
    let mut marks = vec![false; tokens.len()];
    let mut matches = 0;

    match operator {
        Operator::Or => {
            for (idx, token) in tokens.iter().enumerate() {
                if query.contains(&token.term) {
                    marks[idx] = true;
                    matches += 1;
                }
            }
        }
        Operator::And => {
            if !query.is_empty() && tokens.len() >= query.len() {
                for idx in 0..=tokens.len() - query.len() {
                    let window = &tokens[idx..idx + query.len()];
                    if window.iter().zip(query).all(|(token, term)| &token.term == term) {
                        marks[idx..idx + query.len()].fill(true);
                        matches += 1;
                    }
                }
            }
        }
    }

    (matches, marks)
}

fn highlight(text: &str, tokens: &[Token], marks: &[bool]) -> Option<String> {
    let first = marks.iter().position(|marked| *marked)?;
    let from = first.saturating_sub(CONTEXT_TOKENS);
    let to = (from + MAX_HIGHLIGHT_TOKENS).min(tokens.len());

    let mut snippet = String::new();
    let mut cursor = tokens[from].start;
    for idx in from..to {
        let token = &tokens[idx];
        snippet.push_str(&text[cursor..token.start]);
        if marks[idx] {
            snippet.push_str(PRE_TAG);
            snippet.push_str(&text[token.start..token.end]);
            snippet.push_str(POST_TAG);
        } else {
            snippet.push_str(&text[token.start..token.end]);
        }
        cursor = token.end;
    }

    Some(snippet)
}

/// In-process stand-in for the full-text index.
///
/// Scores are the number of term (or phrase) occurrences across all searchable
/// fields, there is no stemming.
#[derive(Clone, Debug, Default)]
pub struct LocalIndex;

impl LocalIndex {
    pub fn new() -> Self {
        Self
    }

    fn score(&self, item: &ContentItem, query: &[String], operator: Operator) -> Option<ScoredMatch> {
        let mut score = 0;
        let mut highlights = Vec::new();

        for (_, text) in item.searchable_fields() {
            let tokens = tokenize(text);
            let (matches, marks) = mark(&tokens, query, operator);
            if matches == 0 {
                continue;
            }
            score += matches;
            if let Some(snippet) = highlight(text, &tokens, &marks) {
                highlights.push(snippet);
            }
        }

        (score > 0).then(|| ScoredMatch {
            id: item.id(),
            score: score as f64,
            highlights,
        })
    }
}

#[async_trait]
impl ScoringOracle for LocalIndex {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn search(
        &self,
        content_type: ContentType,
        candidates: &[ContentItem],
        query: &str,
        operator: Operator,
    ) -> Result<Vec<ScoredMatch>> {
        let mut terms: Vec<String> = tokenize(query).into_iter().map(|t| t.term).collect();
        if operator == Operator::Or {
            terms.sort();
            terms.dedup();
        }

        let mut matches: Vec<ScoredMatch> = candidates
            .iter()
            .filter_map(|item| self.score(item, &terms, operator))
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));

        log::debug!(
            "Local index matched {} of {} {} candidates",
            matches.len(),
            candidates.len(),
            content_type
        );

        Ok(matches)
    }
}
