//! Thank-you message generation
//!
//! The draw only hands over summary statistics (how many winners, a few
//! prize names); turning them into text is left to a [`MessageGenerator`].
//! [`GeminiClient`] is the HTTP implementation against the Gemini
//! `generateContent` endpoint.

use crate::config::ThanksConfig;
use crate::error::{PrizeDrawError, Result};
use crate::export::HistoryRow;
use crate::types::DrawRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_PRIZE_SAMPLE: usize = 3;

#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn summarize(&self, winner_count: usize, prize_sample: &[String]) -> Result<String>;
}

/// Statistics about a finished event, taken from the winners history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThanksSummary {
    pub winner_count: usize,
    pub prize_sample: Vec<String>,
}

impl ThanksSummary {
    pub fn from_history(history: &[DrawRecord]) -> Self {
        let winners: HashSet<_> = history.iter().map(|record| record.winner.id).collect();
        Self {
            winner_count: winners.len(),
            prize_sample: sample_prizes(history.iter().map(|record| record.prize.as_str())),
        }
    }

    /// Exported rows carry no participant id, so winners are told apart by name and code
    pub fn from_rows(rows: &[HistoryRow]) -> Self {
        let winners: HashSet<_> = rows
            .iter()
            .map(|row| (row.winner_name.as_str(), row.code.as_str()))
            .collect();
        Self {
            winner_count: winners.len(),
            prize_sample: sample_prizes(rows.iter().map(|row| row.prize.as_str())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.winner_count == 0
    }

    pub async fn generate(&self, generator: &dyn MessageGenerator) -> Result<String> {
        generator
            .summarize(self.winner_count, &self.prize_sample)
            .await
    }
}

fn sample_prizes<'a>(prizes: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut sample: Vec<String> = Vec::new();
    for prize in prizes {
        if sample.len() == MAX_PRIZE_SAMPLE {
            break;
        }
        if !sample.iter().any(|p| p == prize) {
            sample.push(prize.to_string());
        }
    }
    sample
}

pub fn build_prompt(winner_count: usize, prize_sample: &[String], max_words: u32) -> String {
    let prizes = if prize_sample.is_empty() {
        "a variety of exciting prizes".to_string()
    } else {
        prize_sample.join(", ")
    };

    format!(
        "Write a short, sincere thank-you message (at most {} words) for a prize draw event. \
         Mention that there were {} winners. If possible, mention some of the prizes that were \
         drawn, such as: {}. The message is addressed to all participants and winners.",
        max_words, winner_count, prizes
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn extract_text(response: GenerateResponse) -> Result<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| PrizeDrawError::external("Unexpected response shape from text service"))
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    http_client: reqwest::Client,
    config: ThanksConfig,
}

impl GeminiClient {
    pub fn new(config: ThanksConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl MessageGenerator for GeminiClient {
    async fn summarize(&self, winner_count: usize, prize_sample: &[String]) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            PrizeDrawError::config("No API key configured, set PRIZEDRAW_API_KEY or GEMINI_API_KEY")
        })?;

        let prompt = build_prompt(winner_count, prize_sample, self.config.max_words);
        tracing::debug!("Thank-you prompt: {}", prompt);

        let payload = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Text service returned {}: {}", status, body);
            return Err(PrizeDrawError::external(format!(
                "Text service returned {}",
                status
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PrizeDrawError::external(format!("Malformed response: {}", e)))?;

        extract_text(body)
    }
}
