use crate::error::{PrizeDrawError, Result};
use crate::types::DrawRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const HISTORY_HEADER: &str = "timestamp,winner_name,note,code,prize";

/// One row of an exported winners history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub timestamp: DateTime<Utc>,
    pub winner_name: String,
    pub note: String,
    pub code: String,
    pub prize: String,
}

impl From<&DrawRecord> for HistoryRow {
    fn from(record: &DrawRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            winner_name: record.winner.name.clone(),
            note: record.winner.note.clone(),
            code: record.winner.code.clone(),
            prize: record.prize.clone(),
        }
    }
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| PrizeDrawError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Render the history as CSV. The header is bare, every row field is quoted.
pub fn history_to_csv(history: &[DrawRecord]) -> Result<String> {
    let mut buffer = format!("{}\n", HISTORY_HEADER).into_bytes();
    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .from_writer(&mut buffer);

        for record in history {
            writer.write_record([
                format_timestamp(&record.timestamp).as_str(),
                record.winner.name.as_str(),
                record.winner.note.as_str(),
                record.winner.code.as_str(),
                record.prize.as_str(),
            ])?;
        }
        writer.flush()?;
    }

    String::from_utf8(buffer).map_err(|e| PrizeDrawError::internal(e.to_string()))
}

pub async fn export_history(history: &[DrawRecord], path: &Path) -> Result<()> {
    if history.is_empty() {
        return Err(PrizeDrawError::EmptyHistory);
    }

    let content = history_to_csv(history)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;

    tracing::info!(
        "Exported {} history entries to {}",
        history.len(),
        path.display()
    );
    Ok(())
}

/// Read back a history previously written by [`history_to_csv`]
pub fn parse_history_csv(text: &str) -> Result<Vec<HistoryRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let expected: Vec<&str> = HISTORY_HEADER.split(',').collect();
    if headers.iter().map(str::trim).collect::<Vec<_>>() != expected {
        let missing = expected
            .iter()
            .filter(|column| !headers.iter().any(|h| h.trim() == **column))
            .map(|column| column.to_string())
            .collect();
        return Err(PrizeDrawError::MissingHeaders(missing));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();

        rows.push(HistoryRow {
            timestamp: parse_timestamp(&field(0))?,
            winner_name: field(1),
            note: field(2),
            code: field(3),
            prize: field(4),
        });
    }

    Ok(rows)
}

pub async fn read_history(path: &Path) -> Result<Vec<HistoryRow>> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_history_csv(&text)
}
