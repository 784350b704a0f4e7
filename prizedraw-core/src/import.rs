//! Participant list import
//!
//! The list is a CSV file whose header names the `name`, `note` and `code`
//! columns in any order. Rows are read positionally against that header and
//! missing values fall back to placeholders instead of rejecting the row.

use crate::error::{PrizeDrawError, Result};
use crate::types::Participant;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

pub const DEFAULT_NAME: &str = "No Name";
pub const DEFAULT_NOTE: &str = "No Note";
pub const DEFAULT_CODE: &str = "No Code";

const SAMPLE_CSV: &str = "name,note,code
Budi Santoso,Note for Budi,ABC001
Siti Aminah,Note for Siti,XYZ002
Joko Susilo,Note for Joko,PQR003
Maria Dewi,Note for Maria,LMN004
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Note,
    Code,
}

impl Column {
    const ALL: [Column; 3] = [Column::Name, Column::Note, Column::Code];

    fn canonical(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Note => "note",
            Column::Code => "code",
        }
    }

    // titles used by the older Indonesian-language lists
    fn legacy(self) -> &'static str {
        match self {
            Column::Name => "nama peserta",
            Column::Note => "keterangan",
            Column::Code => "nomor code peserta",
        }
    }

    fn matches(self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        header == self.canonical() || header == self.legacy()
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct HeaderLayout {
    name: usize,
    note: usize,
    code: usize,
}

impl HeaderLayout {
    fn from_record(header: &StringRecord) -> Result<Self> {
        let position = |column: Column| header.iter().position(|h| column.matches(h));

        let missing: Vec<String> = Column::ALL
            .iter()
            .filter(|column| position(**column).is_none())
            .map(|column| column.canonical().to_string())
            .collect();

        match (
            position(Column::Name),
            position(Column::Note),
            position(Column::Code),
        ) {
            (Some(name), Some(note), Some(code)) => Ok(Self { name, note, code }),
            _ => Err(PrizeDrawError::MissingHeaders(missing)),
        }
    }

    fn participant(&self, row: &StringRecord) -> Participant {
        let field = |idx: usize, default: &str| {
            row.get(idx)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        Participant::new(
            field(self.name, DEFAULT_NAME),
            field(self.note, DEFAULT_NOTE),
            field(self.code, DEFAULT_CODE),
        )
    }
}

// a whitespace-only line, as opposed to a row of empty fields like ",,"
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.get(0).map_or(true, |field| field.trim().is_empty())
}

/// Parse participant CSV text. Nothing is returned unless the whole header is valid.
pub fn parse_participants(text: &str) -> Result<Vec<Participant>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(PrizeDrawError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let header = loop {
        match records.next() {
            Some(record) => {
                let record = record?;
                if !is_blank(&record) {
                    break record;
                }
            }
            None => return Err(PrizeDrawError::EmptyFile),
        }
    };
    let layout = HeaderLayout::from_record(&header)?;

    let mut participants = Vec::new();
    for record in records {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        participants.push(layout.participant(&record));
    }

    if participants.is_empty() {
        return Err(PrizeDrawError::NoParticipants);
    }

    tracing::info!("Parsed {} participants", participants.len());
    Ok(participants)
}

pub async fn import_participants(path: &Path) -> Result<Vec<Participant>> {
    let text = tokio::fs::read_to_string(path).await?;
    let participants = parse_participants(&text)?;
    tracing::info!(
        "Imported {} participants from {}",
        participants.len(),
        path.display()
    );
    Ok(participants)
}

/// Example participant list in the accepted import format
pub fn sample_csv() -> &'static str {
    SAMPLE_CSV
}
