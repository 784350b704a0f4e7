//! Prize draw toolkit - core library
//!
//! Participant and draw record types, CSV import of participant lists,
//! CSV export of the winners history, configuration, and the thank-you
//! message collaborator.

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod thanks;
pub mod types;

pub use config::{AnimationConfig, DrawConfig, ThanksConfig};
pub use error::{PrizeDrawError, Result};
pub use export::{export_history, history_to_csv, parse_history_csv, read_history, HistoryRow};
pub use import::{import_participants, parse_participants, sample_csv};
pub use thanks::{build_prompt, GeminiClient, MessageGenerator, ThanksSummary};
pub use types::{DrawRecord, Participant};
