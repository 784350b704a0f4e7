pub mod draw;
pub mod sample;
pub mod session;
pub mod thanks;

pub use draw::{run_draw, DrawArgs};
pub use sample::write_sample;
pub use session::run_session;
pub use thanks::thanks_from_history;

use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Table};
use prizedraw_core::{DrawRecord, Participant};
use prizedraw_engine::{DrawController, DrawOutcome, ShuffleFrame};
use std::collections::HashSet;
use std::io::Write;
use tokio::sync::mpsc;

pub fn results_table(records: &[DrawRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Winner", "Note", "Code", "Prize"]);

    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            record.winner.name.clone(),
            record.winner.note.clone(),
            record.winner.code.clone(),
            record.prize.clone(),
        ]);
    }

    table
}

pub fn history_table(history: &[DrawRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Drawn At", "Winner", "Note", "Code", "Prize"]);

    for record in history {
        table.add_row(vec![
            record
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            record.winner.name.clone(),
            record.winner.note.clone(),
            record.winner.code.clone(),
            record.prize.clone(),
        ]);
    }

    table
}

pub fn participants_table(participants: &[Participant], eligible: &[Participant]) -> Table {
    let eligible: HashSet<_> = eligible.iter().map(|p| p.id).collect();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Note", "Code", "Eligible"]);

    for participant in participants {
        table.add_row(vec![
            participant.name.as_str(),
            participant.note.as_str(),
            participant.code.as_str(),
            if eligible.contains(&participant.id) {
                "yes"
            } else {
                "won"
            },
        ]);
    }

    table
}

/// Run one draw, printing the shuffle frames on a single line
pub async fn draw_with_shuffle(controller: &DrawController) -> prizedraw_engine::Result<DrawOutcome> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ShuffleFrame>();

    let printer = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(frame) = rx.recv().await {
            print!(
                "\rShuffling... {} [{}] -> {}\x1b[K",
                frame.name, frame.code, frame.prize
            );
            let _ = stdout.flush();
        }
    });

    let result = controller.draw(Some(tx)).await;
    let _ = printer.await;

    print!("\r\x1b[K");
    let _ = std::io::stdout().flush();

    result
}

pub fn print_outcome(outcome: &DrawOutcome) {
    match outcome.records.first() {
        Some(first) => println!(
            "Winner: {} [{}] -> {}",
            first.winner.name, first.winner.code, first.prize
        ),
        None => println!("No winner drawn"),
    }

    println!("{}", results_table(&outcome.records));

    if !outcome.is_complete() {
        println!(
            "Not enough participants to draw every winner: {} short",
            outcome.shortfall
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_table_rows() {
        let records = vec![
            DrawRecord::new(Participant::new("Alice", "VIP", "A1"), "Bike"),
            DrawRecord::new(Participant::new("Bob", "Staff", "B2"), "TV"),
        ];

        let rendered = results_table(&records).to_string();
        assert!(rendered.contains("Alice"));
        assert!(rendered.contains("Bob"));
        assert!(rendered.contains("TV"));
    }

    #[test]
    fn test_participants_table_marks_winners() {
        let alice = Participant::new("Alice", "", "A1");
        let bob = Participant::new("Bob", "", "B2");

        let rendered = participants_table(&[alice.clone(), bob], &[alice]).to_string();
        assert!(rendered.contains("yes"));
        assert!(rendered.contains("won"));
    }
}
