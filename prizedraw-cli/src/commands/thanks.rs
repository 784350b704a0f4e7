use anyhow::{bail, Result};
use prizedraw_core::{read_history, GeminiClient, MessageGenerator, ThanksConfig, ThanksSummary};
use std::path::Path;

/// Generate a thank-you message from a previously exported winners history
pub async fn thanks_from_history(path: &Path, config: &ThanksConfig) -> Result<()> {
    let rows = read_history(path).await?;
    let summary = ThanksSummary::from_rows(&rows);
    if summary.is_empty() {
        bail!("No winners in {}", path.display());
    }

    println!(
        "Generating thank-you message for {} winner(s)...",
        summary.winner_count
    );

    let client = GeminiClient::new(config.clone())?;
    let message = client
        .summarize(summary.winner_count, &summary.prize_sample)
        .await?;

    print_message(&message);
    Ok(())
}

pub fn print_message(message: &str) {
    println!();
    println!("{}", message.trim());
    println!();
}
