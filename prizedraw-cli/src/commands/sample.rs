use anyhow::{Context, Result};
use prizedraw_core::sample_csv;
use std::path::Path;

/// Write the example participant list, to stdout when no path is given
pub async fn write_sample(output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, sample_csv())
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Sample participant list written to {}", path.display());
        }
        None => print!("{}", sample_csv()),
    }
    Ok(())
}
