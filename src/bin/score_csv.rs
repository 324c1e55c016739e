//! Score a lead CSV offline and print the scored leads plus dashboard stats.
//!
//! Usage: `score_csv <file.csv>`

use lead_quality_engine::aggregator::aggregate;
use lead_quality_engine::config::Config;
use lead_quality_engine::ingestion::ingest_csv;
use serde_json::json;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: score_csv <file.csv>"))?;

    // Scoring rules honour the same SCORING_* variables as the server
    let config = Config::from_env()?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;

    let mut leads = ingest_csv(&bytes, &config.scoring)
        .map_err(|e| anyhow::anyhow!("{}: {}", path, e))?;
    leads.sort_by(|a, b| b.score.cmp(&a.score));

    let output = json!({
        "leads": leads,
        "dashboard": aggregate(&leads),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
