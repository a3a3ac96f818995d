//! Evaluate command - scores an answer from a JSON file

use std::path::Path;

use crate::config::AppConfig;
use crate::domain::{EvaluationRequest, EvaluationResponse, GroundingEvaluator};

/// Evaluate the request in `file` and print the response as pretty JSON
pub async fn run(file: &Path) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let response = evaluate_file(&config, file).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

pub async fn evaluate_file(config: &AppConfig, file: &Path) -> anyhow::Result<EvaluationResponse> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    let request: EvaluationRequest = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Invalid evaluation request in {}: {}", file.display(), e))?;

    let evaluator = GroundingEvaluator::new(config.evaluation.clone())?;
    Ok(evaluator.evaluate_request(&request))
}
