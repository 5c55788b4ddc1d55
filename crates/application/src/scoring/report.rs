//! Report emission.

use mcp_eval_domain::{EvalError, EvalResult, EvaluationReport};
use std::path::Path;
use tracing::info;

/// Write a run report as pretty-printed JSON.
pub fn write_report(report: &EvaluationReport, path: &Path) -> EvalResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| EvalError::Internal(format!("Failed to serialize report: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        EvalError::Internal(format!("Failed to write report to {}: {e}", path.display()))
    })?;

    info!(
        path = %path.display(),
        cases = report.cases.len(),
        "Evaluation report written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_written_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluation_result.json");

        let report = EvaluationReport::new("gpt-4o", 0.8, Utc::now(), Vec::new());
        write_report(&report, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: EvaluationReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.model, "gpt-4o");
        assert_eq!(parsed.score_threshold, 0.8);
        assert_eq!(parsed.run_id, report.run_id);
        // Pretty output, one field per line.
        assert!(contents.contains("\n  \"model\": \"gpt-4o\""));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let report = EvaluationReport::new("gpt-4o", 0.8, Utc::now(), Vec::new());
        let err = write_report(&report, Path::new("/nonexistent/dir/out.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/out.json"));
    }
}
