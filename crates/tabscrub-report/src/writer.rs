//! JSON persistence for cleaning reports.

use std::fs;
use std::path::Path;

use tabscrub_model::{CleanError, CleaningReport, Result};

/// Write the report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &CleaningReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|error| CleanError::Message(format!("report json: {error}")))?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_json_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = CleaningReport {
            encoding: "UTF-8".to_string(),
            rows_before: 2,
            rows_after: 2,
            ..CleaningReport::default()
        };
        write_report_json(&path, &report).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"encoding\": \"UTF-8\""));
        assert!(contents.contains("\"rows_before\": 2"));
    }
}
