use std::path::Path;

use super::models::RunReport;
use crate::modules::common::error::UninstallerError;

/// 以格式化 JSON 写出报告
pub fn write_report(report: &RunReport, path: &Path) -> Result<(), UninstallerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;

    tracing::info!("报告已写入: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::models::SystemDirs;
    use crate::modules::catalog::Catalog;
    use crate::modules::reconciler::build_plan;
    use crate::modules::reporter::models::RunMode;
    use crate::modules::scanner::models::{Candidate, CandidateSet};

    #[test]
    fn report_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");

        let catalog = Catalog::beckhoff_with(&SystemDirs::windows_defaults());
        let set: CandidateSet = [Candidate::path(r"C:\TwinCAT")].into_iter().collect();
        let report = RunReport::new(RunMode::Scan).with_plan(&build_plan(&[set], &catalog));

        write_report(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["mode"], "scan");
        assert_eq!(value["candidates"][0]["kind"], "FilesystemPath");
        assert_eq!(value["candidates"][0]["items"][0]["identifier"], r"C:\TwinCAT");
        assert!(value["outcome"].is_null());
    }
}
