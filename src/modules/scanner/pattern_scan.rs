use std::path::Path;

use crate::modules::backend::FileSystem;
use crate::modules::catalog::Catalog;
use crate::modules::common::utils;
use crate::modules::matcher::PatternMatcher;

use super::models::{Candidate, CandidateSet};

/// 在固定目录下按名称查找匹配条目
pub fn collect_pattern_matches(
    fs: &dyn FileSystem,
    catalog: &Catalog,
    matcher: &PatternMatcher,
) -> CandidateSet {
    let mut set = CandidateSet::new();

    for target in &catalog.scan_targets {
        let parent = Path::new(&target.parent);
        let entries = match fs.list_entries(parent, Some(target.depth), target.filter, &[]) {
            Ok(entries) => entries,
            Err(e) if e.is_skippable() => {
                tracing::debug!("跳过扫描目录 {}: {}", target.parent, e);
                continue;
            }
            Err(e) => {
                tracing::warn!("扫描目录失败 {}: {}", target.parent, e);
                continue;
            }
        };

        for path in entries {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if !matcher.matches(&name) {
                continue;
            }

            let mut candidate = Candidate::path(path.to_string_lossy().to_string());
            if let Ok(size) = fs.dir_size(&path) {
                candidate = candidate
                    .with_size(size)
                    .with_detail(utils::format_size(size));
            }

            set.insert(candidate);
        }
    }

    set
}
