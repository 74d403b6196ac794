//! 全盘扫描：每个卷一个阻塞任务并行执行，全部结束后合并结果。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::modules::backend::FileSystem;
use crate::modules::catalog::models::EntryFilter;
use crate::modules::common::utils;
use crate::modules::matcher::PatternMatcher;

use super::models::{Candidate, CandidateSet};

/// 扫描单个卷，返回完整路径匹配的目录
pub fn scan_volume(
    fs: &dyn FileSystem,
    root: &Path,
    matcher: &PatternMatcher,
    denylist: &[String],
) -> Vec<Candidate> {
    let started = std::time::Instant::now();

    let dirs = match fs.list_entries(root, None, EntryFilter::DirectoriesOnly, denylist) {
        Ok(dirs) => dirs,
        Err(e) => {
            tracing::warn!("扫描卷 {} 失败: {}", root.display(), e);
            return Vec::new();
        }
    };

    let found: Vec<Candidate> = dirs
        .into_iter()
        .filter(|path| !utils::is_within_any(path, denylist))
        .filter(|path| matcher.matches(&path.to_string_lossy()))
        .map(|path| Candidate::path(path.to_string_lossy().to_string()).with_detail("全盘扫描"))
        .collect();

    tracing::info!(
        "卷 {} 扫描完成: {} 个匹配, 耗时 {:.1}s",
        root.display(),
        found.len(),
        started.elapsed().as_secs_f64()
    );

    found
}

/// 并行扫描所有卷
pub async fn sweep_volumes(
    fs: Arc<dyn FileSystem>,
    volumes: Vec<PathBuf>,
    matcher: Arc<PatternMatcher>,
    denylist: Arc<Vec<String>>,
) -> CandidateSet {
    let mut handles = Vec::with_capacity(volumes.len());

    for root in volumes {
        let fs = fs.clone();
        let matcher = matcher.clone();
        let denylist = denylist.clone();
        let label = root.display().to_string();

        let handle = tokio::task::spawn_blocking(move || {
            scan_volume(fs.as_ref(), &root, &matcher, &denylist)
        });
        handles.push((label, handle));
    }

    // 等待所有卷完成后再合并
    let mut set = CandidateSet::new();
    for (label, handle) in handles {
        match handle.await {
            Ok(found) => set.extend(found),
            Err(e) => tracing::warn!("卷 {} 扫描任务异常: {}", label, e),
        }
    }

    set
}
