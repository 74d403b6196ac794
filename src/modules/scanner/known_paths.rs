use crate::modules::backend::FileSystem;
use crate::modules::catalog::Catalog;
use crate::modules::common::utils;

use super::models::{Candidate, CandidateSet};

/// 检查已知安装位置是否存在
pub fn collect_known_paths(fs: &dyn FileSystem, catalog: &Catalog) -> CandidateSet {
    let mut set = CandidateSet::new();

    for pattern in &catalog.known_paths {
        let paths = fs.expand(pattern);
        if paths.is_empty() {
            tracing::debug!("已知路径不存在: {}", pattern);
            continue;
        }

        for path in paths {
            let identifier = path.to_string_lossy().to_string();
            let mut candidate = Candidate::path(identifier.clone());

            if fs.is_dir(&path) {
                // 目录大小仅用于展示，失败不影响结果
                match fs.dir_size(&path) {
                    Ok(size) => {
                        candidate = candidate
                            .with_size(size)
                            .with_detail(format!("目录, {}", utils::format_size(size)));
                    }
                    Err(e) => {
                        tracing::debug!("无法计算目录大小 {}: {}", identifier, e);
                        candidate = candidate.with_detail("目录");
                    }
                }
            } else {
                candidate = candidate.with_detail("已知文件");
            }

            tracing::debug!("发现已知路径: {}", identifier);
            set.insert(candidate);
        }
    }

    set
}
