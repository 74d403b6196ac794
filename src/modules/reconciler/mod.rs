//! 合并各扫描器的结果，生成最小删除集合。
//!
//! 同一类型内去重后按规范化标识符排序，依次接受不以已接受项为祖先的候选项。
//! 排序保证祖先先于后代出现，所以结果是一个反链：任意两项互不为祖先/后代。

pub mod safety;

use std::collections::HashSet;

use serde::Serialize;

use crate::modules::catalog::Catalog;
use crate::modules::scanner::models::{Candidate, CandidateKind, CandidateSet};

/// 单一类型的删除集合
#[derive(Debug, Clone, Serialize)]
pub struct DeletionSet {
    pub kind: CandidateKind,
    items: Vec<Candidate>,
}

impl DeletionSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.items.iter()
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.items.iter().map(|c| c.identifier.as_str()).collect()
    }

    pub fn total_size(&self) -> u64 {
        self.items.iter().filter_map(|c| c.size).sum()
    }

    pub fn to_candidate_set(&self) -> CandidateSet {
        self.items.iter().cloned().collect()
    }

    fn retain<F: FnMut(&Candidate) -> bool>(&mut self, f: F) {
        self.items.retain(f);
    }
}

impl<'a> IntoIterator for &'a DeletionSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// 合并 `sets` 中类型为 `kind` 的候选项并去掉被祖先覆盖的后代
pub fn reconcile<'a, I>(sets: I, kind: CandidateKind) -> DeletionSet
where
    I: IntoIterator<Item = &'a CandidateSet>,
{
    let hierarchy = kind.hierarchy();

    let mut union = CandidateSet::new();
    for set in sets {
        union.extend(set.of_kind(kind).cloned());
    }

    let mut sorted: Vec<(String, Candidate)> = union.into_iter().map(|c| (c.key(), c)).collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut accepted: HashSet<String> = HashSet::new();
    let mut items = Vec::with_capacity(sorted.len());

    for (key, candidate) in sorted {
        let covered = hierarchy
            .ancestor_keys(&key)
            .into_iter()
            .any(|ancestor| accepted.contains(ancestor));

        if covered {
            tracing::debug!("已被上级覆盖: {}", candidate.identifier);
            continue;
        }

        accepted.insert(key);
        items.push(candidate);
    }

    DeletionSet { kind, items }
}

/// 被安全检查拦下的项
#[derive(Debug, Clone, Serialize)]
pub struct Withheld {
    pub candidate: Candidate,
    pub reason: String,
}

/// 按类型整理后的清理计划
#[derive(Debug, Clone, Serialize)]
pub struct CleanupPlan {
    pub files: DeletionSet,
    pub registry: DeletionSet,
    pub environment: DeletionSet,
    pub services: DeletionSet,
    pub tasks: DeletionSet,
    pub withheld: Vec<Withheld>,
}

impl CleanupPlan {
    /// 文件与注册表：确认后由清理器删除
    pub fn has_primary_work(&self) -> bool {
        !self.files.is_empty() || !self.registry.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_primary_work()
            && self.environment.is_empty()
            && self.services.is_empty()
            && self.tasks.is_empty()
    }

    /// 需要手动处理的服务与计划任务，以及被拦下的项
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for service in &self.services {
            warnings.push(format!(
                "服务需手动删除: {} (sc stop \"{}\" && sc delete \"{}\")",
                service.identifier, service.identifier, service.identifier
            ));
        }

        for task in &self.tasks {
            warnings.push(format!(
                "计划任务需手动删除: {} (schtasks /Delete /TN \"{}\" /F)",
                task.identifier, task.identifier
            ));
        }

        for withheld in &self.withheld {
            warnings.push(format!(
                "已跳过受保护项: {} ({})",
                withheld.candidate.identifier, withheld.reason
            ));
        }

        warnings
    }
}

/// 合并所有扫描结果并执行安全检查
pub fn build_plan(sets: &[CandidateSet], catalog: &Catalog) -> CleanupPlan {
    let mut files = reconcile(sets, CandidateKind::FilesystemPath);
    let mut registry = reconcile(sets, CandidateKind::RegistryKey);
    let mut withheld = Vec::new();

    for set in [&mut files, &mut registry] {
        set.retain(|candidate| match safety::pre_delete_check(candidate, catalog) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("跳过关键系统项 {}: {}", candidate.identifier, e);
                withheld.push(Withheld {
                    candidate: candidate.clone(),
                    reason: e.to_string(),
                });
                false
            }
        });
    }

    CleanupPlan {
        files,
        registry,
        environment: reconcile(sets, CandidateKind::EnvVarEntry),
        services: reconcile(sets, CandidateKind::ServiceDescriptor),
        tasks: reconcile(sets, CandidateKind::ScheduledTaskDescriptor),
        withheld,
    }
}
