//! 删除执行器：逐项删除，主方式失败时改用后备方式重试一次。
//!
//! 不回滚，单项失败不影响后续项目。

pub mod models;

use crate::modules::backend::Remover;
use crate::modules::reconciler::DeletionSet;
use crate::modules::scanner::models::Candidate;
use models::{CleanResult, ItemOutcome, RunOutcome};

pub struct Cleaner<'a> {
    primary: &'a dyn Remover,
    fallback: &'a dyn Remover,
}

impl<'a> Cleaner<'a> {
    pub fn new(primary: &'a dyn Remover, fallback: &'a dyn Remover) -> Self {
        Self { primary, fallback }
    }

    /// 删除集合中的全部项目，调用前须已获得用户确认
    pub fn execute(&self, set: &DeletionSet) -> RunOutcome {
        let mut outcome = RunOutcome::default();

        for candidate in set {
            let result = self.remove_one(candidate);
            outcome.record(result);
        }

        tracing::info!(
            "{} 清理完成: 删除 {} 项，失败 {} 项，已不存在 {} 项",
            set.kind,
            outcome.deleted,
            outcome.failed,
            outcome.gone
        );

        outcome
    }

    fn remove_one(&self, candidate: &Candidate) -> CleanResult {
        let finish = |outcome: ItemOutcome| CleanResult {
            kind: candidate.kind,
            identifier: candidate.identifier.clone(),
            bytes_freed: if outcome.is_deleted() { candidate.size.unwrap_or(0) } else { 0 },
            outcome,
        };

        if !self.primary.exists(candidate) {
            tracing::debug!("已不存在: {}", candidate.identifier);
            return finish(ItemOutcome::Gone);
        }

        let primary_err = match self.primary.remove(candidate) {
            Ok(()) => {
                tracing::info!("已删除: {}", candidate.identifier);
                return finish(ItemOutcome::DeletedPrimary);
            }
            Err(e) => e,
        };

        tracing::warn!("删除失败 {}: {}，改用后备方式", candidate.identifier, primary_err);

        match self.fallback.remove(candidate) {
            Ok(()) => {
                tracing::info!("已删除 (后备方式): {}", candidate.identifier);
                finish(ItemOutcome::DeletedFallback)
            }
            Err(e) => {
                tracing::error!("删除失败 {}: {}", candidate.identifier, e);
                finish(ItemOutcome::Failed(format!("{}; 后备方式: {}", primary_err, e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::backend::BackendResult;
    use crate::modules::common::error::UninstallerError;
    use crate::modules::reconciler::reconcile;
    use crate::modules::scanner::models::{CandidateKind, CandidateSet};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// 记录调用次数的假删除器
    struct FakeRemover {
        present: Mutex<HashSet<String>>,
        failing: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRemover {
        fn new(present: &[&str], failing: bool) -> Self {
            Self {
                present: Mutex::new(present.iter().map(|s| s.to_string()).collect()),
                failing,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Remover for FakeRemover {
        fn exists(&self, candidate: &Candidate) -> bool {
            self.present.lock().unwrap().contains(&candidate.identifier)
        }

        fn remove(&self, candidate: &Candidate) -> BackendResult<()> {
            self.calls.lock().unwrap().push(candidate.identifier.clone());
            if self.failing {
                return Err(UninstallerError::PermissionDenied("拒绝访问".to_string()));
            }
            self.present.lock().unwrap().remove(&candidate.identifier);
            Ok(())
        }
    }

    fn deletion_set(ids: &[&str]) -> DeletionSet {
        let set: CandidateSet = ids.iter().map(|id| Candidate::path(*id)).collect();
        reconcile([&set], CandidateKind::FilesystemPath)
    }

    #[test]
    fn vanished_items_are_gone_and_not_counted() {
        let primary = FakeRemover::new(&[], false);
        let fallback = FakeRemover::new(&[], false);

        let outcome = Cleaner::new(&primary, &fallback).execute(&deletion_set(&[r"C:\TwinCAT"]));

        assert_eq!(outcome.deleted, 0);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.gone, 1);
        assert_eq!(outcome.results[0].outcome, ItemOutcome::Gone);
        assert!(primary.calls().is_empty());
    }

    #[test]
    fn fallback_runs_exactly_once_and_counts_as_deleted() {
        let primary = FakeRemover::new(&[r"C:\TwinCAT"], true);
        let fallback = FakeRemover::new(&[r"C:\TwinCAT"], false);

        let outcome = Cleaner::new(&primary, &fallback).execute(&deletion_set(&[r"C:\TwinCAT"]));

        assert_eq!(outcome.deleted, 1);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.results[0].outcome, ItemOutcome::DeletedFallback);
        assert_eq!(primary.calls().len(), 1);
        assert_eq!(fallback.calls(), vec![r"C:\TwinCAT".to_string()]);
    }

    #[test]
    fn failures_do_not_stop_the_run() {
        let primary = FakeRemover::new(&[r"C:\A", r"C:\B"], true);
        let fallback = FakeRemover::new(&[], true);

        let outcome = Cleaner::new(&primary, &fallback).execute(&deletion_set(&[r"C:\A", r"C:\B"]));

        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.deleted, 0);
        assert_eq!(fallback.calls().len(), 2);
        assert_eq!(outcome.failures().count(), 2);
    }

    #[test]
    fn primary_success_skips_fallback() {
        let primary = FakeRemover::new(&[r"C:\TwinCAT"], false);
        let fallback = FakeRemover::new(&[], false);

        let outcome = Cleaner::new(&primary, &fallback).execute(&deletion_set(&[r"C:\TwinCAT"]));

        assert_eq!(outcome.deleted, 1);
        assert_eq!(outcome.results[0].outcome, ItemOutcome::DeletedPrimary);
        assert!(fallback.calls().is_empty());
    }

    #[test]
    fn merge_adds_counters() {
        let mut total = RunOutcome::default();
        let mut single = RunOutcome::default();
        single.record(CleanResult {
            kind: CandidateKind::RegistryKey,
            identifier: r"HKLM\SOFTWARE\Beckhoff".to_string(),
            outcome: ItemOutcome::DeletedPrimary,
            bytes_freed: 0,
        });
        total.merge(single);
        total.warnings.push("x".to_string());

        assert_eq!(total.deleted, 1);
        assert_eq!(total.results.len(), 1);
    }
}
