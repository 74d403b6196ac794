use serde::{Deserialize, Serialize};

use crate::modules::scanner::models::CandidateKind;

/// 单项删除的最终状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message")]
pub enum ItemOutcome {
    /// 执行前已不存在
    Gone,
    DeletedPrimary,
    DeletedFallback,
    Failed(String),
}

impl ItemOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, ItemOutcome::DeletedPrimary | ItemOutcome::DeletedFallback)
    }
}

/// 删除操作结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanResult {
    pub kind: CandidateKind,
    pub identifier: String,
    pub outcome: ItemOutcome,
    pub bytes_freed: u64,
}

/// 一次执行的汇总
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOutcome {
    pub deleted: usize,
    pub failed: usize,
    pub gone: usize,
    pub bytes_freed: u64,
    pub warnings: Vec<String>,
    pub results: Vec<CleanResult>,
}

impl RunOutcome {
    pub fn record(&mut self, result: CleanResult) {
        match &result.outcome {
            ItemOutcome::Gone => self.gone += 1,
            ItemOutcome::DeletedPrimary | ItemOutcome::DeletedFallback => {
                self.deleted += 1;
                self.bytes_freed += result.bytes_freed;
            }
            ItemOutcome::Failed(_) => self.failed += 1,
        }
        self.results.push(result);
    }

    pub fn merge(&mut self, other: RunOutcome) {
        self.deleted += other.deleted;
        self.failed += other.failed;
        self.gone += other.gone;
        self.bytes_freed += other.bytes_freed;
        self.warnings.extend(other.warnings);
        self.results.extend(other.results);
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            ItemOutcome::Failed(message) => Some((r.identifier.as_str(), message.as_str())),
            _ => None,
        })
    }
}
