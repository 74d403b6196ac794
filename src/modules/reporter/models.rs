use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::modules::cleaner::models::RunOutcome;
use crate::modules::reconciler::{CleanupPlan, DeletionSet, Withheld};

/// 运行方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Scan,
    Clean,
}

/// 清理报告
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub mode: RunMode,
    pub candidates: Vec<DeletionSet>,
    pub withheld: Vec<Withheld>,
    pub outcome: Option<RunOutcome>,
    pub total_size_freed: u64,
    pub success: bool,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn new(mode: RunMode) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            mode,
            candidates: Vec::new(),
            withheld: Vec::new(),
            outcome: None,
            total_size_freed: 0,
            success: true,
            warnings: Vec::new(),
        }
    }

    pub fn with_plan(mut self, plan: &CleanupPlan) -> Self {
        self.candidates = [
            &plan.files,
            &plan.registry,
            &plan.environment,
            &plan.services,
            &plan.tasks,
        ]
        .into_iter()
        .filter(|set| !set.is_empty())
        .cloned()
        .collect();
        self.withheld = plan.withheld.clone();
        self.warnings = plan.warnings();
        self
    }

    pub fn with_outcome(mut self, outcome: RunOutcome) -> Self {
        self.total_size_freed = outcome.bytes_freed;
        self.success = outcome.failed == 0;
        self.outcome = Some(outcome);
        self
    }
}
