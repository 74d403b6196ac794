use crate::modules::backend::SystemInventory;
use crate::modules::matcher::PatternMatcher;

use super::models::{Candidate, CandidateKind, CandidateSet};

pub fn collect_scheduled_tasks(
    inventory: &dyn SystemInventory,
    matcher: &PatternMatcher,
) -> CandidateSet {
    let tasks = match inventory.scheduled_tasks() {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::debug!("跳过计划任务枚举: {}", e);
            return CandidateSet::new();
        }
    };

    tasks
        .into_iter()
        .filter(|t| {
            matcher.matches(&t.path) || t.command.as_deref().is_some_and(|c| matcher.matches(c))
        })
        .map(|t| {
            let candidate = Candidate::new(CandidateKind::ScheduledTaskDescriptor, t.path);
            match t.command {
                Some(command) => candidate.with_detail(command),
                None => candidate,
            }
        })
        .collect()
}
