use crate::modules::backend::SystemInventory;
use crate::modules::matcher::PatternMatcher;

use super::models::{Candidate, CandidateKind, CandidateSet};

pub fn collect_services(inventory: &dyn SystemInventory, matcher: &PatternMatcher) -> CandidateSet {
    let services = match inventory.services() {
        Ok(services) => services,
        Err(e) => {
            tracing::debug!("跳过服务枚举: {}", e);
            return CandidateSet::new();
        }
    };

    services
        .into_iter()
        .filter(|s| {
            matcher.matches(&s.name)
                || s.display_name.as_deref().is_some_and(|d| matcher.matches(d))
                || s.image_path.as_deref().is_some_and(|p| matcher.matches(p))
        })
        .map(|s| {
            let detail = s.display_name.or(s.image_path).unwrap_or_default();
            Candidate::new(CandidateKind::ServiceDescriptor, s.name).with_detail(detail)
        })
        .collect()
}
