use crate::modules::backend::Registry;
use crate::modules::catalog::Catalog;
use crate::modules::matcher::PatternMatcher;

use super::models::{Candidate, CandidateSet};

fn leaf_name(key: &str) -> &str {
    key.rsplit('\\').next().unwrap_or(key)
}

/// 按键名与卸载登记的显示名收集注册表项
pub fn collect_registry_keys(
    registry: &dyn Registry,
    catalog: &Catalog,
    matcher: &PatternMatcher,
) -> CandidateSet {
    let mut set = CandidateSet::new();

    for root in &catalog.registry_roots {
        for term in matcher.tokens() {
            match registry.find_keys(root, term) {
                Ok(keys) => {
                    tracing::debug!("{} 中匹配 \"{}\" 的键: {}", root, term, keys.len());
                    set.extend(
                        keys.into_iter()
                            .filter(|key| matcher.matches(leaf_name(key)))
                            .map(|key| Candidate::registry_key(key).with_detail("键名匹配")),
                    );
                }
                Err(e) => tracing::debug!("跳过注册表搜索 {} ({}): {}", root, term, e),
            }
        }
    }

    // 卸载项以产品代码命名，只能按显示名识别
    for root in &catalog.uninstall_roots {
        let entries = match registry.uninstall_entries(root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("跳过卸载登记 {}: {}", root, e);
                continue;
            }
        };

        for entry in entries {
            let by_name = entry.display_name.as_deref().is_some_and(|n| matcher.matches(n));
            let by_publisher = entry.publisher.as_deref().is_some_and(|p| matcher.matches(p));

            if by_name || by_publisher || matcher.matches(leaf_name(&entry.key)) {
                let detail = entry
                    .display_name
                    .clone()
                    .unwrap_or_else(|| "卸载登记".to_string());
                set.insert(Candidate::registry_key(entry.key).with_detail(detail));
            }
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_name_is_last_segment() {
        assert_eq!(leaf_name(r"HKLM\SOFTWARE\Beckhoff"), "Beckhoff");
        assert_eq!(leaf_name("HKLM"), "HKLM");
    }
}
