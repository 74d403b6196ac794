use crate::modules::backend::{EnvScope, SystemInventory};
use crate::modules::matcher::PatternMatcher;

use super::models::{Candidate, CandidateKind, CandidateSet, EnvEntry};

/// 按 `;` 拆分处理的列表型变量
const LIST_VARIABLES: &[&str] = &["Path", "PSModulePath"];

fn is_list_variable(name: &str) -> bool {
    LIST_VARIABLES.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn same_segment(a: &str, b: &str) -> bool {
    a.trim().trim_end_matches('\\').eq_ignore_ascii_case(b.trim().trim_end_matches('\\'))
}

/// 从列表值中去掉某个片段；片段不存在时返回 None
pub fn remove_segment(value: &str, segment: &str) -> Option<String> {
    let parts: Vec<&str> = value.split(';').collect();
    let kept: Vec<&str> = parts
        .iter()
        .copied()
        .filter(|part| !same_segment(part, segment))
        .collect();

    if kept.len() == parts.len() {
        None
    } else {
        Some(kept.join(";"))
    }
}

/// 收集机器级与用户级环境变量中的匹配项
pub fn collect_environment(inventory: &dyn SystemInventory, matcher: &PatternMatcher) -> CandidateSet {
    let mut set = CandidateSet::new();

    for scope in EnvScope::ALL {
        let vars = match inventory.environment(scope) {
            Ok(vars) => vars,
            Err(e) => {
                tracing::debug!("跳过 {} 环境变量: {}", scope.as_str(), e);
                continue;
            }
        };

        for (name, value) in vars {
            if is_list_variable(&name) {
                for segment in value.split(';').filter(|s| !s.trim().is_empty()) {
                    if matcher.matches(segment) {
                        let entry = EnvEntry::segment(scope, name.clone(), segment.trim());
                        set.insert(Candidate::new(CandidateKind::EnvVarEntry, entry.identifier()));
                    }
                }
            } else if matcher.matches(&name) || matcher.matches(&value) {
                let entry = EnvEntry::variable(scope, name.clone());
                set.insert(
                    Candidate::new(CandidateKind::EnvVarEntry, entry.identifier()).with_detail(value),
                );
            }
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_segment_ignores_case_and_trailing_separator() {
        let value = r"%SystemRoot%\system32;C:\TwinCAT\Common64\;C:\Tools";
        assert_eq!(
            remove_segment(value, r"c:\twincat\common64").as_deref(),
            Some(r"%SystemRoot%\system32;C:\Tools")
        );
        assert_eq!(remove_segment(value, r"C:\Other"), None);
    }

    #[test]
    fn list_variables_are_case_insensitive() {
        assert!(is_list_variable("PATH"));
        assert!(is_list_variable("psmodulepath"));
        assert!(!is_list_variable("TWINCAT3DIR"));
    }
}
