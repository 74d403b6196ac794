use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::modules::backend::EnvScope;

/// 残留类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CandidateKind {
    /// 文件或目录
    FilesystemPath,
    /// 注册表项
    RegistryKey,
    /// 服务
    ServiceDescriptor,
    /// 计划任务
    ScheduledTaskDescriptor,
    /// 环境变量或 PATH 片段
    EnvVarEntry,
}

impl CandidateKind {
    /// 该类型标识符的层级关系
    pub fn hierarchy(&self) -> Hierarchy {
        match self {
            CandidateKind::FilesystemPath => Hierarchy::Path,
            CandidateKind::RegistryKey => Hierarchy::RegistryKey,
            _ => Hierarchy::Flat,
        }
    }
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateKind::FilesystemPath => write!(f, "File"),
            CandidateKind::RegistryKey => write!(f, "RegistryKey"),
            CandidateKind::ServiceDescriptor => write!(f, "Service"),
            CandidateKind::ScheduledTaskDescriptor => write!(f, "ScheduledTask"),
            CandidateKind::EnvVarEntry => write!(f, "EnvVar"),
        }
    }
}

/// 标识符之间的父子关系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hierarchy {
    /// 文件路径，`\` 与 `/` 均为分隔符
    Path,
    /// 注册表键，仅 `\` 为分隔符（键名中允许 `/`）
    RegistryKey,
    /// 无层级，只比较是否相同
    Flat,
}

impl Hierarchy {
    fn is_separator(&self, c: char) -> bool {
        match self {
            Hierarchy::Path => c == '\\' || c == '/',
            Hierarchy::RegistryKey => c == '\\',
            Hierarchy::Flat => false,
        }
    }

    /// 规范化后的比较键（不区分大小写，去掉末尾分隔符，保留根目录如 `C:\`）
    pub fn key(&self, identifier: &str) -> String {
        let lower = identifier.to_lowercase();
        let trimmed = lower.trim_end_matches(|c| self.is_separator(c));
        if trimmed.is_empty() || trimmed.ends_with(':') {
            lower
        } else {
            trimmed.to_string()
        }
    }

    /// `key` 的所有真祖先键，由近及远
    pub fn ancestor_keys<'a>(&self, key: &'a str) -> Vec<&'a str> {
        if matches!(self, Hierarchy::Flat) {
            return Vec::new();
        }

        let mut ancestors = Vec::new();
        for (i, c) in key.char_indices().rev() {
            if !self.is_separator(c) || i + c.len_utf8() == key.len() {
                continue;
            }
            // "c:\" 这类根目录本身以分隔符结尾
            ancestors.push(&key[..i + c.len_utf8()]);
            if i > 0 {
                ancestors.push(&key[..i]);
            }
        }
        ancestors
    }

    /// `child` 是否为 `parent` 的真后代
    pub fn is_descendant(&self, child: &str, parent: &str) -> bool {
        let child = self.key(child);
        let parent = self.key(parent);
        child != parent && self.ancestor_keys(&child).contains(&parent.as_str())
    }
}

/// 候选残留项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub identifier: String,
    /// 显示名、大小等说明，不参与去重
    pub detail: Option<String>,
    pub size: Option<u64>,
}

impl Candidate {
    pub fn new(kind: CandidateKind, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
            detail: None,
            size: None,
        }
    }

    pub fn path(identifier: impl Into<String>) -> Self {
        Self::new(CandidateKind::FilesystemPath, identifier)
    }

    pub fn registry_key(identifier: impl Into<String>) -> Self {
        Self::new(CandidateKind::RegistryKey, identifier)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// 去重键
    pub fn key(&self) -> String {
        self.kind.hierarchy().key(&self.identifier)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.key() == other.key()
    }
}

impl Eq for Candidate {}

/// 环境变量条目。标识符形如 `Machine\TWINCAT3DIR` 或 `User\Path;C:\TwinCAT\Bin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub scope: EnvScope,
    pub name: String,
    /// 列表型变量中的单个片段；为 None 时表示整个变量
    pub segment: Option<String>,
}

impl EnvEntry {
    pub fn variable(scope: EnvScope, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
            segment: None,
        }
    }

    pub fn segment(scope: EnvScope, name: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
            segment: Some(segment.into()),
        }
    }

    pub fn identifier(&self) -> String {
        match &self.segment {
            Some(segment) => format!("{}\\{};{}", self.scope.as_str(), self.name, segment),
            None => format!("{}\\{}", self.scope.as_str(), self.name),
        }
    }

    pub fn parse(identifier: &str) -> Option<Self> {
        let (scope, rest) = identifier.split_once('\\')?;
        let scope = EnvScope::parse(scope)?;
        let entry = match rest.split_once(';') {
            Some((name, segment)) => Self::segment(scope, name, segment),
            None => Self::variable(scope, rest),
        };
        (!entry.name.is_empty()).then_some(entry)
    }
}

/// 候选集合：按 (类型, 标识符) 不区分大小写去重，保持插入顺序
#[derive(Debug, Clone, Default, Serialize)]
pub struct CandidateSet {
    items: Vec<Candidate>,
    #[serde(skip)]
    seen: HashSet<(CandidateKind, String)>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入候选项，已存在时返回 false
    pub fn insert(&mut self, candidate: Candidate) -> bool {
        if self.seen.insert((candidate.kind, candidate.key())) {
            self.items.push(candidate);
            true
        } else {
            false
        }
    }

    pub fn extend<I: IntoIterator<Item = Candidate>>(&mut self, candidates: I) {
        for candidate in candidates {
            self.insert(candidate);
        }
    }

    pub fn contains(&self, kind: CandidateKind, identifier: &str) -> bool {
        self.seen
            .contains(&(kind, kind.hierarchy().key(identifier)))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.items.iter()
    }

    pub fn of_kind(&self, kind: CandidateKind) -> impl Iterator<Item = &Candidate> {
        self.items.iter().filter(move |c| c.kind == kind)
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.items.iter().map(|c| c.identifier.as_str()).collect()
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for CandidateSet {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_deduplicates_case_insensitively() {
        let mut set = CandidateSet::new();
        assert!(set.insert(Candidate::path(r"C:\TwinCAT")));
        assert!(!set.insert(Candidate::path(r"c:\twincat\")));
        assert!(set.insert(Candidate::registry_key(r"C:\TwinCAT")));
        assert_eq!(set.len(), 2);
        assert!(set.contains(CandidateKind::FilesystemPath, r"C:\TWINCAT"));
    }

    #[test]
    fn path_descendant_requires_separator_boundary() {
        let h = Hierarchy::Path;
        assert!(h.is_descendant(r"C:\TwinCAT\3.1\Bin", r"C:\TwinCAT"));
        assert!(h.is_descendant(r"C:\TwinCAT\3.1", r"C:\"));
        assert!(h.is_descendant("/tmp/x/y", "/tmp/x"));
        assert!(!h.is_descendant(r"C:\TwinCAT3", r"C:\TwinCAT"));
        assert!(!h.is_descendant(r"C:\TwinCAT", r"C:\TwinCAT"));
    }

    #[test]
    fn registry_keys_do_not_split_on_forward_slash() {
        let h = Hierarchy::RegistryKey;
        assert!(!h.is_descendant(r"HKLM\SOFTWARE\A/B", r"HKLM\SOFTWARE\A"));
        assert!(h.is_descendant(r"HKLM\SOFTWARE\A\B", r"hklm\software\a"));
    }

    #[test]
    fn env_entry_identifier_parses_back() {
        let entry = EnvEntry::segment(EnvScope::Machine, "Path", r"C:\TwinCAT\Common64");
        assert_eq!(entry.identifier(), r"Machine\Path;C:\TwinCAT\Common64");
        assert_eq!(EnvEntry::parse(&entry.identifier()), Some(entry));

        let var = EnvEntry::parse(r"User\TWINCAT3DIR").unwrap();
        assert_eq!(var.scope, EnvScope::User);
        assert!(var.segment.is_none());
        assert!(EnvEntry::parse(r"Process\X").is_none());
    }

    #[test]
    fn flat_hierarchy_has_no_ancestors() {
        assert!(!Hierarchy::Flat.is_descendant(r"Machine\Path;C:\TwinCAT\Bin", r"Machine\Path"));
    }
}
