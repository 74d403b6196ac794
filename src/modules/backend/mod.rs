//! 文件系统 / 注册表 / 系统清单的能力接口。
//!
//! 扫描器与清理器只依赖这里的 trait：
//! - [`native::NativeBackend`]：std::fs、walkdir、glob 与 winreg 实现，作为主要实现
//! - [`shell::ShellBackend`]：调用 `cmd`、`reg.exe`、PowerShell 的删除实现，作为后备

pub mod native;
pub mod shell;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::modules::catalog::models::EntryFilter;
use crate::modules::common::error::UninstallerError;
use crate::modules::scanner::models::Candidate;

pub type BackendResult<T> = Result<T, UninstallerError>;

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// 展开 `*` 通配符，只返回存在的路径
    fn expand(&self, pattern: &str) -> Vec<PathBuf>;

    /// 列出 `root` 下的条目（不含 `root` 本身）。
    /// 路径包含 `exclude` 中任一片段（不区分大小写）的子树不会被进入。
    fn list_entries(
        &self,
        root: &Path,
        max_depth: Option<usize>,
        filter: EntryFilter,
        exclude: &[String],
    ) -> BackendResult<Vec<PathBuf>>;

    fn dir_size(&self, path: &Path) -> BackendResult<u64>;

    /// 已挂载的卷根目录
    fn volumes(&self) -> Vec<PathBuf>;
}

/// 卸载登记项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallEntry {
    /// 完整键路径，如 `HKLM\SOFTWARE\...\Uninstall\{GUID}`
    pub key: String,
    pub display_name: Option<String>,
    pub publisher: Option<String>,
}

pub trait Registry: Send + Sync {
    /// 在 `root` 下递归查找键名包含 `term` 的键，返回完整路径
    fn find_keys(&self, root: &str, term: &str) -> BackendResult<Vec<String>>;

    /// 枚举 `root` 的直接子键及其显示名
    fn uninstall_entries(&self, root: &str) -> BackendResult<Vec<UninstallEntry>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub display_name: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// 任务完整路径，如 `\Beckhoff\TcUpdate`
    pub path: String,
    pub command: Option<String>,
}

/// 环境变量作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvScope {
    Machine,
    User,
}

impl EnvScope {
    pub const ALL: [EnvScope; 2] = [EnvScope::Machine, EnvScope::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvScope::Machine => "Machine",
            EnvScope::User => "User",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("machine") {
            Some(EnvScope::Machine)
        } else if s.eq_ignore_ascii_case("user") {
            Some(EnvScope::User)
        } else {
            None
        }
    }

    #[cfg(windows)]
    pub(crate) fn registry_location(&self) -> (crate::modules::common::utils::Hive, &'static str) {
        use crate::modules::common::utils::Hive;

        match self {
            EnvScope::Machine => (
                Hive::LocalMachine,
                r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment",
            ),
            EnvScope::User => (Hive::CurrentUser, "Environment"),
        }
    }
}

pub trait SystemInventory: Send + Sync {
    fn services(&self) -> BackendResult<Vec<ServiceInfo>>;

    fn scheduled_tasks(&self) -> BackendResult<Vec<TaskInfo>>;

    /// 读取某一作用域的全部变量 (名称, 值)
    fn environment(&self, scope: EnvScope) -> BackendResult<Vec<(String, String)>>;
}

/// 删除能力
pub trait Remover: Send + Sync {
    /// 目标是否仍然存在
    fn exists(&self, candidate: &Candidate) -> bool;

    fn remove(&self, candidate: &Candidate) -> BackendResult<()>;
}

/// 当前平台的默认组合：原生实现为主，命令行实现为后备
pub fn default_backends() -> (native::NativeBackend, shell::ShellBackend) {
    (native::NativeBackend::new(), shell::ShellBackend::new())
}
