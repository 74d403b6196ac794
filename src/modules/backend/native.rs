use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{
    BackendResult, EnvScope, FileSystem, Registry, Remover, ServiceInfo, SystemInventory, TaskInfo,
    UninstallEntry,
};
use crate::modules::catalog::models::EntryFilter;
use crate::modules::common::error::UninstallerError;
use crate::modules::common::utils;
use crate::modules::scanner::models::{Candidate, CandidateKind, EnvEntry};

/// 注册表键名搜索的最大递归深度
#[cfg_attr(not(windows), allow(dead_code))]
const MAX_REGISTRY_DEPTH: u32 = 8;

#[cfg_attr(not(windows), allow(dead_code))]
fn map_registry_error(path: &str) -> impl Fn(std::io::Error) -> UninstallerError + '_ {
    move |e| match e.kind() {
        std::io::ErrorKind::NotFound => UninstallerError::NotFound(path.to_string()),
        std::io::ErrorKind::PermissionDenied => UninstallerError::PermissionDenied(path.to_string()),
        _ => UninstallerError::Registry(format!("{}: {}", path, e)),
    }
}

/// 只有"不存在"才算已删除；拒绝访问等错误按存在处理，交给删除与后备方式报告
#[cfg_attr(not(windows), allow(dead_code))]
fn still_present<T>(result: &BackendResult<T>) -> bool {
    !matches!(result, Err(UninstallerError::NotFound(_)))
}

/// 删除文件或链接本身，不跟随链接
fn remove_entry(path: &Path) -> std::io::Result<()> {
    let metadata = std::fs::symlink_metadata(path)?;

    #[cfg(windows)]
    {
        use std::os::windows::fs::FileTypeExt;
        // 目录符号链接与联接点只能用 remove_dir 删除
        if metadata.file_type().is_symlink_dir() {
            return std::fs::remove_dir(path);
        }
    }

    if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// 基于 std::fs / walkdir / glob / winreg 的实现
#[derive(Debug, Clone, Default)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for NativeBackend {
    fn exists(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path)
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    fn expand(&self, pattern: &str) -> Vec<PathBuf> {
        if !pattern.contains(['*', '?']) {
            let path = PathBuf::from(pattern);
            return if FileSystem::exists(self, &path) { vec![path] } else { Vec::new() };
        }

        match glob::glob(pattern) {
            Ok(paths) => paths.filter_map(|p| p.ok()).collect(),
            Err(e) => {
                tracing::debug!("无效的通配路径 {}: {}", pattern, e);
                Vec::new()
            }
        }
    }

    fn list_entries(
        &self,
        root: &Path,
        max_depth: Option<usize>,
        filter: EntryFilter,
        exclude: &[String],
    ) -> BackendResult<Vec<PathBuf>> {
        // 根目录不可访问时整体跳过
        std::fs::read_dir(root)?;

        let mut walker = WalkDir::new(root).min_depth(1).follow_links(false);
        if let Some(depth) = max_depth {
            walker = walker.max_depth(depth);
        }

        let mut entries = Vec::new();

        for entry in walker
            .into_iter()
            .filter_entry(|e| !utils::is_within_any(e.path(), exclude))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("跳过无法访问的条目: {}", e);
                    continue;
                }
            };

            let keep = match filter {
                EntryFilter::FilesOnly => !entry.file_type().is_dir(),
                EntryFilter::DirectoriesOnly => entry.file_type().is_dir(),
            };

            if keep {
                entries.push(entry.into_path());
            }
        }

        Ok(entries)
    }

    fn dir_size(&self, path: &Path) -> BackendResult<u64> {
        Ok(utils::calculate_dir_size(path)?)
    }

    fn volumes(&self) -> Vec<PathBuf> {
        #[cfg(windows)]
        {
            (b'A'..=b'Z')
                .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
                .filter(|root| root.exists())
                .collect()
        }

        #[cfg(not(windows))]
        {
            vec![PathBuf::from("/")]
        }
    }
}

#[cfg(windows)]
mod win {
    use super::*;
    use crate::modules::scanner::environment::remove_segment;
    use winreg::enums::*;
    use winreg::RegKey;

    fn open_path(path: &str) -> BackendResult<(utils::Hive, String, RegKey)> {
        let (hive, subkey) = utils::parse_registry_path(path)
            .ok_or_else(|| UninstallerError::Registry(format!("无效的注册表路径: {}", path)))?;
        let key = RegKey::predef(hive.hkey())
            .open_subkey(subkey)
            .map_err(map_registry_error(path))?;
        Ok((hive, subkey.to_string(), key))
    }

    /// 递归查找键名，命中的键不再深入
    fn search_keys(
        key: &RegKey,
        hive: utils::Hive,
        path: &str,
        term: &str,
        found: &mut Vec<String>,
        depth: u32,
    ) {
        if depth > MAX_REGISTRY_DEPTH {
            return;
        }

        for name in key.enum_keys().filter_map(|k| k.ok()) {
            let subpath = if path.is_empty() {
                name.clone()
            } else {
                format!("{}\\{}", path, name)
            };

            if name.to_lowercase().contains(term) {
                found.push(utils::join_registry_path(hive, &subpath));
                continue;
            }

            match key.open_subkey(&name) {
                Ok(subkey) => search_keys(&subkey, hive, &subpath, term, found, depth + 1),
                Err(e) => tracing::debug!("无法打开注册表项 {}: {}", subpath, e),
            }
        }
    }

    pub(super) fn find_keys(root: &str, term: &str) -> BackendResult<Vec<String>> {
        let (hive, subkey, key) = open_path(root)?;
        let mut found = Vec::new();
        search_keys(&key, hive, &subkey, &term.to_lowercase(), &mut found, 0);
        Ok(found)
    }

    pub(super) fn uninstall_entries(root: &str) -> BackendResult<Vec<UninstallEntry>> {
        let (hive, subkey, key) = open_path(root)?;
        let mut entries = Vec::new();

        for name in key.enum_keys().filter_map(|k| k.ok()) {
            if let Ok(entry) = key.open_subkey(&name) {
                entries.push(UninstallEntry {
                    key: utils::join_registry_path(hive, &format!("{}\\{}", subkey, name)),
                    display_name: entry.get_value("DisplayName").ok(),
                    publisher: entry.get_value("Publisher").ok(),
                });
            }
        }

        Ok(entries)
    }

    pub(super) fn services() -> BackendResult<Vec<ServiceInfo>> {
        let (_, _, key) = open_path(r"HKLM\SYSTEM\CurrentControlSet\Services")?;
        let mut services = Vec::new();

        for name in key.enum_keys().filter_map(|k| k.ok()) {
            if let Ok(service) = key.open_subkey(&name) {
                services.push(ServiceInfo {
                    display_name: service.get_value("DisplayName").ok(),
                    image_path: service.get_value("ImagePath").ok(),
                    name,
                });
            }
        }

        Ok(services)
    }

    pub(super) fn environment(scope: EnvScope) -> BackendResult<Vec<(String, String)>> {
        let (hive, path) = scope.registry_location();
        let key = RegKey::predef(hive.hkey())
            .open_subkey(path)
            .map_err(map_registry_error(path))?;

        let mut vars = Vec::new();
        for (name, _) in key.enum_values().filter_map(|v| v.ok()) {
            // 仅保留字符串类型的值
            if let Ok(value) = key.get_value::<String, _>(&name) {
                vars.push((name, value));
            }
        }

        Ok(vars)
    }

    fn open_environment(scope: EnvScope, write: bool) -> std::io::Result<RegKey> {
        let (hive, path) = scope.registry_location();
        let flags = if write { KEY_READ | KEY_WRITE } else { KEY_READ };
        RegKey::predef(hive.hkey()).open_subkey_with_flags(path, flags)
    }

    pub(super) fn env_entry_exists(entry: &EnvEntry) -> bool {
        let label = entry.identifier();
        let key = open_environment(entry.scope, false).map_err(map_registry_error(&label));
        let key = match key {
            Ok(key) => key,
            Err(e) => return still_present::<()>(&Err(e)),
        };
        let value = key
            .get_value::<String, _>(&entry.name)
            .map_err(map_registry_error(&label));
        let value = match value {
            Ok(value) => value,
            Err(e) => return still_present::<()>(&Err(e)),
        };

        match &entry.segment {
            Some(segment) => remove_segment(&value, segment).is_some(),
            None => true,
        }
    }

    pub(super) fn remove_env_entry(entry: &EnvEntry) -> BackendResult<()> {
        let key = open_environment(entry.scope, true)?;

        let Some(segment) = &entry.segment else {
            return Ok(key.delete_value(&entry.name)?);
        };

        let value: String = key.get_value(&entry.name)?;
        let Some(updated) = remove_segment(&value, segment) else {
            return Ok(());
        };

        // 保留原值类型 (PATH 通常为 REG_EXPAND_SZ)
        let mut raw = key.get_raw_value(&entry.name)?;
        let bytes: Vec<u8> = updated
            .encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(|unit| unit.to_le_bytes())
            .collect();
        raw.bytes = bytes.into();
        key.set_raw_value(&entry.name, &raw)?;
        Ok(())
    }

    pub(super) fn registry_key_exists(path: &str) -> bool {
        still_present(&open_path(path))
    }

    pub(super) fn delete_registry_key(path: &str) -> BackendResult<()> {
        let (hive, subkey) = utils::parse_registry_path(path)
            .ok_or_else(|| UninstallerError::Registry(format!("无效的注册表路径: {}", path)))?;

        match RegKey::predef(hive.hkey()).delete_subkey_all(subkey) {
            Ok(_) => Ok(()),
            // 键不存在视为成功
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UninstallerError::Registry(format!("{}: {}", path, e))),
        }
    }
}

/// 读取 System32\Tasks 下的任务定义
fn read_task_store(root: &Path) -> BackendResult<Vec<TaskInfo>> {
    std::fs::read_dir(root)?;

    let mut tasks = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };

        let path = format!("\\{}", relative.to_string_lossy().replace('/', "\\"));
        let command = std::fs::read(entry.path())
            .ok()
            .map(|bytes| decode_task_xml(&bytes))
            .and_then(|xml| extract_element(&xml, "Command"));

        tasks.push(TaskInfo { path, command });
    }

    Ok(tasks)
}

/// 任务文件为带 BOM 的 UTF-16LE XML，也兼容 UTF-8
fn decode_task_xml(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

fn extract_element(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(xml[start..end].trim().to_string())
}

impl Registry for NativeBackend {
    fn find_keys(&self, root: &str, term: &str) -> BackendResult<Vec<String>> {
        #[cfg(windows)]
        {
            win::find_keys(root, term)
        }

        #[cfg(not(windows))]
        {
            let _ = term;
            Err(UninstallerError::Unsupported(format!("注册表: {}", root)))
        }
    }

    fn uninstall_entries(&self, root: &str) -> BackendResult<Vec<UninstallEntry>> {
        #[cfg(windows)]
        {
            win::uninstall_entries(root)
        }

        #[cfg(not(windows))]
        {
            Err(UninstallerError::Unsupported(format!("注册表: {}", root)))
        }
    }
}

impl SystemInventory for NativeBackend {
    fn services(&self) -> BackendResult<Vec<ServiceInfo>> {
        #[cfg(windows)]
        {
            win::services()
        }

        #[cfg(not(windows))]
        {
            Err(UninstallerError::Unsupported("服务枚举".to_string()))
        }
    }

    fn scheduled_tasks(&self) -> BackendResult<Vec<TaskInfo>> {
        let system_root = std::env::var("SystemRoot").unwrap_or_else(|_| r"C:\Windows".to_string());
        read_task_store(&Path::new(&system_root).join("System32").join("Tasks"))
    }

    fn environment(&self, scope: EnvScope) -> BackendResult<Vec<(String, String)>> {
        #[cfg(windows)]
        {
            win::environment(scope)
        }

        #[cfg(not(windows))]
        {
            Err(UninstallerError::Unsupported(format!("{} 环境变量", scope.as_str())))
        }
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn parse_env_identifier(candidate: &Candidate) -> BackendResult<EnvEntry> {
    EnvEntry::parse(&candidate.identifier).ok_or_else(|| {
        UninstallerError::Other(format!("无效的环境变量标识: {}", candidate.identifier))
    })
}

impl Remover for NativeBackend {
    fn exists(&self, candidate: &Candidate) -> bool {
        match candidate.kind {
            CandidateKind::FilesystemPath => FileSystem::exists(self, Path::new(&candidate.identifier)),
            #[cfg(windows)]
            CandidateKind::RegistryKey => win::registry_key_exists(&candidate.identifier),
            #[cfg(windows)]
            CandidateKind::EnvVarEntry => parse_env_identifier(candidate)
                .map(|entry| win::env_entry_exists(&entry))
                .unwrap_or(true),
            // 无法确认时按存在处理，交给删除步骤报告
            _ => true,
        }
    }

    fn remove(&self, candidate: &Candidate) -> BackendResult<()> {
        match candidate.kind {
            CandidateKind::FilesystemPath => {
                remove_entry(Path::new(&candidate.identifier))?;
                Ok(())
            }
            #[cfg(windows)]
            CandidateKind::RegistryKey => win::delete_registry_key(&candidate.identifier),
            #[cfg(windows)]
            CandidateKind::EnvVarEntry => win::remove_env_entry(&parse_env_identifier(candidate)?),
            kind => Err(UninstallerError::Unsupported(format!(
                "无法直接删除 {}: {}",
                kind, candidate.identifier
            ))),
        }
    }
}
