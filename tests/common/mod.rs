//! 内存中的假系统，用于集成测试
#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use twincat_sweeper_lib::backend::{
    BackendResult, EnvScope, FileSystem, Registry, Remover, ServiceInfo, SystemInventory, TaskInfo,
    UninstallEntry,
};
use twincat_sweeper_lib::catalog::models::{EntryFilter, SystemDirs};
use twincat_sweeper_lib::catalog::Catalog;
use twincat_sweeper_lib::scanner::models::{Candidate, CandidateKind, EnvEntry, Hierarchy};
use twincat_sweeper_lib::scanner::ScanContext;
use twincat_sweeper_lib::utils;
use twincat_sweeper_lib::UninstallerError;

#[derive(Default)]
struct State {
    /// 路径 -> 是否为目录
    files: BTreeMap<String, bool>,
    keys: Vec<String>,
    uninstall: Vec<UninstallEntry>,
    services: Vec<ServiceInfo>,
    tasks: Vec<TaskInfo>,
    environment: Vec<(EnvScope, String, String)>,
    volumes: Vec<String>,
}

#[derive(Default)]
pub struct FakeSystem {
    state: Mutex<State>,
    /// 删除时总是失败的标识符
    failing: Mutex<HashSet<String>>,
    pub removed: Mutex<Vec<String>>,
}

fn lower(path: &Path) -> String {
    Hierarchy::Path.key(&path.to_string_lossy())
}

impl FakeSystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_dir(&self, path: &str) -> &Self {
        self.state.lock().unwrap().files.insert(path.to_string(), true);
        self
    }

    pub fn add_file(&self, path: &str) -> &Self {
        self.state.lock().unwrap().files.insert(path.to_string(), false);
        self
    }

    pub fn add_key(&self, key: &str) -> &Self {
        self.state.lock().unwrap().keys.push(key.to_string());
        self
    }

    pub fn add_uninstall(&self, key: &str, display_name: &str) -> &Self {
        self.state.lock().unwrap().uninstall.push(UninstallEntry {
            key: key.to_string(),
            display_name: Some(display_name.to_string()),
            publisher: None,
        });
        self
    }

    pub fn add_service(&self, name: &str, image_path: &str) -> &Self {
        self.state.lock().unwrap().services.push(ServiceInfo {
            name: name.to_string(),
            display_name: None,
            image_path: Some(image_path.to_string()),
        });
        self
    }

    pub fn add_task(&self, path: &str, command: &str) -> &Self {
        self.state.lock().unwrap().tasks.push(TaskInfo {
            path: path.to_string(),
            command: Some(command.to_string()),
        });
        self
    }

    pub fn set_env(&self, scope: EnvScope, name: &str, value: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .environment
            .push((scope, name.to_string(), value.to_string()));
        self
    }

    pub fn add_volume(&self, root: &str) -> &Self {
        self.state.lock().unwrap().volumes.push(root.to_string());
        self
    }

    pub fn fail_on(&self, identifier: &str) -> &Self {
        self.failing.lock().unwrap().insert(identifier.to_string());
        self
    }

    pub fn has_path(&self, path: &str) -> bool {
        FileSystem::exists(self, Path::new(path))
    }

    pub fn env_value(&self, scope: EnvScope, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .environment
            .iter()
            .find(|(s, n, _)| *s == scope && n.eq_ignore_ascii_case(name))
            .map(|(_, _, v)| v.clone())
    }

    fn find(&self, path: &Path) -> Option<bool> {
        let key = lower(path);
        self.state
            .lock()
            .unwrap()
            .files
            .iter()
            .find(|(p, _)| Hierarchy::Path.key(p) == key)
            .map(|(_, is_dir)| *is_dir)
    }
}

/// Windows 风格的测试目录布局
pub fn catalog() -> Catalog {
    Catalog::beckhoff_with(&SystemDirs::windows_defaults())
}

pub fn context(system: &Arc<FakeSystem>) -> ScanContext {
    ScanContext::new(system.clone(), system.clone(), system.clone(), catalog()).unwrap()
}

impl FileSystem for FakeSystem {
    fn exists(&self, path: &Path) -> bool {
        self.find(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.find(path).unwrap_or(false)
    }

    fn expand(&self, pattern: &str) -> Vec<PathBuf> {
        let parts: Vec<String> = pattern.split('*').map(regex::escape).collect();
        let re = regex::RegexBuilder::new(&format!("^{}$", parts.join(r"[^\\]*")))
            .case_insensitive(true)
            .build()
            .unwrap();

        self.state
            .lock()
            .unwrap()
            .files
            .keys()
            .filter(|p| re.is_match(p))
            .map(PathBuf::from)
            .collect()
    }

    fn list_entries(
        &self,
        root: &Path,
        max_depth: Option<usize>,
        filter: EntryFilter,
        exclude: &[String],
    ) -> BackendResult<Vec<PathBuf>> {
        let prefix = format!("{}\\", lower(root).trim_end_matches('\\'));
        let state = self.state.lock().unwrap();

        let root_known = state.files.keys().any(|p| Hierarchy::Path.key(p) == lower(root))
            || state.volumes.iter().any(|v| Hierarchy::Path.key(v) == lower(root));
        if !root_known {
            return Err(UninstallerError::NotFound(root.display().to_string()));
        }

        Ok(state
            .files
            .iter()
            .filter(|(path, is_dir)| {
                let key = Hierarchy::Path.key(path);
                let Some(rest) = key.strip_prefix(&prefix) else {
                    return false;
                };
                let depth = rest.matches('\\').count() + 1;
                let wanted = match filter {
                    EntryFilter::DirectoriesOnly => **is_dir,
                    EntryFilter::FilesOnly => !**is_dir,
                };
                wanted
                    && max_depth.map_or(true, |max| depth <= max)
                    && !utils::is_within_any(Path::new(path.as_str()), exclude)
            })
            .map(|(path, _)| PathBuf::from(path))
            .collect())
    }

    fn dir_size(&self, _path: &Path) -> BackendResult<u64> {
        Ok(4096)
    }

    fn volumes(&self) -> Vec<PathBuf> {
        self.state
            .lock()
            .unwrap()
            .volumes
            .iter()
            .map(PathBuf::from)
            .collect()
    }
}

impl Registry for FakeSystem {
    fn find_keys(&self, root: &str, term: &str) -> BackendResult<Vec<String>> {
        let term = term.to_lowercase();
        Ok(self
            .state
            .lock()
            .unwrap()
            .keys
            .iter()
            .filter(|k| Hierarchy::RegistryKey.is_descendant(k, root))
            .filter(|k| k.to_lowercase().contains(&term))
            .cloned()
            .collect())
    }

    fn uninstall_entries(&self, root: &str) -> BackendResult<Vec<UninstallEntry>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .uninstall
            .iter()
            .filter(|e| Hierarchy::RegistryKey.is_descendant(&e.key, root))
            .cloned()
            .collect())
    }
}

impl SystemInventory for FakeSystem {
    fn services(&self) -> BackendResult<Vec<ServiceInfo>> {
        Ok(self.state.lock().unwrap().services.clone())
    }

    fn scheduled_tasks(&self) -> BackendResult<Vec<TaskInfo>> {
        Ok(self.state.lock().unwrap().tasks.clone())
    }

    fn environment(&self, scope: EnvScope) -> BackendResult<Vec<(String, String)>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .environment
            .iter()
            .filter(|(s, _, _)| *s == scope)
            .map(|(_, n, v)| (n.clone(), v.clone()))
            .collect())
    }
}

impl Remover for FakeSystem {
    fn exists(&self, candidate: &Candidate) -> bool {
        match candidate.kind {
            CandidateKind::FilesystemPath => self.has_path(&candidate.identifier),
            CandidateKind::RegistryKey => {
                let key = Hierarchy::RegistryKey.key(&candidate.identifier);
                self.state
                    .lock()
                    .unwrap()
                    .keys
                    .iter()
                    .any(|k| Hierarchy::RegistryKey.key(k) == key)
            }
            _ => true,
        }
    }

    fn remove(&self, candidate: &Candidate) -> BackendResult<()> {
        if self.failing.lock().unwrap().contains(&candidate.identifier) {
            return Err(UninstallerError::PermissionDenied(candidate.identifier.clone()));
        }

        let mut state = self.state.lock().unwrap();
        let id = &candidate.identifier;

        match candidate.kind {
            CandidateKind::FilesystemPath => {
                let key = Hierarchy::Path.key(id);
                state.files.retain(|p, _| {
                    Hierarchy::Path.key(p) != key && !Hierarchy::Path.is_descendant(p, id)
                });
            }
            CandidateKind::RegistryKey => {
                let key = Hierarchy::RegistryKey.key(id);
                state.keys.retain(|k| {
                    Hierarchy::RegistryKey.key(k) != key
                        && !Hierarchy::RegistryKey.is_descendant(k, id)
                });
            }
            CandidateKind::EnvVarEntry => {
                let entry = EnvEntry::parse(id)
                    .ok_or_else(|| UninstallerError::Other(id.clone()))?;
                match &entry.segment {
                    Some(segment) => {
                        for (scope, name, value) in state.environment.iter_mut() {
                            if *scope == entry.scope && name.eq_ignore_ascii_case(&entry.name) {
                                *value = value
                                    .split(';')
                                    .filter(|part| !part.eq_ignore_ascii_case(segment))
                                    .collect::<Vec<_>>()
                                    .join(";");
                            }
                        }
                    }
                    None => state
                        .environment
                        .retain(|(s, n, _)| !(*s == entry.scope && n.eq_ignore_ascii_case(&entry.name))),
                }
            }
            kind => return Err(UninstallerError::Unsupported(kind.to_string())),
        }

        drop(state);
        self.removed.lock().unwrap().push(id.clone());
        Ok(())
    }
}
