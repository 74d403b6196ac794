use crate::modules::catalog::Catalog;
use crate::modules::common::error::UninstallerError;
use crate::modules::common::utils;
use crate::modules::scanner::models::{Candidate, CandidateKind, Hierarchy};

/// 其下任何键都不允许删除的注册表子树
const CRITICAL_REGISTRY_SUBTREES: &[&str] = &[
    r"HKLM\SYSTEM",
    r"HKLM\SAM",
    r"HKLM\SECURITY",
    r"HKLM\BOOT",
];

/// 删除前检查
pub fn pre_delete_check(candidate: &Candidate, catalog: &Catalog) -> Result<(), UninstallerError> {
    match candidate.kind {
        CandidateKind::FilesystemPath => {
            if covers_any(Hierarchy::Path, &candidate.identifier, &catalog.protected_paths) {
                return Err(UninstallerError::Protected(
                    "不能删除关键系统目录".to_string(),
                ));
            }
            if utils::is_within_any(std::path::Path::new(&candidate.identifier), &catalog.sweep_denylist) {
                return Err(UninstallerError::Protected(
                    "位于系统组件存储内".to_string(),
                ));
            }
        }
        CandidateKind::RegistryKey => {
            let normalized = normalize_registry(&candidate.identifier);
            if covers_any(Hierarchy::RegistryKey, &normalized, &catalog.protected_registry) {
                return Err(UninstallerError::Protected(
                    "不能删除关键系统注册表项".to_string(),
                ));
            }
            if CRITICAL_REGISTRY_SUBTREES
                .iter()
                .any(|root| Hierarchy::RegistryKey.is_descendant(&normalized, root))
            {
                return Err(UninstallerError::Protected(
                    "位于关键系统注册表子树内".to_string(),
                ));
            }
        }
        _ => {}
    }

    Ok(())
}

/// `identifier` 等于或包含任一受保护位置
fn covers_any(hierarchy: Hierarchy, identifier: &str, protected: &[String]) -> bool {
    let key = hierarchy.key(identifier);
    protected.iter().any(|p| {
        hierarchy.key(p) == key || hierarchy.is_descendant(p, identifier)
    })
}

/// 统一为短根键名，便于与受保护列表比较
fn normalize_registry(identifier: &str) -> String {
    match utils::parse_registry_path(identifier) {
        Some((hive, subkey)) => utils::join_registry_path(hive, subkey),
        None => identifier.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::models::SystemDirs;

    fn catalog() -> Catalog {
        Catalog::beckhoff_with(&SystemDirs::windows_defaults())
    }

    #[test]
    fn vendor_directories_pass() {
        assert!(pre_delete_check(&Candidate::path(r"C:\Program Files\Beckhoff"), &catalog()).is_ok());
        assert!(pre_delete_check(&Candidate::path(r"C:\TwinCAT"), &catalog()).is_ok());
    }

    #[test]
    fn system_roots_and_their_ancestors_are_protected() {
        assert!(pre_delete_check(&Candidate::path(r"C:\Windows"), &catalog()).is_err());
        assert!(pre_delete_check(&Candidate::path(r"c:\program files\"), &catalog()).is_err());
        assert!(pre_delete_check(&Candidate::path(r"C:\"), &catalog()).is_err());
    }

    #[test]
    fn component_store_contents_are_protected() {
        let candidate = Candidate::path(r"C:\Windows\WinSxS\amd64_beckhoff.twincat_31bf");
        assert!(pre_delete_check(&candidate, &catalog()).is_err());
    }

    #[test]
    fn registry_checks_accept_long_hive_names() {
        let vendor = Candidate::registry_key(r"HKEY_LOCAL_MACHINE\SOFTWARE\Beckhoff");
        assert!(pre_delete_check(&vendor, &catalog()).is_ok());

        let software = Candidate::registry_key(r"HKEY_LOCAL_MACHINE\SOFTWARE");
        assert!(pre_delete_check(&software, &catalog()).is_err());

        let service = Candidate::registry_key(r"HKLM\SYSTEM\CurrentControlSet\Services\TcSysSrv");
        assert!(pre_delete_check(&service, &catalog()).is_err());
    }
}
