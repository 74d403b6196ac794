use std::path::Path;

/// 规范化路径（统一为反斜杠，合并连续分隔符）
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut last_was_sep = false;

    for (i, c) in path.chars().enumerate() {
        let c = if c == '/' { '\\' } else { c };
        // 保留 UNC 前缀 \\server
        if c == '\\' && last_was_sep && i > 1 {
            continue;
        }
        last_was_sep = c == '\\';
        normalized.push(c);
    }

    normalized
}

/// 计算目录大小
pub fn calculate_dir_size(path: &Path) -> std::io::Result<u64> {
    let metadata = std::fs::symlink_metadata(path)?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }

    let mut size = 0u64;

    for entry in walkdir::WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            if let Ok(metadata) = entry.metadata() {
                size += metadata.len();
            }
        }
    }

    Ok(size)
}

/// 路径是否落在任一子树片段内（如 `\Windows\WinSxS\`）。
/// 分隔符统一为 `\`，不区分大小写。
pub fn is_within_any(path: &Path, fragments: &[String]) -> bool {
    if fragments.is_empty() {
        return false;
    }

    let mut text = path.to_string_lossy().replace('/', "\\").to_lowercase();
    text.push('\\');

    fragments
        .iter()
        .any(|fragment| text.contains(&fragment.replace('/', "\\").to_lowercase()))
}

/// 格式化文件大小
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 注册表根键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
    ClassesRoot,
    Users,
    CurrentConfig,
}

impl Hive {
    pub fn short_name(&self) -> &'static str {
        match self {
            Hive::LocalMachine => "HKLM",
            Hive::CurrentUser => "HKCU",
            Hive::ClassesRoot => "HKCR",
            Hive::Users => "HKU",
            Hive::CurrentConfig => "HKCC",
        }
    }

    #[cfg(windows)]
    pub fn hkey(&self) -> winreg::HKEY {
        use winreg::enums::*;

        match self {
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
            Hive::CurrentUser => HKEY_CURRENT_USER,
            Hive::ClassesRoot => HKEY_CLASSES_ROOT,
            Hive::Users => HKEY_USERS,
            Hive::CurrentConfig => HKEY_CURRENT_CONFIG,
        }
    }
}

/// 解析注册表路径，返回根键与子键路径
pub fn parse_registry_path(path: &str) -> Option<(Hive, &str)> {
    const PREFIXES: &[(&str, Hive)] = &[
        ("HKEY_LOCAL_MACHINE", Hive::LocalMachine),
        ("HKLM", Hive::LocalMachine),
        ("HKEY_CURRENT_USER", Hive::CurrentUser),
        ("HKCU", Hive::CurrentUser),
        ("HKEY_CLASSES_ROOT", Hive::ClassesRoot),
        ("HKCR", Hive::ClassesRoot),
        ("HKEY_USERS", Hive::Users),
        ("HKU", Hive::Users),
        ("HKEY_CURRENT_CONFIG", Hive::CurrentConfig),
        ("HKCC", Hive::CurrentConfig),
    ];

    let path = path.trim();
    let (root, rest) = match path.split_once('\\') {
        Some((root, rest)) => (root, rest),
        None => (path, ""),
    };

    PREFIXES
        .iter()
        .find(|(prefix, _)| prefix.eq_ignore_ascii_case(root))
        .map(|(_, hive)| (*hive, rest.trim_end_matches('\\')))
}

/// 拼接注册表路径 (使用短根键名)
pub fn join_registry_path(hive: Hive, subkey: &str) -> String {
    if subkey.is_empty() {
        hive.short_name().to_string()
    } else {
        format!("{}\\{}", hive.short_name(), subkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_collapses_separators() {
        assert_eq!(normalize_path("C:/TwinCAT//3.1"), r"C:\TwinCAT\3.1");
        assert_eq!(normalize_path(r"\\server\share\\x"), r"\\server\share\x");
    }

    #[test]
    fn parse_registry_path_accepts_long_and_short_roots() {
        let (hive, sub) = parse_registry_path(r"HKEY_LOCAL_MACHINE\SOFTWARE\Beckhoff").unwrap();
        assert_eq!(hive, Hive::LocalMachine);
        assert_eq!(sub, r"SOFTWARE\Beckhoff");

        let (hive, sub) = parse_registry_path(r"hkcu\Software\Beckhoff\").unwrap();
        assert_eq!(hive, Hive::CurrentUser);
        assert_eq!(sub, r"Software\Beckhoff");

        assert!(parse_registry_path(r"C:\TwinCAT").is_none());
    }

    #[test]
    fn subtree_fragments_match_whole_segments() {
        let denylist = vec![r"\Windows\WinSxS\".to_string()];
        assert!(is_within_any(Path::new(r"C:\Windows\WinSxS"), &denylist));
        assert!(is_within_any(Path::new(r"C:\windows\winsxs\amd64_twincat"), &denylist));
        assert!(!is_within_any(Path::new(r"C:\Windows\WinSxSBackup"), &denylist));
        assert!(is_within_any(Path::new("/mnt/c/Windows/WinSxS/x"), &denylist));
    }

    #[test]
    fn format_size_picks_unit() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
