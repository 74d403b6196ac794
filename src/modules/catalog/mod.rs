//! 清理目录表：关键字、已知路径、扫描目标、注册表根与受保护位置。
//!
//! 启动时构建一次，之后只读，以引用方式传给各扫描器。

pub mod models;

use crate::modules::common::utils::normalize_path;
use models::{EntryFilter, ScanTarget, SystemDirs};

/// 厂商名称关键字
const VENDOR_PATTERNS: &[&str] = &[
    "Beckhoff",
    "TwinCAT",
    "TwinSAFE",
    "TcXaeShell",
    "TcSysSrv",
    "TcSysUI",
    "TcEventLogger",
    "TcAds",
];

#[derive(Debug, Clone)]
pub struct Catalog {
    pub patterns: Vec<String>,
    /// 已知安装位置，可含 `*` 通配符
    pub known_paths: Vec<String>,
    pub scan_targets: Vec<ScanTarget>,
    /// 全盘扫描时跳过的子树（路径片段，前后带分隔符）
    pub sweep_denylist: Vec<String>,
    /// 按键名递归搜索的注册表根
    pub registry_roots: Vec<String>,
    /// 按 DisplayName 搜索的卸载登记位置
    pub uninstall_roots: Vec<String>,
    pub protected_paths: Vec<String>,
    pub protected_registry: Vec<String>,
}

impl Catalog {
    /// 基于当前进程环境构建
    pub fn beckhoff() -> Self {
        Self::beckhoff_with(&SystemDirs::from_env())
    }

    pub fn beckhoff_with(dirs: &SystemDirs) -> Self {
        let drive = &dirs.system_drive;
        let users = &dirs.users_root;
        let start_menu = format!(r"{}\Microsoft\Windows\Start Menu\Programs", dirs.program_data);
        let user_start_menu = format!(r"{}\Microsoft\Windows\Start Menu\Programs", dirs.app_data);

        let known_paths = vec![
            format!(r"{}\TwinCAT", drive),
            format!(r"{}\TcXaeShell", drive),
            format!(r"{}\Beckhoff", dirs.program_files),
            format!(r"{}\Beckhoff", dirs.program_files_x86),
            format!(r"{}\Common Files\Beckhoff", dirs.program_files),
            format!(r"{}\Common Files\Beckhoff", dirs.program_files_x86),
            format!(r"{}\Beckhoff", dirs.program_data),
            format!(r"{}\TwinCAT", dirs.program_data),
            format!(r"{}\Beckhoff", start_menu),
            format!(r"{}\TwinCAT", start_menu),
            format!(r"{}\Desktop\TwinCAT XAE Shell.lnk", dirs.public),
            format!(r"{}\Desktop\TcXaeShell.lnk", dirs.public),
            format!(r"{}\Desktop\TwinCAT XAE Shell.lnk", dirs.user_profile),
            format!(r"{}\Beckhoff", dirs.app_data),
            format!(r"{}\Beckhoff", dirs.local_app_data),
            format!(r"{}\*\AppData\Roaming\Beckhoff", users),
            format!(r"{}\*\AppData\Local\Beckhoff", users),
            format!(r"{}\*\AppData\Local\TcXaeShell", users),
            format!(r"{}\*\Documents\TcXaeShell", users),
            format!(r"{}\*\Documents\TwinCAT", users),
        ];

        let scan_targets = vec![
            ScanTarget::new(format!(r"{}\Package Cache", dirs.program_data), 2, EntryFilter::DirectoriesOnly),
            ScanTarget::new(format!(r"{}\Temp", dirs.local_app_data), 1, EntryFilter::DirectoriesOnly),
            ScanTarget::new(format!(r"{}\Temp", dirs.local_app_data), 1, EntryFilter::FilesOnly),
            ScanTarget::new(format!(r"{}\Temp", dirs.system_root), 1, EntryFilter::FilesOnly),
            ScanTarget::new(format!(r"{}\Prefetch", dirs.system_root), 1, EntryFilter::FilesOnly),
            ScanTarget::new(format!(r"{}\Common Files", dirs.program_files), 1, EntryFilter::DirectoriesOnly),
            ScanTarget::new(format!(r"{}\Common Files", dirs.program_files_x86), 1, EntryFilter::DirectoriesOnly),
            ScanTarget::new(dirs.program_data.clone(), 1, EntryFilter::DirectoriesOnly),
            ScanTarget::new(start_menu.clone(), 2, EntryFilter::FilesOnly),
            ScanTarget::new(user_start_menu, 2, EntryFilter::FilesOnly),
            ScanTarget::new(format!(r"{}\Desktop", dirs.public), 1, EntryFilter::FilesOnly),
            ScanTarget::new(format!(r"{}\Desktop", dirs.user_profile), 1, EntryFilter::FilesOnly),
        ];

        let sweep_denylist = vec![
            r"\Windows\WinSxS\".to_string(),
            r"\Windows\servicing\".to_string(),
            r"\Windows\assembly\".to_string(),
            r"\Windows\Microsoft.NET\assembly\".to_string(),
            r"\Windows\Installer\$PatchCache$\".to_string(),
            r"\$Recycle.Bin\".to_string(),
            r"\System Volume Information\".to_string(),
        ];

        let registry_roots = vec![
            r"HKLM\SOFTWARE".to_string(),
            r"HKCU\SOFTWARE".to_string(),
        ];

        let uninstall_roots = vec![
            r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall".to_string(),
            r"HKLM\SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall".to_string(),
            r"HKCU\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall".to_string(),
        ];

        let protected_paths = vec![
            format!(r"{}\", drive),
            dirs.system_root.clone(),
            format!(r"{}\System32", dirs.system_root),
            format!(r"{}\SysWOW64", dirs.system_root),
            format!(r"{}\WinSxS", dirs.system_root),
            format!(r"{}\INF", dirs.system_root),
            format!(r"{}\System32\DriverStore", dirs.system_root),
            dirs.program_files.clone(),
            dirs.program_files_x86.clone(),
            format!(r"{}\Common Files", dirs.program_files),
            format!(r"{}\Common Files", dirs.program_files_x86),
            dirs.program_data.clone(),
            start_menu,
            dirs.users_root.clone(),
            dirs.public.clone(),
            dirs.user_profile.clone(),
            dirs.app_data.clone(),
            dirs.local_app_data.clone(),
        ];

        let protected_registry = vec![
            r"HKLM\SOFTWARE".to_string(),
            r"HKLM\SOFTWARE\WOW6432Node".to_string(),
            r"HKLM\SOFTWARE\Microsoft".to_string(),
            r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall".to_string(),
            r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Run".to_string(),
            r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion".to_string(),
            r"HKLM\SYSTEM".to_string(),
            r"HKLM\SAM".to_string(),
            r"HKLM\SECURITY".to_string(),
            r"HKLM\BOOT".to_string(),
            r"HKCU\SOFTWARE".to_string(),
            r"HKCU\SOFTWARE\Microsoft".to_string(),
        ];

        Self {
            patterns: VENDOR_PATTERNS.iter().map(|p| p.to_string()).collect(),
            known_paths: known_paths.iter().map(|p| normalize_path(p)).collect(),
            scan_targets: scan_targets
                .into_iter()
                .map(|t| ScanTarget { parent: normalize_path(&t.parent), ..t })
                .collect(),
            sweep_denylist,
            registry_roots,
            uninstall_roots,
            protected_paths: protected_paths.iter().map(|p| normalize_path(p)).collect(),
            protected_registry,
        }
    }
}
