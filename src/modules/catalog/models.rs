use serde::{Deserialize, Serialize};

/// 列目录时保留的条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryFilter {
    FilesOnly,
    DirectoriesOnly,
}

/// 按名称扫描的目标目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    pub parent: String,
    /// 1 表示只看直接子项
    pub depth: usize,
    pub filter: EntryFilter,
}

impl ScanTarget {
    pub fn new(parent: impl Into<String>, depth: usize, filter: EntryFilter) -> Self {
        Self {
            parent: parent.into(),
            depth,
            filter,
        }
    }
}

/// 构建目录表所需的系统目录
#[derive(Debug, Clone)]
pub struct SystemDirs {
    pub system_drive: String,
    pub system_root: String,
    pub program_files: String,
    pub program_files_x86: String,
    pub program_data: String,
    pub public: String,
    pub users_root: String,
    pub app_data: String,
    pub local_app_data: String,
    pub user_profile: String,
}

impl SystemDirs {
    /// 从进程环境读取，缺失时使用 Windows 默认值
    pub fn from_env() -> Self {
        let var = |name: &str, default: String| std::env::var(name).unwrap_or(default);
        let dir = |d: Option<std::path::PathBuf>, default: String| {
            d.map(|p| p.to_string_lossy().to_string()).unwrap_or(default)
        };

        let system_drive = var("SystemDrive", "C:".to_string());
        let user_profile = dir(dirs::home_dir(), format!(r"{}\Users\Default", system_drive));

        Self {
            system_root: var("SystemRoot", format!(r"{}\Windows", system_drive)),
            program_files: var("ProgramW6432", var("ProgramFiles", format!(r"{}\Program Files", system_drive))),
            program_files_x86: var(
                "ProgramFiles(x86)",
                format!(r"{}\Program Files (x86)", system_drive),
            ),
            program_data: var("ProgramData", format!(r"{}\ProgramData", system_drive)),
            public: var("Public", format!(r"{}\Users\Public", system_drive)),
            users_root: format!(r"{}\Users", system_drive),
            app_data: dir(dirs::data_dir(), format!(r"{}\AppData\Roaming", user_profile)),
            local_app_data: dir(dirs::data_local_dir(), format!(r"{}\AppData\Local", user_profile)),
            user_profile,
            system_drive,
        }
    }

    /// 固定使用 `C:` 默认布局
    pub fn windows_defaults() -> Self {
        Self {
            system_drive: "C:".to_string(),
            system_root: r"C:\Windows".to_string(),
            program_files: r"C:\Program Files".to_string(),
            program_files_x86: r"C:\Program Files (x86)".to_string(),
            program_data: r"C:\ProgramData".to_string(),
            public: r"C:\Users\Public".to_string(),
            users_root: r"C:\Users".to_string(),
            app_data: r"C:\Users\Default\AppData\Roaming".to_string(),
            local_app_data: r"C:\Users\Default\AppData\Local".to_string(),
            user_profile: r"C:\Users\Default".to_string(),
        }
    }
}
