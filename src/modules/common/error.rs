use thiserror::Error;

#[derive(Error, Debug)]
pub enum UninstallerError {
    #[error("注册表错误: {0}")]
    Registry(String),

    #[error("文件系统错误: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("关键系统项: {0}")]
    Protected(String),

    #[error("未找到: {0}")]
    NotFound(String),

    #[error("超时: {0}")]
    Timeout(String),

    #[error("外部命令失败: {0}")]
    Command(String),

    #[error("匹配模式错误: {0}")]
    Pattern(String),

    #[error("序列化错误: {0}")]
    Serde(String),

    #[error("当前平台不支持: {0}")]
    Unsupported(String),

    #[error("其他错误: {0}")]
    Other(String),
}

impl UninstallerError {
    /// 单个扫描目标上可跳过的错误（拒绝访问、不存在、超时、平台不支持）
    pub fn is_skippable(&self) -> bool {
        match self {
            UninstallerError::PermissionDenied(_)
            | UninstallerError::NotFound(_)
            | UninstallerError::Timeout(_)
            | UninstallerError::Unsupported(_) => true,
            UninstallerError::FileSystem(e) => matches!(
                e.kind(),
                std::io::ErrorKind::NotFound
                    | std::io::ErrorKind::PermissionDenied
                    | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for UninstallerError {
    fn from(e: serde_json::Error) -> Self {
        UninstallerError::Serde(e.to_string())
    }
}

impl From<regex::Error> for UninstallerError {
    fn from(e: regex::Error) -> Self {
        UninstallerError::Pattern(e.to_string())
    }
}

impl serde::Serialize for UninstallerError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
