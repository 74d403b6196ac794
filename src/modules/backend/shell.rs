use std::path::Path;
#[cfg(windows)]
use std::process::Command;

use super::{BackendResult, Remover};
use crate::modules::common::error::UninstallerError;
use crate::modules::scanner::models::{Candidate, CandidateKind, EnvEntry};

/// 删除环境变量条目，保留原值类型；参数通过环境变量传入
const REMOVE_ENV_SCRIPT: &str = r#"
$scope = $env:TWINCAT_SWEEPER_SCOPE
$name = $env:TWINCAT_SWEEPER_NAME
$segment = $env:TWINCAT_SWEEPER_SEGMENT
$path = if ($scope -eq 'Machine') {
    'Registry::HKEY_LOCAL_MACHINE\SYSTEM\CurrentControlSet\Control\Session Manager\Environment'
} else {
    'Registry::HKEY_CURRENT_USER\Environment'
}
$key = Get-Item -LiteralPath $path
if ([string]::IsNullOrEmpty($segment)) {
    Remove-ItemProperty -LiteralPath $path -Name $name -ErrorAction Stop
} else {
    $kind = $key.GetValueKind($name)
    $raw = $key.GetValue($name, $null, 'DoNotExpandEnvironmentNames')
    $kept = $raw -split ';' | Where-Object { $_ -ne '' -and $_.TrimEnd('\') -ne $segment.TrimEnd('\') }
    Set-ItemProperty -LiteralPath $path -Name $name -Value ($kept -join ';') -Type $kind -ErrorAction Stop
}
"#;

/// 调用系统命令行工具的后备删除实现
#[derive(Debug, Clone, Default)]
pub struct ShellBackend;

impl ShellBackend {
    pub fn new() -> Self {
        Self
    }
}

fn run(program: &str, args: &[&str], envs: &[(&str, &str)]) -> BackendResult<()> {
    #[cfg(windows)]
    {
        tracing::debug!("执行命令: {} {}", program, args.join(" "));

        let output = Command::new(program).args(args).envs(envs.iter().copied()).output()?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if stderr.trim().is_empty() { stdout } else { stderr };
            Err(UninstallerError::Command(format!(
                "{} 退出码 {:?}: {}",
                program,
                output.status.code(),
                message.trim()
            )))
        }
    }

    #[cfg(not(windows))]
    {
        let _ = (args, envs);
        Err(UninstallerError::Unsupported(format!("{} 仅在 Windows 上可用", program)))
    }
}

fn remove_path(path: &str) -> BackendResult<()> {
    let target = Path::new(path);

    if target.is_dir() {
        run("cmd", &["/C", "rd", "/s", "/q", path], &[])?;
    } else {
        run("cmd", &["/C", "del", "/f", "/q", "/a", path], &[])?;
    }

    // rd 在部分文件被占用时仍可能返回 0
    if std::fs::symlink_metadata(target).is_ok() {
        return Err(UninstallerError::Command(format!("删除后仍然存在: {}", path)));
    }

    Ok(())
}

fn remove_env(entry: &EnvEntry) -> BackendResult<()> {
    run(
        "powershell",
        &[
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            REMOVE_ENV_SCRIPT,
        ],
        &[
            ("TWINCAT_SWEEPER_SCOPE", entry.scope.as_str()),
            ("TWINCAT_SWEEPER_NAME", entry.name.as_str()),
            ("TWINCAT_SWEEPER_SEGMENT", entry.segment.as_deref().unwrap_or("")),
        ],
    )
}

impl Remover for ShellBackend {
    fn exists(&self, candidate: &Candidate) -> bool {
        match candidate.kind {
            CandidateKind::FilesystemPath => {
                std::fs::symlink_metadata(&candidate.identifier).is_ok()
            }
            CandidateKind::RegistryKey => {
                run("reg", &["query", &candidate.identifier], &[]).is_ok()
            }
            _ => true,
        }
    }

    fn remove(&self, candidate: &Candidate) -> BackendResult<()> {
        match candidate.kind {
            CandidateKind::FilesystemPath => remove_path(&candidate.identifier),
            CandidateKind::RegistryKey => {
                run("reg", &["delete", &candidate.identifier, "/f"], &[])
            }
            CandidateKind::EnvVarEntry => {
                let entry = EnvEntry::parse(&candidate.identifier).ok_or_else(|| {
                    UninstallerError::Other(format!("无效的环境变量标识: {}", candidate.identifier))
                })?;
                remove_env(&entry)
            }
            kind => Err(UninstallerError::Unsupported(format!(
                "无法通过命令行删除 {}: {}",
                kind, candidate.identifier
            ))),
        }
    }
}
