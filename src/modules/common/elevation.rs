use crate::modules::common::error::UninstallerError;

/// 确认当前进程以管理员身份运行
pub fn ensure_elevated() -> Result<(), UninstallerError> {
    #[cfg(windows)]
    {
        if is_elevated()? {
            Ok(())
        } else {
            Err(UninstallerError::PermissionDenied(
                "请以管理员身份运行".to_string(),
            ))
        }
    }

    #[cfg(not(windows))]
    {
        Err(UninstallerError::Unsupported(
            "仅支持 Windows 平台".to_string(),
        ))
    }
}

/// 读取进程令牌的 TokenElevation
#[cfg(windows)]
fn is_elevated() -> Result<bool, UninstallerError> {
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::Security::{
        GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
    };
    use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    let mut token = HANDLE::default();
    let mut elevation = TOKEN_ELEVATION::default();
    let mut returned = 0u32;

    unsafe {
        OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token).map_err(|e| {
            UninstallerError::PermissionDenied(format!("无法打开进程令牌: {}", e))
        })?;

        let result = GetTokenInformation(
            token,
            TokenElevation,
            Some(&mut elevation as *mut TOKEN_ELEVATION as *mut _),
            std::mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut returned,
        );

        let _ = CloseHandle(token);

        result.map_err(|e| {
            UninstallerError::PermissionDenied(format!("无法读取令牌信息: {}", e))
        })?;
    }

    Ok(elevation.TokenIsElevated != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn other_platforms_are_rejected_as_unsupported() {
        let err = ensure_elevated().unwrap_err();
        assert!(matches!(err, UninstallerError::Unsupported(_)));
    }

    #[cfg(windows)]
    #[test]
    fn token_query_does_not_fail() {
        assert!(is_elevated().is_ok());
    }
}
