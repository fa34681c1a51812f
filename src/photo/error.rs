//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 照片裁剪链路的所有失败都收敛到 `PhotoError`，每个分支对应一个阶段：
//! 校验（格式 / 体积）、解码、绘制与编码、配置。
//! 所有错误都在组件内部恢复：终止本次上传、提示用户、不改动已有照片。

/// 照片裁剪链路统一错误类型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoError {
    /// 文件类型不是 JPEG / PNG。
    #[error("{0}")]
    InvalidFormat(String),

    /// 文件体积达到或超过上限。
    #[error("{0}")]
    FileTooLarge(String),

    /// 图片内容无法解码。
    #[error("图片解码失败：{0}")]
    DecodeFailed(String),

    /// 无法创建或写入输出画布（含编码失败）。
    #[error("当前环境不支持图片绘制：{0}")]
    RenderingUnsupported(String),

    /// 配置参数非法。
    #[error("配置错误：{0}")]
    InvalidConfig(String),
}

impl PhotoError {
    /// 稳定错误码，供前端按码分支处理。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileTooLarge(_) => "E_FILE_TOO_LARGE",
            Self::DecodeFailed(_) => "E_DECODE_FAILED",
            Self::RenderingUnsupported(_) => "E_RENDERING_UNSUPPORTED",
            Self::InvalidConfig(_) => "E_INVALID_CONFIG",
        }
    }

    /// 出错阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) | Self::FileTooLarge(_) => "validate",
            Self::DecodeFailed(_) => "decode",
            Self::RenderingUnsupported(_) => "render",
            Self::InvalidConfig(_) => "config",
        }
    }
}

impl From<PhotoError> for String {
    fn from(error: PhotoError) -> Self {
        error.to_string()
    }
}
