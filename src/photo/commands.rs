//! # 边界错误载荷
//!
//! 对外（IPC / CLI / JSON）只暴露稳定的 `code` 与 `stage`，
//! 调用方据此决定提示文案或重试策略，不依赖 `PhotoError` 的内部结构。

use super::PhotoError;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PhotoCommandError {
    pub code: &'static str,
    pub stage: &'static str,
    pub message: String,
}

impl From<PhotoError> for PhotoCommandError {
    fn from(error: PhotoError) -> Self {
        Self {
            code: error.code(),
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}
