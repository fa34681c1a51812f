//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 照片链路内部使用 `PhotoError`，应用层（设置文件、命令行）再包一层 `AppError`，
//! 入口函数统一返回 `Result<T, AppError>`，不在各处手写 `map_err(|e| e.to_string())`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `PhotoError` 与 `std::io::Error` 提供 `From` 转换，`?` 直接可用。
//! - 实现 `Serialize` 将错误序列化为字符串，便于以 JSON 返回给调用方。

use serde::Serialize;

use crate::photo::PhotoError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 照片处理链路错误（校验 / 解码 / 绘制 / 配置）
    #[error("{0}")]
    Photo(#[from] PhotoError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 设置文件无法解析或写入
    #[error("设置文件错误: {0}")]
    Settings(String),

    /// 命令行参数错误
    #[error("参数错误: {0}")]
    Usage(String),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
