//! # 简历照片裁剪工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  调用方（编辑器 / CLI）                   │
//! │                                                          │
//! │  选择文件 ── 拖动裁剪框 ── 确认 / 取消 / 删除            │
//! │       │  (PhotoSink::on_change + Notice 提示)            │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Result<T, PhotoError> / PhotoCommandError
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            照片链路 (Rust)                       │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ photo ────── 校验·解码·裁剪·重采样·编码               │
//! │  │   ├─ uploader     对话框状态 + 流程编排                │
//! │  │   ├─ cropper      拖动状态机                           │
//! │  │   └─ service      共享配置 + 后台解码                  │
//! │  │                                                       │
//! │  └─ settings          JSON 设置文件                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，应用入口的返回类型 |
//! | [`photo`] | 上传校验、显示几何、裁剪框拖动、重采样、JPEG/PNG 输出 |
//! | [`settings`] | `PhotoConfig` 设置文件的读取与保存 |

pub mod error;
pub mod photo;
pub mod settings;
