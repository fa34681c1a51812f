//! # 证件照裁剪模块（photo）
//!
//! ## 设计思路
//!
//! 该模块将“选择校验 → 解码 → 显示几何 → 拖动裁剪框 → 重采样 → 编码输出”
//! 按职责拆分为多个子模块，每个子模块只关心一件事。
//!
//! - `validator`：类型与体积校验（不解码）
//! - `geometry`：等比适配、居中裁剪框、边界收敛、遮罩区域（纯几何）
//! - `cropper`：裁剪框拖动状态机
//! - `resampler`：显示坐标 → 原图像素区域，重采样到输出画布
//! - `encoder`：JPEG / PNG 编码与 Data URL
//! - `uploader`：对话框状态与整条流程编排
//! - `service`：共享配置与后台解码
//! - `commands`：对外错误载荷
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! 选择文件
//!    ↓
//! uploader.rs::select_file ── validator.rs（类型 / 体积）
//!    ↓
//! service.rs（spawn_blocking 解码）→ uploader.rs::finish_decode
//!    ├─ geometry.rs（aspect_fit + 居中裁剪框）
//!    └─ cropper.rs（press / drag_to / release）
//!    ↓
//! uploader.rs::confirm
//!    ├─ resampler.rs（区域映射 + 重采样 + 白底合成）
//!    └─ encoder.rs（编码 + Data URL）
//!    ↓
//! PhotoSink::on_change
//! ```

pub mod commands;
mod config;
mod cropper;
mod encoder;
mod error;
pub mod geometry;
mod resampler;
mod service;
mod source;
mod uploader;
mod validator;

pub use commands::PhotoCommandError;
pub use config::{OutputFormat, PhotoConfig, ResampleProfile};
pub use cropper::{CropBoxController, DragState, PointerCapture};
pub use encoder::encode;
pub use error::PhotoError;
pub use geometry::{CropSelection, DisplayGeometry, Point, Rect, Size};
pub use resampler::{render, SourceRegion};
pub use service::PhotoService;
pub use source::{parse_data_url, read_as_data_url, CandidateFile, OutputImage, SourceImage};
pub use uploader::{decode_source, Notice, NoticeLevel, PhotoSink, PhotoUploader, UploadTicket};
pub use validator::{validate_candidate, ACCEPTED_MIME_TYPES};
