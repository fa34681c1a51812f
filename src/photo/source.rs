//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入”与“流水线中间结果”解耦：
//! - `CandidateFile` 表示用户选择、尚未校验的文件
//! - `SourceImage` 表示已解码的原图，加载后只读
//! - `OutputImage` 表示最终编码好的 Data URL
//!
//! Data URL 的读写（相当于 `FileReader.readAsDataURL`）也放在这里。

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, GenericImageView};

use super::PhotoError;

/// 用户选择的候选文件。
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// 声明的 MIME 类型（来自文件选择器）。
    pub mime_type: String,
    /// 文件体积（字节）。
    pub size_bytes: u64,
    /// 文件内容。
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    /// 以内容长度作为体积构造候选文件。
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }
}

/// 解码后的原图。
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
}

impl SourceImage {
    pub(crate) fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub(crate) fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// 最终输出：固定尺寸的图片 Data URL。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub mime_type: &'static str,
}

impl OutputImage {
    /// 解出 Data URL 中的原始编码字节。
    pub fn to_bytes(&self) -> Result<Vec<u8>, PhotoError> {
        parse_data_url(&self.data_url, u64::MAX)
    }
}

/// 将字节编码为 `data:<mime>;base64,...`。
pub fn read_as_data_url(bytes: &[u8], mime_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> u64 {
    let len = base64_data.trim().len() as u64;
    len.saturating_add(3) / 4 * 3
}

/// 解析 Data URL（也接受纯 Base64），解码前先按长度估算体积并拒绝超限输入。
pub fn parse_data_url(data: &str, max_bytes: u64) -> Result<Vec<u8>, PhotoError> {
    let normalized = data.trim();

    let payload = if normalized.starts_with("data:") {
        let base64_start = normalized
            .find(";base64,")
            .ok_or_else(|| PhotoError::DecodeFailed("缺少 base64 标记".to_string()))?;
        &normalized[base64_start + 8..]
    } else {
        normalized
    };

    let estimated_len = estimate_base64_decoded_upper_bound_len(payload);
    if estimated_len > max_bytes {
        return Err(PhotoError::FileTooLarge(format!(
            "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
            estimated_len as f64 / 1024.0 / 1024.0,
            max_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| PhotoError::DecodeFailed(format!("Base64 解码失败：{}", e)))
}
