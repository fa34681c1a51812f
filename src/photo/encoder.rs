//! # 输出编码模块
//!
//! 将输出画布按配置编码为 JPEG（固定质量）或 PNG，并包装成 Data URL。
//! 同一画布与同一配置总是得到相同字节。

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbImage};

use super::source::{read_as_data_url, OutputImage};
use super::{OutputFormat, PhotoConfig, PhotoError};

/// 将 `(0, 1]` 的质量系数换算为 JPEG 质量 `1..=100`。
fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// 编码画布并生成 `OutputImage`。
pub fn encode(canvas: RgbImage, config: &PhotoConfig) -> Result<OutputImage, PhotoError> {
    let (width, height) = canvas.dimensions();
    let image = DynamicImage::ImageRgb8(canvas);
    let mut bytes = Vec::new();

    let written = match config.output_format {
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(config.quality));
            image.write_with_encoder(encoder)
        }
        OutputFormat::Png => image.write_with_encoder(PngEncoder::new(&mut bytes)),
    };
    written.map_err(|e| PhotoError::RenderingUnsupported(format!("图片编码失败：{}", e)))?;

    let mime_type = config.output_format.mime_type();
    log::info!(
        "✅ 输出编码完成：{} {}x{} {:.1} KB",
        mime_type,
        width,
        height,
        bytes.len() as f64 / 1024.0
    );

    Ok(OutputImage {
        data_url: read_as_data_url(&bytes, mime_type),
        width,
        height,
        mime_type,
    })
}
