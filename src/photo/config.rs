//! # 配置模块
//!
//! ## 设计思路
//!
//! 将裁剪链路中所有“可调参数”集中到 `PhotoConfig`：上传体积上限、输出尺寸、
//! 输出格式与质量、重采样档位。输出宽高同时决定了裁剪框的固定宽高比。
//!
//! ## 实现思路
//!
//! - `Default` 提供简历头像的默认参数（10MB / 400×533 / JPEG 0.9）。
//! - `ResampleProfile`（quality / balanced / speed）作为高层语义，映射到具体滤镜。
//! - 通过 serde 读写设置文件，缺失字段回落到默认值。

use fast_image_resize as fr;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use super::PhotoError;

/// 照片裁剪配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    /// 允许上传的最大文件体积（MB），文件体积必须严格小于该值。
    pub max_size_mb: u64,
    /// 输出画布宽度（像素）。
    pub output_width: u32,
    /// 输出画布高度（像素）。
    pub output_height: u32,
    /// 输出编码格式。
    pub output_format: OutputFormat,
    /// 有损编码质量，取值 `(0, 1]`。
    pub quality: f32,
    /// 重采样档位。
    pub resample_profile: ResampleProfile,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 10,
            output_width: 400,
            output_height: 533,
            output_format: OutputFormat::Jpeg,
            quality: 0.9,
            resample_profile: ResampleProfile::Balanced,
        }
    }
}

impl PhotoConfig {
    /// 输出宽高比（宽 / 高），即裁剪框的固定比例。
    pub fn output_aspect_ratio(&self) -> f64 {
        self.output_width as f64 / self.output_height as f64
    }

    /// 上传体积上限（字节）。
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }

    /// 校验参数合法性。
    pub fn validate(&self) -> Result<(), PhotoError> {
        if self.max_size_mb == 0 {
            return Err(PhotoError::InvalidConfig("max_size_mb 必须大于 0".to_string()));
        }
        if self.output_width == 0 || self.output_height == 0 {
            return Err(PhotoError::InvalidConfig(format!(
                "输出尺寸非法：{}x{}",
                self.output_width, self.output_height
            )));
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(PhotoError::InvalidConfig(format!(
                "quality 必须在 (0, 1] 之间：{}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// 输出编码格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// 重采样档位（面向产品语义）。
///
/// - `Quality`：CatmullRom，边缘最锐利
/// - `Balanced`：双线性，默认
/// - `Speed`：盒式滤波
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleProfile {
    Quality,
    Balanced,
    Speed,
}

impl ResampleProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use resume_photo::photo::ResampleProfile;
    ///
    /// let p = ResampleProfile::parse("Quality")?;
    /// assert_eq!(p.as_str(), "quality");
    /// # Ok::<(), resume_photo::photo::PhotoError>(())
    /// ```
    pub fn parse(profile: &str) -> Result<Self, PhotoError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(PhotoError::InvalidConfig(format!(
                "未知重采样档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    /// `image` 回退路径使用的滤镜。
    pub(crate) fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::CatmullRom,
            Self::Balanced => FilterType::Triangle,
            Self::Speed => FilterType::Nearest,
        }
    }

    /// `fast_image_resize` 使用的卷积滤镜。
    pub(crate) fn fast_filter(self) -> fr::FilterType {
        match self {
            Self::Quality => fr::FilterType::CatmullRom,
            Self::Balanced => fr::FilterType::Bilinear,
            Self::Speed => fr::FilterType::Box,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_resume_headshot() {
        let config = PhotoConfig::default();

        assert_eq!(config.max_size_bytes(), 10 * 1024 * 1024);
        assert_eq!((config.output_width, config.output_height), (400, 533));
        assert!((config.output_aspect_ratio() - 400.0 / 533.0).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_output() {
        let mut config = PhotoConfig::default();
        config.output_height = 0;

        assert!(matches!(config.validate(), Err(PhotoError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_quality() {
        let mut config = PhotoConfig::default();
        config.quality = 1.5;
        assert!(config.validate().is_err());

        config.quality = 0.0;
        assert!(config.validate().is_err());

        config.quality = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn profile_parse_roundtrip_and_rejects_unknown() {
        for name in ["quality", "balanced", "speed"] {
            let profile = ResampleProfile::parse(name).expect("known profile should parse");
            assert_eq!(profile.as_str(), name);
        }

        assert!(matches!(
            ResampleProfile::parse("ultra"),
            Err(PhotoError::InvalidConfig(_))
        ));
    }

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let config: PhotoConfig =
            serde_json::from_str(r#"{"max_size_mb": 5, "output_format": "png"}"#)
                .expect("partial json should deserialize");

        assert_eq!(config.max_size_mb, 5);
        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.output_width, 400);
        assert_eq!(config.resample_profile, ResampleProfile::Balanced);
    }
}
