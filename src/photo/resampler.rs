//! # 重采样模块
//!
//! ## 设计思路
//!
//! 将显示空间中的裁剪框映射回原图像素坐标，再把该区域绘制到固定尺寸的输出画布。
//! 采样区域始终保持裁剪框的宽高比；裁剪框覆盖留白时，区域会超出原图，
//! 超出部分不采样，只把与原图的交集画到画布上对应的子矩形里，其余保持白底。
//!
//! ## 实现思路
//!
//! 1. `SourceRegion::map`：`src = (crop - offset) / scale`，宽高不做单边截断，
//!    只收敛左上角：区域小于原图时整体落在原图内，大于原图时完整包住原图
//! 2. `SourceRegion::clip` 求与原图的交集，按比例换算出画布上的目标矩形
//! 3. 像素对齐且尺寸与目标一致时直接拷贝像素（无重采样损失）
//! 4. 否则用 `fast_image_resize` 一次完成“裁剪 + 缩放”，失败回退 `image::imageops`
//! 5. 结果按 alpha 合成到白色底板后贴到画布，透明区域变为白色

use fast_image_resize as fr;
use image::{imageops, Rgb, RgbaImage, RgbImage};

use super::geometry::{CropSelection, DisplayGeometry};
use super::source::SourceImage;
use super::{PhotoConfig, PhotoError, ResampleProfile};

/// 判定“像素对齐”的容差。
const PIXEL_SNAP_EPSILON: f64 = 1e-6;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// 原图像素空间中的采样区域，可能超出原图（裁剪框覆盖留白时）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 收敛区间起点：`len <= limit` 时落在 `[0, limit - len]`，否则落在 `[limit - len, 0]`。
fn clamp_origin(origin: f64, len: f64, limit: f64) -> f64 {
    let slack = limit - len;
    origin.clamp(slack.min(0.0), slack.max(0.0))
}

impl SourceRegion {
    /// 将裁剪框映射到原图像素坐标。
    ///
    /// # 后置条件
    /// - `width / height == crop.width / crop.height`
    /// - 每个轴上：区域不大于原图时整体位于原图内，否则完整包住原图
    pub fn map(
        crop: CropSelection,
        geometry: &DisplayGeometry,
        source_width: u32,
        source_height: u32,
    ) -> Result<Self, PhotoError> {
        let scale = geometry.scale;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(PhotoError::RenderingUnsupported(format!(
                "显示缩放比例非法：{}",
                scale
            )));
        }

        let width = crop.width / scale;
        let height = crop.height / scale;

        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PhotoError::RenderingUnsupported(format!(
                "采样区域为空：{:.2}x{:.2}",
                width, height
            )));
        }

        let x = clamp_origin((crop.x - geometry.offset_x) / scale, width, source_width as f64);
        let y = clamp_origin((crop.y - geometry.offset_y) / scale, height, source_height as f64);

        Ok(Self { x, y, width, height })
    }

    /// 与 `[0, source_width] × [0, source_height]` 的交集，无交集时返回 `None`。
    pub fn clip(&self, source_width: f64, source_height: f64) -> Option<Self> {
        let left = self.x.max(0.0);
        let top = self.y.max(0.0);
        let right = (self.x + self.width).min(source_width);
        let bottom = (self.y + self.height).min(source_height);

        (right > left && bottom > top).then_some(Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }

    /// 所有分量都在容差内落在整数上时，返回整数像素区域。
    fn pixel_aligned(&self) -> Option<(u32, u32, u32, u32)> {
        let snap = |v: f64| {
            let rounded = v.round();
            ((v - rounded).abs() < PIXEL_SNAP_EPSILON).then_some(rounded as u32)
        };

        Some((snap(self.x)?, snap(self.y)?, snap(self.width)?, snap(self.height)?))
    }
}

/// 交集在输出画布上的目标矩形 `(x, y, width, height)`，按区域到画布的比例换算并取整。
fn destination(
    region: &SourceRegion,
    clipped: &SourceRegion,
    out_width: u32,
    out_height: u32,
) -> (u32, u32, u32, u32) {
    let to_px = |offset: f64, extent: f64, out: u32| {
        (offset / extent * out as f64).round().clamp(0.0, out as f64) as u32
    };

    let left = to_px(clipped.x - region.x, region.width, out_width);
    let right = to_px(clipped.x + clipped.width - region.x, region.width, out_width);
    let top = to_px(clipped.y - region.y, region.height, out_height);
    let bottom = to_px(clipped.y + clipped.height - region.y, region.height, out_height);

    (left, top, right.saturating_sub(left), bottom.saturating_sub(top))
}

/// 将采样区域绘制到 `output_width × output_height` 的白底画布上。
pub fn render(
    source: &SourceImage,
    region: SourceRegion,
    config: &PhotoConfig,
) -> Result<RgbImage, PhotoError> {
    let (out_width, out_height) = (config.output_width, config.output_height);
    if out_width == 0 || out_height == 0 {
        return Err(PhotoError::RenderingUnsupported(format!(
            "输出画布尺寸非法：{}x{}",
            out_width, out_height
        )));
    }

    let mut canvas = RgbImage::from_pixel(out_width, out_height, WHITE);

    let Some(clipped) = region.clip(source.width() as f64, source.height() as f64) else {
        log::warn!("⚠️ 采样区域与原图没有交集，输出空白画布");
        return Ok(canvas);
    };

    let (dst_x, dst_y, dst_width, dst_height) =
        destination(&region, &clipped, out_width, out_height);
    if dst_width == 0 || dst_height == 0 {
        log::warn!("⚠️ 原图在画布上不足一个像素，输出空白画布");
        return Ok(canvas);
    }

    let drawn = match clipped.pixel_aligned() {
        Some((x, y, w, h)) if w == dst_width && h == dst_height => {
            log::debug!("采样区域像素对齐，直接拷贝 {}x{}", w, h);
            imageops::crop_imm(source.image(), x, y, w, h).to_image()
        }
        _ => {
            let profile = config.resample_profile;
            match resize_with_fast_image_resize(source, clipped, dst_width, dst_height, profile) {
                Ok(resized) => resized,
                Err(err) => {
                    log::warn!("⚠️ fast_image_resize 重采样失败，回退 image::imageops：{}", err);
                    resize_with_imageops(source, clipped, dst_width, dst_height, profile)
                }
            }
        }
    };

    imageops::replace(&mut canvas, &flatten_onto_white(&drawn), dst_x as i64, dst_y as i64);

    log::info!(
        "🧩 重采样完成：原图 {}x{} 区域 ({:.1}, {:.1}, {:.1}x{:.1}) -> {}x{} @ ({}, {})，\
         画布 {}x{}（profile={}）",
        source.width(),
        source.height(),
        clipped.x,
        clipped.y,
        clipped.width,
        clipped.height,
        dst_width,
        dst_height,
        dst_x,
        dst_y,
        out_width,
        out_height,
        config.resample_profile.as_str()
    );

    Ok(canvas)
}

/// 按 alpha 将像素合成到白色底板：`c * a + 255 * (1 - a)`，整数四舍五入。
fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

fn resize_with_fast_image_resize(
    source: &SourceImage,
    region: SourceRegion,
    out_width: u32,
    out_height: u32,
    profile: ResampleProfile,
) -> Result<RgbaImage, PhotoError> {
    let src = source.image().to_rgba8();
    let (src_width, src_height) = src.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        src.into_raw(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| PhotoError::RenderingUnsupported(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(out_width, out_height, fr::PixelType::U8x4);

    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(profile.fast_filter()))
        .crop(region.x, region.y, region.width, region.height);

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| PhotoError::RenderingUnsupported(format!("fast_image_resize 执行失败：{}", e)))?;

    RgbaImage::from_raw(out_width, out_height, dst_image.into_vec())
        .ok_or_else(|| PhotoError::RenderingUnsupported("输出缓冲长度异常".to_string()))
}

fn resize_with_imageops(
    source: &SourceImage,
    region: SourceRegion,
    out_width: u32,
    out_height: u32,
    profile: ResampleProfile,
) -> RgbaImage {
    let x = region.x.floor() as u32;
    let y = region.y.floor() as u32;
    let width = (region.width.round() as u32).max(1);
    let height = (region.height.round() as u32).max(1);

    let cropped = imageops::crop_imm(source.image(), x, y, width, height).to_image();
    imageops::resize(&cropped, out_width, out_height, profile.filter())
}
