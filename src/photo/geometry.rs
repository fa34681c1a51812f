//! 显示几何计算模块
//!
//! 该模块实现裁剪对话框内的核心几何算法：
//!
//! 1. **等比适配** (`DisplayGeometry::aspect_fit`)：原图等比缩放到容器内并居中。
//! 2. **初始裁剪框** (`initial_crop_box`)：容器内按固定比例取最大矩形并居中。
//! 3. **边界收敛** (`clamp_position`)：拖动后的裁剪框收敛回容器内。
//! 4. **遮罩区域** (`mask_regions`)：裁剪框四周的暗色遮罩。
//!
//! # 设计思路
//!
//! - 算法纯函数化：输入为尺寸与坐标，输出唯一结果，便于测试。
//! - 先算理想位置，再做边界收敛，可证明不会越界。
//! - 坐标统一使用 `f64` 显示空间（CSS 像素），与原图像素空间区分。

/// 二维尺寸。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 任一维度非正或非有限值时视为空。
    pub fn is_empty(&self) -> bool {
        let finite = self.width.is_finite() && self.height.is_finite();
        !(finite && self.width > 0.0 && self.height > 0.0)
    }
}

/// 显示空间中的点（指针位置等）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 显示空间中的矩形，`(x, y)` 为左上角。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// 点是否落在矩形内（含边界）。
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// 裁剪框：显示空间中的矩形。
pub type CropSelection = Rect;

/// 原图在容器中等比适配后的显示尺寸与居中偏移。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub container: Size,
    /// 显示尺寸 / 原图尺寸。
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl DisplayGeometry {
    /// 计算等比适配结果。
    ///
    /// # 后置条件
    /// - `width / height == source_width / source_height`
    /// - `offset_x = (container.width - width) / 2`，`offset_y` 同理
    /// - 原图或容器为空：`scale == 0`，显示尺寸为 0，偏移为容器一半
    pub fn aspect_fit(source_width: u32, source_height: u32, container: Size) -> Self {
        let scale = if source_width == 0 || source_height == 0 || container.is_empty() {
            log::warn!(
                "Zero-sized source ({}x{}) or container ({}x{}). Scale set to 0.",
                source_width, source_height, container.width, container.height
            );
            0.0
        } else {
            (container.width / source_width as f64).min(container.height / source_height as f64)
        };

        let width = source_width as f64 * scale;
        let height = source_height as f64 * scale;

        Self {
            container,
            scale,
            width,
            height,
            offset_x: (container.width.max(0.0) - width) / 2.0,
            offset_y: (container.height.max(0.0) - height) / 2.0,
        }
    }

    /// 原图在容器中的显示区域。
    pub fn image_rect(&self) -> Rect {
        Rect::new(self.offset_x, self.offset_y, self.width, self.height)
    }

    /// 把本几何下的矩形换算到同一原图的另一几何下，相对原图的位置与大小不变。
    ///
    /// 本几何缩放比例非法时原样返回。
    pub fn transfer(&self, rect: Rect, to: &DisplayGeometry) -> Rect {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return rect;
        }

        let k = to.scale / self.scale;
        Rect::new(
            to.offset_x + (rect.x - self.offset_x) * k,
            to.offset_y + (rect.y - self.offset_y) * k,
            rect.width * k,
            rect.height * k,
        )
    }
}

/// 在容器内按比例 `aspect_ratio`（宽 / 高）取最大矩形并居中。
///
/// # 规则
/// - `cw / r <= ch`：宽度撑满，`height = cw / r`
/// - 否则：高度撑满，`width = ch * r`
///
/// 容器为空或比例非法时返回零尺寸矩形。
pub fn initial_crop_box(container: Size, aspect_ratio: f64) -> CropSelection {
    if container.is_empty() || !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return Rect::new(0.0, 0.0, 0.0, 0.0);
    }

    let (width, height) = if container.width / aspect_ratio <= container.height {
        (container.width, container.width / aspect_ratio)
    } else {
        (container.height * aspect_ratio, container.height)
    };

    Rect::new(
        (container.width - width) / 2.0,
        (container.height - height) / 2.0,
        width,
        height,
    )
}

/// 将裁剪框位置收敛到 `x ∈ [0, cw - w]`、`y ∈ [0, ch - h]`，尺寸不变。
///
/// 裁剪框大于容器时上界取 0，保证区间不反转。
pub fn clamp_position(rect: Rect, container: Size) -> Rect {
    let max_x = (container.width - rect.width).max(0.0);
    let max_y = (container.height - rect.height).max(0.0);

    Rect {
        x: rect.x.clamp(0.0, max_x),
        y: rect.y.clamp(0.0, max_y),
        ..rect
    }
}

/// 裁剪框四周的遮罩区域：上、下、左、右。
///
/// 上下两块横跨整个容器宽度，左右两块只覆盖裁剪框所在的水平带，
/// 四块互不重叠，拼合后正好是“容器减去裁剪框”。
pub fn mask_regions(container: Size, crop: CropSelection) -> [Rect; 4] {
    let bottom_y = crop.y + crop.height;
    let right_x = crop.x + crop.width;

    [
        Rect::new(0.0, 0.0, container.width, crop.y),
        Rect::new(0.0, bottom_y, container.width, (container.height - bottom_y).max(0.0)),
        Rect::new(0.0, crop.y, crop.x, crop.height),
        Rect::new(right_x, crop.y, (container.width - right_x).max(0.0), crop.height),
    ]
}
