//! 裁剪框控制模块
//!
//! 管理一个固定宽高比、只能平移的裁剪框。拖动交互被建模为显式状态机：
//!
//! ```text
//!            press（框内）→ Acquire
//!   Idle ───────────────────────────▶ Dragging { grab_offset }
//!    ▲                                    │ drag_to → 平移 + 收敛
//!    └──────────── release → Release ─────┘
//! ```
//!
//! 进入 / 退出 `Dragging` 时返回 `PointerCapture`，由宿主据此挂载或卸载
//! 全局 move / up 监听，生命周期完全由状态机决定。

use super::geometry::{clamp_position, initial_crop_box, CropSelection, Point, Size};

/// 拖动状态。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// 按下时指针相对裁剪框左上角的偏移。
    Dragging { grab_offset: Point },
}

/// 状态切换时宿主需要执行的指针捕获动作。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCapture {
    /// 进入拖动：挂载全局 move / up 监听。
    Acquire,
    /// 结束拖动：卸载监听。
    Release,
    /// 状态未变化。
    Unchanged,
}

/// 裁剪框控制器。
#[derive(Debug, Clone)]
pub struct CropBoxController {
    container: Size,
    aspect_ratio: f64,
    selection: CropSelection,
    state: DragState,
}

impl CropBoxController {
    /// 按容器与固定比例初始化居中的裁剪框。
    pub fn new(container: Size, aspect_ratio: f64) -> Self {
        let selection = initial_crop_box(container, aspect_ratio);
        log::debug!(
            "crop box initialized: {:.2}x{:.2} at ({:.2}, {:.2}) in {}x{}",
            selection.width, selection.height, selection.x, selection.y,
            container.width, container.height
        );

        Self {
            container,
            aspect_ratio,
            selection,
            state: DragState::Idle,
        }
    }

    /// 新原图或新容器：重新居中并结束任何进行中的拖动。
    pub fn reset(&mut self, container: Size) {
        *self = Self::new(container, self.aspect_ratio);
    }

    pub fn selection(&self) -> CropSelection {
        self.selection
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// 指针按下。仅在 `Idle` 且指针落在裁剪框内时进入拖动。
    pub fn press(&mut self, pointer: Point) -> PointerCapture {
        if self.is_dragging() || !self.selection.contains(pointer) {
            return PointerCapture::Unchanged;
        }

        self.state = DragState::Dragging {
            grab_offset: Point::new(pointer.x - self.selection.x, pointer.y - self.selection.y),
        };
        PointerCapture::Acquire
    }

    /// 指针移动。拖动中按 `pointer - grab_offset` 平移并收敛到容器内，返回新选区。
    pub fn drag_to(&mut self, pointer: Point) -> Option<CropSelection> {
        let DragState::Dragging { grab_offset } = self.state else {
            return None;
        };

        let moved = CropSelection {
            x: pointer.x - grab_offset.x,
            y: pointer.y - grab_offset.y,
            ..self.selection
        };
        self.selection = clamp_position(moved, self.container);
        Some(self.selection)
    }

    /// 指针抬起。
    pub fn release(&mut self) -> PointerCapture {
        if !self.is_dragging() {
            return PointerCapture::Unchanged;
        }

        self.state = DragState::Idle;
        log::debug!(
            "crop box released at ({:.2}, {:.2})",
            self.selection.x, self.selection.y
        );
        PointerCapture::Release
    }
}
