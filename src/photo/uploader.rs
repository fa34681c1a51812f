//! # 上传编排模块
//!
//! ## 设计思路
//!
//! `PhotoUploader` 只负责流程编排与状态持有，不关心渲染。处理链路固定为：
//! 1. 选择校验（失败即提示并丢弃该文件）
//! 2. 解码原图（可能在后台线程完成）
//! 3. 初始化显示几何与居中裁剪框，进入编辑
//! 4. 确认时重采样 + 编码，通过 `PhotoSink::on_change` 交付给调用方
//!
//! ## 实现思路
//!
//! - 对话框状态显式建模为 `Closed / Decoding / Editing`。
//! - 每次接受文件都签发递增的 `UploadTicket`；解码结果只有在对话框仍在等待
//!   同一张票据时才会被采纳，关闭对话框或重新选择后到达的旧结果被直接忽略。
//! - 任意失败都只提示并回到上传前状态，不改动已有照片。

use super::cropper::{CropBoxController, PointerCapture};
use super::encoder::encode;
use super::geometry::{mask_regions, CropSelection, DisplayGeometry, Point, Rect, Size};
use super::resampler::{render, SourceRegion};
use super::source::{CandidateFile, OutputImage, SourceImage};
use super::validator::validate_candidate;
use super::{PhotoConfig, PhotoError};

/// 提示级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// 一条瞬时提示（不持久化）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// 调用方回调：照片变更与用户提示。
pub trait PhotoSink {
    /// 新照片的 Data URL；空字符串表示删除照片。
    fn on_change(&mut self, photo: &str);

    fn notify(&mut self, notice: Notice);
}

/// 一次被接受的上传的票据。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UploadTicket(u64);

/// 编辑阶段持有的瞬时状态，关闭对话框即丢弃。
#[derive(Debug)]
struct CropEditor {
    source: SourceImage,
    geometry: DisplayGeometry,
    controller: CropBoxController,
}

#[derive(Debug)]
enum DialogState {
    Closed,
    Decoding { ticket: UploadTicket },
    Editing(Box<CropEditor>),
}

/// 解码原图字节。纯函数，可在后台线程执行。
pub fn decode_source(bytes: &[u8]) -> Result<SourceImage, PhotoError> {
    let kind = infer::get(bytes)
        .ok_or_else(|| PhotoError::DecodeFailed("无法识别图片类型".to_string()))?;
    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(PhotoError::DecodeFailed(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| PhotoError::DecodeFailed(e.to_string()))?;
    let source = SourceImage::new(image);

    if source.width() == 0 || source.height() == 0 {
        return Err(PhotoError::DecodeFailed("图片尺寸为 0".to_string()));
    }

    log::info!("✅ 图片解码成功：{} {}x{}", kind.mime_type(), source.width(), source.height());
    Ok(source)
}

/// 照片上传器。
pub struct PhotoUploader<S: PhotoSink> {
    config: PhotoConfig,
    sink: S,
    photo: String,
    dialog: DialogState,
    last_ticket: u64,
}

impl<S: PhotoSink> PhotoUploader<S> {
    /// 以当前照片值（可为空）创建上传器。
    pub fn new(config: PhotoConfig, photo: impl Into<String>, sink: S) -> Result<Self, PhotoError> {
        config.validate()?;
        Ok(Self {
            config,
            sink,
            photo: photo.into(),
            dialog: DialogState::Closed,
            last_ticket: 0,
        })
    }

    pub fn config(&self) -> &PhotoConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// 当前照片（Data URL，可能为空）。
    pub fn photo(&self) -> &str {
        &self.photo
    }

    /// 预览：有照片时返回照片。
    pub fn preview(&self) -> Option<&str> {
        (!self.photo.is_empty()).then_some(self.photo.as_str())
    }

    /// 裁剪对话框是否打开（解码中或编辑中）。
    pub fn is_open(&self) -> bool {
        !matches!(self.dialog, DialogState::Closed)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.dialog, DialogState::Editing(_))
    }

    pub fn selection(&self) -> Option<CropSelection> {
        self.editor().map(|editor| editor.controller.selection())
    }

    pub fn display_geometry(&self) -> Option<DisplayGeometry> {
        self.editor().map(|editor| editor.geometry)
    }

    /// 裁剪框四周的遮罩区域，供渲染层绘制。
    pub fn mask(&self) -> Option<[Rect; 4]> {
        self.editor()
            .map(|editor| {
                mask_regions(editor.controller.container(), editor.controller.selection())
            })
    }

    fn editor(&self) -> Option<&CropEditor> {
        match &self.dialog {
            DialogState::Editing(editor) => Some(&**editor),
            _ => None,
        }
    }

    fn editor_mut(&mut self) -> Option<&mut CropEditor> {
        match &mut self.dialog {
            DialogState::Editing(editor) => Some(&mut **editor),
            _ => None,
        }
    }

    fn fail(&mut self, error: PhotoError) -> PhotoError {
        log::warn!("⚠️ 照片上传失败 [{}/{}]：{}", error.stage(), error.code(), error);
        self.sink.notify(Notice::error(error.to_string()));
        error
    }

    /// 选择文件：校验通过则打开对话框进入解码等待，返回本次上传的票据。
    ///
    /// 校验失败只提示，不改变任何状态。
    pub fn select_file(&mut self, candidate: &CandidateFile) -> Result<UploadTicket, PhotoError> {
        validate_candidate(candidate, &self.config).map_err(|e| self.fail(e))?;

        self.last_ticket += 1;
        let ticket = UploadTicket(self.last_ticket);
        self.dialog = DialogState::Decoding { ticket };

        log::info!(
            "📁 接受照片文件：{} {:.2} MB（ticket={}）",
            candidate.mime_type,
            candidate.size_bytes as f64 / 1024.0 / 1024.0,
            ticket.0
        );
        Ok(ticket)
    }

    /// 接收解码结果。
    ///
    /// 对话框已关闭或已被更新的上传取代时忽略该结果并返回 `Ok(false)`。
    pub fn finish_decode(
        &mut self,
        ticket: UploadTicket,
        decoded: Result<SourceImage, PhotoError>,
        container: Size,
    ) -> Result<bool, PhotoError> {
        match self.dialog {
            DialogState::Decoding { ticket: waiting } if waiting == ticket => {}
            _ => {
                log::debug!("忽略过期的解码结果（ticket={}）", ticket.0);
                return Ok(false);
            }
        }

        let source = match decoded {
            Ok(source) => source,
            Err(error) => {
                self.dialog = DialogState::Closed;
                return Err(self.fail(error));
            }
        };

        let geometry = DisplayGeometry::aspect_fit(source.width(), source.height(), container);
        let controller = CropBoxController::new(container, self.config.output_aspect_ratio());
        self.dialog = DialogState::Editing(Box::new(CropEditor { source, geometry, controller }));
        Ok(true)
    }

    /// 同步完成“校验 → 解码 → 进入编辑”。
    pub fn open_file(
        &mut self,
        candidate: &CandidateFile,
        container: Size,
    ) -> Result<(), PhotoError> {
        let ticket = self.select_file(candidate)?;
        let decoded = decode_source(&candidate.bytes);
        self.finish_decode(ticket, decoded, container)?;
        Ok(())
    }

    pub fn press(&mut self, pointer: Point) -> PointerCapture {
        match self.editor_mut() {
            Some(editor) => editor.controller.press(pointer),
            None => PointerCapture::Unchanged,
        }
    }

    pub fn drag_to(&mut self, pointer: Point) -> Option<CropSelection> {
        self.editor_mut()?.controller.drag_to(pointer)
    }

    pub fn release(&mut self) -> PointerCapture {
        match self.editor_mut() {
            Some(editor) => editor.controller.release(),
            None => PointerCapture::Unchanged,
        }
    }

    /// 确认裁剪。
    ///
    /// `rendered_container` 为确认时实际渲染的容器尺寸，缺省使用打开时的容器。
    /// 未处于编辑状态时返回 `Ok(None)`。无论成功与否，对话框都会关闭。
    pub fn confirm(
        &mut self,
        rendered_container: Option<Size>,
    ) -> Result<Option<OutputImage>, PhotoError> {
        let dialog = std::mem::replace(&mut self.dialog, DialogState::Closed);
        let DialogState::Editing(editor) = dialog else {
            log::debug!("confirm ignored: no image being edited");
            return Ok(None);
        };

        let output = match self.render_output(&editor, rendered_container) {
            Ok(output) => output,
            Err(error) => return Err(self.fail(error)),
        };

        self.photo = output.data_url.clone();
        self.sink.on_change(&self.photo);
        self.sink.notify(Notice::success("照片上传成功"));
        Ok(Some(output))
    }

    fn render_output(
        &self,
        editor: &CropEditor,
        rendered_container: Option<Size>,
    ) -> Result<OutputImage, PhotoError> {
        let (width, height) = editor.source.dimensions();
        let selection = editor.controller.selection();

        // 裁剪框坐标属于打开时的容器，先换算到实际渲染的容器再映射
        let (geometry, selection) = match rendered_container {
            Some(container) => {
                let rendered = DisplayGeometry::aspect_fit(width, height, container);
                (rendered, editor.geometry.transfer(selection, &rendered))
            }
            None => (editor.geometry, selection),
        };

        let region = SourceRegion::map(selection, &geometry, width, height)?;
        let canvas = render(&editor.source, region, &self.config)?;
        encode(canvas, &self.config)
    }

    /// 取消：丢弃原图与裁剪框，照片保持不变。
    pub fn cancel(&mut self) {
        if self.is_open() {
            log::debug!("crop dialog cancelled");
        }
        self.dialog = DialogState::Closed;
    }

    /// 删除当前照片。
    pub fn delete_photo(&mut self) {
        self.photo.clear();
        self.sink.on_change("");
        self.sink.notify(Notice::success("照片已删除"));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub(crate) changes: Vec<String>,
        pub(crate) notices: Vec<Notice>,
    }

    impl PhotoSink for RecordingSink {
        fn on_change(&mut self, photo: &str) {
            self.changes.push(photo.to_string());
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 90])
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .expect("png encode failed");
        out.into_inner()
    }

    fn uploader_with_photo(photo: &str) -> PhotoUploader<RecordingSink> {
        PhotoUploader::new(PhotoConfig::default(), photo, RecordingSink::default())
            .expect("default config should be valid")
    }

    fn uploader() -> PhotoUploader<RecordingSink> {
        uploader_with_photo("")
    }

    const CONTAINER: Size = Size::new(400.0, 400.0);

    #[test]
    fn rejected_file_notifies_and_keeps_dialog_closed() {
        let mut up = uploader();
        let gif = CandidateFile::new("image/gif", vec![0; 16]);

        let result = up.select_file(&gif);

        assert!(matches!(result, Err(PhotoError::InvalidFormat(_))));
        assert!(!up.is_open());
        assert_eq!(up.sink().notices, vec![Notice::error("只能上传 JPG/PNG 图片!")]);
        assert!(up.sink().changes.is_empty());
    }

    #[test]
    fn open_file_initializes_centered_crop_box() {
        let mut up = uploader();
        up.open_file(&CandidateFile::new("image/png", png_bytes(120, 160)), CONTAINER)
            .expect("open should succeed");

        let selection = up.selection().expect("editing");
        let r = 400.0 / 533.0;
        assert!((selection.height - 400.0).abs() < 1e-9);
        assert!((selection.width - 400.0 * r).abs() < 1e-9);
        assert!((selection.x - (400.0 - 400.0 * r) / 2.0).abs() < 1e-9);

        let geometry = up.display_geometry().expect("editing");
        assert!((geometry.width - 300.0).abs() < 1e-9);
    }

    #[test]
    fn late_decode_after_cancel_is_ignored() {
        let mut up = uploader();
        let bytes = png_bytes(30, 40);
        let ticket = up.select_file(&CandidateFile::new("image/png", bytes.clone()))
            .expect("select should succeed");

        up.cancel();
        let applied = up
            .finish_decode(ticket, decode_source(&bytes), CONTAINER)
            .expect("stale result is not an error");

        assert!(!applied);
        assert!(!up.is_open());
    }

    #[test]
    fn superseded_ticket_is_ignored() {
        let mut up = uploader();
        let bytes = png_bytes(30, 40);
        let candidate = CandidateFile::new("image/png", bytes.clone());
        let first = up.select_file(&candidate).expect("select");
        let second = up.select_file(&candidate).expect("select");

        let decode = || decode_source(&bytes);
        assert!(!up.finish_decode(first, decode(), CONTAINER).expect("ignored"));
        assert!(up.finish_decode(second, decode(), CONTAINER).expect("applied"));
        assert!(up.is_editing());
    }

    #[test]
    fn decode_failure_closes_dialog_and_notifies() {
        let mut up = uploader();
        let garbage = b"<html>not an image</html>".to_vec();

        let result = up.open_file(&CandidateFile::new("image/png", garbage), CONTAINER);

        assert!(matches!(result, Err(PhotoError::DecodeFailed(_))));
        assert!(!up.is_open());
        assert_eq!(up.sink().notices.len(), 1);
        assert_eq!(up.sink().notices[0].level, NoticeLevel::Error);
    }

    #[test]
    fn confirm_commits_photo_and_closes_dialog() {
        let mut up = uploader();
        up.open_file(&CandidateFile::new("image/png", png_bytes(120, 160)), CONTAINER)
            .expect("open should succeed");

        let output = up.confirm(None).expect("confirm should succeed").expect("output");

        assert_eq!((output.width, output.height), (400, 533));
        assert_eq!(up.photo(), output.data_url);
        assert_eq!(up.sink().changes, vec![output.data_url.clone()]);
        assert_eq!(up.sink().notices.last(), Some(&Notice::success("照片上传成功")));
        assert!(!up.is_open());
    }

    #[test]
    fn confirm_without_editing_is_noop() {
        let mut up = uploader();

        assert_eq!(up.confirm(None).expect("noop"), None);
        assert!(up.sink().changes.is_empty());
    }

    #[test]
    fn failed_confirm_keeps_previous_photo() {
        let mut up = uploader_with_photo("data:image/jpeg;base64,AAAA");
        up.open_file(&CandidateFile::new("image/png", png_bytes(30, 40)), CONTAINER)
            .expect("open should succeed");

        // 渲染容器为空：缩放比例为 0，无法映射采样区域
        let result = up.confirm(Some(Size::new(0.0, 0.0)));

        assert!(matches!(result, Err(PhotoError::RenderingUnsupported(_))));
        assert_eq!(up.photo(), "data:image/jpeg;base64,AAAA");
        assert!(up.sink().changes.is_empty());
        assert!(!up.is_open());
    }

    #[test]
    fn delete_photo_emits_empty_string() {
        let mut up = uploader_with_photo("data:image/jpeg;base64,AAAA");
        assert!(up.preview().is_some());

        up.delete_photo();

        assert_eq!(up.photo(), "");
        assert_eq!(up.preview(), None);
        assert_eq!(up.sink().changes, vec![String::new()]);
        assert_eq!(up.sink().notices, vec![Notice::success("照片已删除")]);
    }

    #[test]
    fn pointer_events_outside_editing_are_ignored() {
        let mut up = uploader();

        assert_eq!(up.press(Point::new(10.0, 10.0)), PointerCapture::Unchanged);
        assert_eq!(up.drag_to(Point::new(20.0, 20.0)), None);
        assert_eq!(up.release(), PointerCapture::Unchanged);
        assert_eq!(up.mask(), None);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = PhotoConfig { output_width: 0, ..PhotoConfig::default() };

        let result = PhotoUploader::new(config, "", RecordingSink::default());
        assert!(matches!(result, Err(PhotoError::InvalidConfig(_))));
    }
}
