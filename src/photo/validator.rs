//! # 选择校验模块
//!
//! 在任何解码之前按“类型 → 体积”的顺序拒绝不合规文件，尽早失败。
//! 校验失败对该文件是终态：不解码、不重试，由用户重新选择。

use super::source::CandidateFile;
use super::{PhotoConfig, PhotoError};

/// 允许上传的 MIME 类型。
pub const ACCEPTED_MIME_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// 去掉参数部分并统一小写，例如 `IMAGE/PNG; charset=x` → `image/png`。
fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// 校验候选文件。
///
/// 接受条件：`mime_type ∈ {image/jpeg, image/png}` 且 `size_bytes < max_size_mb * 1024 * 1024`。
pub fn validate_candidate(
    candidate: &CandidateFile,
    config: &PhotoConfig,
) -> Result<(), PhotoError> {
    let mime = normalize_mime(&candidate.mime_type);
    if !ACCEPTED_MIME_TYPES.contains(&mime.as_str()) {
        log::warn!("🚫 拒绝上传：不支持的类型 {}", candidate.mime_type);
        return Err(PhotoError::InvalidFormat("只能上传 JPG/PNG 图片!".to_string()));
    }

    if candidate.size_bytes >= config.max_size_bytes() {
        log::warn!(
            "🚫 拒绝上传：文件过大 {:.2} MB（限制：{} MB）",
            candidate.size_bytes as f64 / 1024.0 / 1024.0,
            config.max_size_mb
        );
        return Err(PhotoError::FileTooLarge(format!(
            "图片大小不能超过 {}MB!",
            config.max_size_mb
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    fn candidate(mime: &str, size_bytes: u64) -> CandidateFile {
        CandidateFile {
            mime_type: mime.to_string(),
            size_bytes,
            bytes: Vec::new(),
        }
    }

    #[test]
    fn accepts_jpeg_and_png_under_limit() {
        let config = PhotoConfig::default();

        assert!(validate_candidate(&candidate("image/jpeg", MB), &config).is_ok());
        assert!(validate_candidate(&candidate("image/png", 5 * MB), &config).is_ok());
    }

    #[test]
    fn rejects_other_types() {
        let config = PhotoConfig::default();

        for mime in ["image/gif", "image/webp", "application/pdf", ""] {
            let result = validate_candidate(&candidate(mime, 1), &config);
            assert!(matches!(result, Err(PhotoError::InvalidFormat(_))), "{mime}");
        }
    }

    #[test]
    fn mime_match_ignores_case_and_parameters() {
        let config = PhotoConfig::default();

        assert!(validate_candidate(&candidate("IMAGE/PNG", 1), &config).is_ok());
        assert!(validate_candidate(&candidate("image/jpeg; q=1", 1), &config).is_ok());
    }

    #[test]
    fn size_limit_is_exclusive() {
        let config = PhotoConfig::default();

        assert!(validate_candidate(&candidate("image/png", 10 * MB - 1), &config).is_ok());
        let result = validate_candidate(&candidate("image/png", 10 * MB), &config);
        assert!(matches!(result, Err(PhotoError::FileTooLarge(_))));
    }

    #[test]
    fn oversized_png_reports_configured_limit() {
        let config = PhotoConfig::default();
        let err = validate_candidate(&candidate("image/png", 15 * MB), &config)
            .expect_err("15MB should be rejected");

        assert_eq!(err, PhotoError::FileTooLarge("图片大小不能超过 10MB!".to_string()));
    }

    #[test]
    fn format_is_checked_before_size() {
        let config = PhotoConfig::default();
        let result = validate_candidate(&candidate("image/gif", 50 * MB), &config);

        assert!(matches!(result, Err(PhotoError::InvalidFormat(_))));
    }
}
