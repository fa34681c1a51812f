//! # 服务层（共享状态）
//!
//! ## 设计思路
//!
//! `PhotoService` 持有可在运行时切换的配置，并负责把解码放到阻塞线程池，
//! 避免大图解码卡住事件循环。
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<PhotoConfig>>` 共享；每个上传器拿到创建时的配置快照，
//!   单次上传内参数不会漂移。
//! - `upload`：校验 → 后台解码 → 回到调用方接收结果（过期结果由上传器忽略）。

use std::sync::{Arc, RwLock};

use super::geometry::Size;
use super::source::{CandidateFile, SourceImage};
use super::uploader::{decode_source, PhotoSink, PhotoUploader};
use super::{PhotoConfig, PhotoError, ResampleProfile};

/// 照片服务。
#[derive(Clone)]
pub struct PhotoService {
    config: Arc<RwLock<PhotoConfig>>,
}

impl PhotoService {
    /// 使用默认配置创建服务。
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(PhotoConfig::default())),
        }
    }

    /// 使用自定义配置创建服务。
    ///
    /// # 示例
    /// ```rust
    /// use resume_photo::photo::{PhotoConfig, PhotoService};
    ///
    /// let config = PhotoConfig { max_size_mb: 5, ..PhotoConfig::default() };
    /// let service = PhotoService::with_config(config)?;
    /// assert_eq!(service.config_snapshot()?.max_size_mb, 5);
    /// # Ok::<(), resume_photo::photo::PhotoError>(())
    /// ```
    pub fn with_config(config: PhotoConfig) -> Result<Self, PhotoError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// 获取配置快照。
    pub fn config_snapshot(&self) -> Result<PhotoConfig, PhotoError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| PhotoError::InvalidConfig("配置读取锁已中毒".to_string()))
    }

    /// 整体替换配置，非法配置不会生效。
    pub fn update_config(&self, config: PhotoConfig) -> Result<(), PhotoError> {
        config.validate()?;
        let mut guard = self
            .config
            .write()
            .map_err(|_| PhotoError::InvalidConfig("配置写入锁已中毒".to_string()))?;
        *guard = config;
        Ok(())
    }

    /// 切换重采样档位。
    pub fn set_resample_profile(&self, profile: &str) -> Result<(), PhotoError> {
        let profile = ResampleProfile::parse(profile)?;
        let mut config = self
            .config
            .write()
            .map_err(|_| PhotoError::InvalidConfig("配置写入锁已中毒".to_string()))?;
        config.resample_profile = profile;

        log::info!("⚙️ 已切换重采样档位：{}", profile.as_str());
        Ok(())
    }

    /// 当前重采样档位（字符串）。
    pub fn resample_profile(&self) -> Result<String, PhotoError> {
        Ok(self.config_snapshot()?.resample_profile.as_str().to_string())
    }

    /// 以当前配置快照创建上传器。
    pub fn uploader<S: PhotoSink>(
        &self,
        photo: impl Into<String>,
        sink: S,
    ) -> Result<PhotoUploader<S>, PhotoError> {
        PhotoUploader::new(self.config_snapshot()?, photo, sink)
    }

    /// 在阻塞线程池中解码。
    pub async fn decode_in_background(&self, bytes: Vec<u8>) -> Result<SourceImage, PhotoError> {
        tokio::task::spawn_blocking(move || decode_source(&bytes))
            .await
            .map_err(|e| PhotoError::DecodeFailed(format!("解码任务异常结束：{}", e)))?
    }

    /// 完整上传：校验 → 后台解码 → 进入编辑。
    ///
    /// 返回 `Ok(false)` 表示解码完成时该上传已被取消或取代。
    pub async fn upload<S: PhotoSink>(
        &self,
        uploader: &mut PhotoUploader<S>,
        candidate: CandidateFile,
        container: Size,
    ) -> Result<bool, PhotoError> {
        let ticket = uploader.select_file(&candidate)?;
        let decoded = self.decode_in_background(candidate.bytes).await;
        uploader.finish_decode(ticket, decoded, container)
    }
}

impl Default for PhotoService {
    fn default() -> Self {
        Self::new()
    }
}
