//! 设置文件读写
//!
//! 设置以格式化 JSON 保存 `PhotoConfig`，缺失的字段回落到默认值。

use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::photo::PhotoConfig;

/// 读取设置文件。文件不存在时返回默认配置。
pub fn load_settings(path: &Path) -> Result<PhotoConfig, AppError> {
    if !path.exists() {
        log::info!("设置文件不存在，使用默认配置：{}", path.display());
        return Ok(PhotoConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str::<PhotoConfig>(&content)
        .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))?;
    config.validate()?;

    log::info!("⚙️ 已加载设置：{}", path.display());
    Ok(config)
}

/// 写入设置文件，必要时创建父目录。
pub fn save_settings(path: &Path, config: &PhotoConfig) -> Result<(), AppError> {
    config.validate()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}
