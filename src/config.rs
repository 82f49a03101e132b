//! 应用配置模块
//!
//! # 设计思路
//!
//! 唯一需要持久化的是少量应用级偏好：身份提供方 API Key、导出目录、
//! 是否每次询问保存位置。生成的码与渲染选项从不持久化。
//!
//! # 实现思路
//!
//! - 配置文件位于应用数据目录下的 `config.json`。
//! - 文件缺失或损坏时回退默认值并记录告警，不阻塞启动。
//! - 环境变量 `ECODE_FIREBASE_API_KEY` 优先于文件中的 API Key。
//! - 运行期通过 `RwLock` 持有当前配置，写入时同步落盘。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Manager, State};

use crate::error::AppError;

/// 覆盖配置文件中 API Key 的环境变量。
pub const API_KEY_ENV: &str = "ECODE_FIREBASE_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPreferences {
    /// 自定义导出目录，空表示使用系统下载目录。
    pub export_dir: Option<String>,
    /// 保存前弹出文件对话框。
    pub ask_save_location: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub identity: IdentityConfig,
    pub export: ExportPreferences,
}

impl AppConfig {
    /// 生效的 API Key：环境变量优先，空串视为未配置。
    pub fn effective_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| self.identity.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }
}

fn config_file_path(app: &AppHandle) -> Result<PathBuf, AppError> {
    let app_data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| AppError::Config(format!("获取应用数据目录失败: {}", e)))?;

    fs::create_dir_all(&app_data_dir)
        .map_err(|e| AppError::Config(format!("创建应用数据目录失败: {}", e)))?;

    Ok(app_data_dir.join("config.json"))
}

pub(crate) fn load_config_from_path(config_path: &Path) -> AppConfig {
    if !config_path.exists() {
        return AppConfig::default();
    }

    match fs::read_to_string(config_path).map(|content| serde_json::from_str::<AppConfig>(&content)) {
        Ok(Ok(config)) => config,
        Ok(Err(err)) => {
            log::warn!("⚠️ 配置文件解析失败，使用默认配置: {}", err);
            AppConfig::default()
        }
        Err(err) => {
            log::warn!("⚠️ 读取配置文件失败，使用默认配置: {}", err);
            AppConfig::default()
        }
    }
}

pub(crate) fn save_config_to_path(config_path: &Path, config: &AppConfig) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("序列化配置失败: {}", e)))?;
    fs::write(config_path, content).map_err(|e| AppError::Config(format!("写入配置文件失败: {}", e)))
}

/// 运行期配置状态。
pub struct ConfigState {
    path: Option<PathBuf>,
    current: RwLock<AppConfig>,
}

impl ConfigState {
    /// 从应用数据目录加载。
    pub fn load(app: &AppHandle) -> Result<Self, AppError> {
        let path = config_file_path(app)?;
        Ok(Self::from_path(path))
    }

    pub fn from_path(path: PathBuf) -> Self {
        let config = load_config_from_path(&path);
        log::info!("⚙️ 已加载配置 {}", path.display());
        Self {
            path: Some(path),
            current: RwLock::new(config),
        }
    }

    /// 不落盘的配置，用于测试或受限模式。
    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            path: None,
            current: RwLock::new(config),
        }
    }

    pub fn snapshot(&self) -> Result<AppConfig, AppError> {
        self.current
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| AppError::State("配置读取锁已中毒".to_string()))
    }

    pub fn update(&self, next: AppConfig) -> Result<(), AppError> {
        if let Some(path) = &self.path {
            save_config_to_path(path, &next)?;
        }
        let mut current = self
            .current
            .write()
            .map_err(|_| AppError::State("配置写入锁已中毒".to_string()))?;
        *current = next;
        log::info!("⚙️ 配置已更新");
        Ok(())
    }
}

#[tauri::command]
pub fn get_app_config(state: State<'_, ConfigState>) -> Result<AppConfig, AppError> {
    state.snapshot()
}

#[tauri::command]
pub fn set_app_config(state: State<'_, ConfigState>, config: AppConfig) -> Result<(), AppError> {
    state.update(config)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("ecode-config-test-{nanos}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let dir = unique_temp_dir();
        let config_path = dir.join("config.json");
        let config = AppConfig {
            identity: IdentityConfig {
                api_key: Some("key-123".to_string()),
            },
            export: ExportPreferences {
                export_dir: Some("/tmp/codes".to_string()),
                ask_save_location: true,
            },
        };

        save_config_to_path(&config_path, &config).expect("save config");
        assert_eq!(load_config_from_path(&config_path), config);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_or_missing_config_falls_back_to_default() {
        let dir = unique_temp_dir();
        let config_path = dir.join("config.json");
        assert_eq!(load_config_from_path(&config_path), AppConfig::default());

        fs::write(&config_path, "not-json").expect("write invalid config");
        assert_eq!(load_config_from_path(&config_path), AppConfig::default());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = unique_temp_dir();
        let config_path = dir.join("config.json");
        fs::write(&config_path, r#"{"export":{"ask_save_location":true}}"#).expect("write");
        let loaded = load_config_from_path(&config_path);
        assert!(loaded.export.ask_save_location);
        assert!(loaded.identity.api_key.is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn in_memory_update_is_visible() {
        let state = ConfigState::in_memory(AppConfig::default());
        let mut next = AppConfig::default();
        next.export.ask_save_location = true;
        state.update(next.clone()).expect("update");
        assert_eq!(state.snapshot().expect("snapshot"), next);
    }
}
