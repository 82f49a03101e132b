//! # 导出配置
//!
//! 栅格化资源上限与剪贴板重试策略集中在 `ExportConfig`，
//! 运行时可通过命令调整，设置前统一校验取值范围。

use serde::{Deserialize, Serialize};

use super::ExportError;

/// 导出链路可调参数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// 栅格化输出像素上限（`width * height`）。
    pub max_raster_pixels: u64,
    /// 写入剪贴板失败时最大尝试次数。
    pub clipboard_retries: u32,
    /// 重试基础间隔（毫秒）。
    pub clipboard_retry_delay_ms: u64,
    /// 单次写入流程允许的总重试预算（毫秒）。
    pub clipboard_retry_max_total_ms: u64,
    /// 单次退避延迟上限（毫秒）。
    pub clipboard_retry_max_delay_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_raster_pixels: 16_000_000,
            clipboard_retries: 3,
            clipboard_retry_delay_ms: 100,
            clipboard_retry_max_total_ms: 1_800,
            clipboard_retry_max_delay_ms: 900,
        }
    }
}

impl ExportConfig {
    /// 校验参数范围，非法值直接拒绝而不是静默钳制。
    pub fn validate(&self) -> Result<(), ExportError> {
        let invalid = |msg: &str| Err(ExportError::ResourceLimit(msg.to_string()));

        if !(10_000..=100_000_000).contains(&self.max_raster_pixels) {
            return invalid("max_raster_pixels 必须在 10000~100000000 之间");
        }
        if !(1..=10).contains(&self.clipboard_retries) {
            return invalid("clipboard_retries 必须在 1~10 之间");
        }
        if !(1..=2_000).contains(&self.clipboard_retry_delay_ms) {
            return invalid("clipboard_retry_delay_ms 必须在 1~2000 毫秒之间");
        }
        if !(200..=30_000).contains(&self.clipboard_retry_max_total_ms) {
            return invalid("clipboard_retry_max_total_ms 必须在 200~30000 毫秒之间");
        }
        if !(10..=5_000).contains(&self.clipboard_retry_max_delay_ms) {
            return invalid("clipboard_retry_max_delay_ms 必须在 10~5000 毫秒之间");
        }
        Ok(())
    }
}
