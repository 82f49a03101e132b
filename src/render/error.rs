/// 渲染错误。
///
/// 外部渲染库拒绝载荷时返回 `Encode`，调用方只记录日志并保留旧画面。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("{symbology} 编码失败：{detail}")]
    Encode {
        symbology: &'static str,
        detail: String,
    },

    #[error("渲染参数无效：{0}")]
    InvalidOptions(String),

    #[error("栅格编码失败：{0}")]
    Raster(String),
}

impl RenderError {
    pub(crate) fn encode(symbology: &'static str, detail: impl Into<String>) -> Self {
        Self::Encode {
            symbology,
            detail: detail.into(),
        }
    }
}
