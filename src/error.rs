//! 错误类型定义
//!
//! 这个模块定义了库中使用的所有错误类型，使用 thiserror 提供丰富的错误信息。

/// 查询日志拦截器的结果类型
pub type Result<T> = std::result::Result<T, QueryLogError>;

/// 查询日志错误类型
#[derive(Debug, thiserror::Error)]
pub enum QueryLogError {
    /// 绑定参数数量与占位符数量不一致
    #[error("格式不匹配: 期望 {expected} 个绑定参数，实际 {actual} 个")]
    FormatMismatch { expected: usize, actual: usize },

    /// 绑定参数转义失败
    #[error("绑定参数转义失败 (第{index}个): {message}")]
    Quote { index: usize, message: String },

    /// 日志通道不可用
    #[error("日志通道不可用: {channel}")]
    SinkUnavailable { channel: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// TOML 反序列化错误
    #[error("TOML解析错误: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML 序列化错误
    #[error("TOML序列化错误: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// 其他错误
    #[error("未知错误: {0}")]
    Other(String),
}

impl QueryLogError {
    /// 创建一个格式不匹配错误
    pub fn format_mismatch(expected: usize, actual: usize) -> Self {
        tracing::debug!(expected, actual, "绑定参数数量与占位符数量不一致");
        Self::FormatMismatch { expected, actual }
    }

    /// 创建一个转义错误
    pub fn quote_error<S: Into<String>>(index: usize, message: S) -> Self {
        let message = message.into();
        tracing::debug!(index, "绑定参数转义失败: {}", message);
        Self::Quote { index, message }
    }

    /// 创建一个通道不可用错误
    pub fn sink_unavailable<S: Into<String>>(channel: S) -> Self {
        let channel = channel.into();
        tracing::error!(target: "query_logger::sink", "日志通道不可用: {}", channel);
        Self::SinkUnavailable { channel }
    }

    /// 创建一个配置错误
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        tracing::error!("配置错误: {}", message);
        Self::Config(message)
    }

    /// 创建一个其他类型错误
    pub fn other<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        tracing::error!("未知错误: {}", message);
        Self::Other(message)
    }

    /// 是否属于渲染类错误（格式不匹配或转义失败）
    ///
    /// 渲染类错误会降级为输出原始 SQL，不会中断调用方。
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            QueryLogError::FormatMismatch { .. } | QueryLogError::Quote { .. }
        )
    }

    /// 检查是否为格式不匹配错误
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, QueryLogError::FormatMismatch { .. })
    }

    /// 检查是否为通道不可用错误
    pub fn is_sink_unavailable(&self) -> bool {
        matches!(self, QueryLogError::SinkUnavailable { .. })
    }

    /// 检查是否为配置错误
    pub fn is_config_error(&self) -> bool {
        matches!(self, QueryLogError::Config(_))
    }

    /// 检查是否为 IO 错误
    pub fn is_io_error(&self) -> bool {
        matches!(self, QueryLogError::Io(_))
    }
}
