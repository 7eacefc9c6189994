//! 配置管理模块
//!
//! 提供查询日志配置的读取、校验与通道解析。配置文件为 TOML 格式：
//!
//! ```toml
//! default_channel = "stack"
//!
//! [query]
//! enabled = true
//! trigger = "X-Debug"
//! slower_than = 5.0
//! ignore_sql = ["information_schema"]
//! admin_str = ["admin_users"]
//! channel = "sql"
//! admin_channel = "sql-admin"
//! ```

use crate::error::{QueryLogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// 未配置任何通道时使用的默认通道名
pub const DEFAULT_CHANNEL: &str = "stack";

/// 主配置结构体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 全局默认日志通道
    pub default_channel: String,
    /// 查询日志配置
    pub query: QueryLogConfig,
}

/// 查询日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLogConfig {
    /// 总开关，关闭时不处理任何查询
    pub enabled: bool,
    /// 触发器名称：环境变量/请求头/请求参数/Cookie 中存在同名项时才记录
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    /// 慢查询阈值（毫秒），耗时低于该值的查询不记录
    #[serde(rename = "slower_than")]
    pub slower_than_millis: f64,
    /// 渲染后的 SQL 包含任一子串时忽略
    #[serde(rename = "ignore_sql")]
    pub ignored_substrings: BTreeSet<String>,
    /// 渲染后的 SQL 包含任一子串时写入管理通道
    #[serde(rename = "admin_str")]
    pub admin_marker_substrings: BTreeSet<String>,
    /// 默认日志通道
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// 管理日志通道，未设置时回退到 `channel`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_channel: Option<String>,
}

impl Default for QueryLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trigger: None,
            slower_than_millis: 0.0,
            ignored_substrings: BTreeSet::new(),
            admin_marker_substrings: BTreeSet::new(),
            channel: None,
            admin_channel: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_channel: DEFAULT_CHANNEL.to_string(),
            query: QueryLogConfig::default(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// 从字符串加载配置
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.resolve_channels();
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.default_channel.trim().is_empty() {
            return Err(QueryLogError::config_error("默认通道不能为空"));
        }
        self.query.validate()
    }

    /// 用 `default_channel` 补全查询配置中未设置的通道
    fn resolve_channels(&mut self) {
        if self.query.channel.is_none() {
            self.query.channel = Some(self.default_channel.clone());
        }
    }

    /// 取出补全通道后的查询配置
    pub fn into_query_config(mut self) -> QueryLogConfig {
        self.resolve_channels();
        self.query
    }
}

impl QueryLogConfig {
    /// 创建一个已启用、写入指定通道的配置
    pub fn enabled_on<S: Into<String>>(channel: S) -> Self {
        Self {
            enabled: true,
            channel: Some(channel.into()),
            ..Self::default()
        }
    }

    /// 设置触发器
    pub fn with_trigger<S: Into<String>>(mut self, trigger: S) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// 设置慢查询阈值（毫秒）
    pub fn with_slower_than(mut self, millis: f64) -> Self {
        self.slower_than_millis = millis;
        self
    }

    /// 追加一个忽略子串
    pub fn ignore<S: Into<String>>(mut self, substring: S) -> Self {
        self.ignored_substrings.insert(substring.into());
        self
    }

    /// 追加一个管理通道标记子串
    pub fn admin_marker<S: Into<String>>(mut self, substring: S) -> Self {
        self.admin_marker_substrings.insert(substring.into());
        self
    }

    /// 设置管理通道
    pub fn with_admin_channel<S: Into<String>>(mut self, channel: S) -> Self {
        self.admin_channel = Some(channel.into());
        self
    }

    /// 生效的触发器名称，空字符串视为未设置
    pub fn active_trigger(&self) -> Option<&str> {
        self.trigger.as_deref().filter(|t| !t.is_empty())
    }

    /// 生效的默认通道
    pub fn resolved_channel(&self) -> &str {
        self.channel.as_deref().unwrap_or(DEFAULT_CHANNEL)
    }

    /// 生效的管理通道，未设置时回退到默认通道
    pub fn resolved_admin_channel(&self) -> &str {
        self.admin_channel
            .as_deref()
            .unwrap_or_else(|| self.resolved_channel())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.slower_than_millis.is_nan() || self.slower_than_millis < 0.0 {
            return Err(QueryLogError::config_error(format!(
                "无效的慢查询阈值: {}",
                self.slower_than_millis
            )));
        }

        if self.ignored_substrings.iter().any(String::is_empty) {
            return Err(QueryLogError::config_error("ignore_sql 不能包含空字符串"));
        }
        if self.admin_marker_substrings.iter().any(String::is_empty) {
            return Err(QueryLogError::config_error("admin_str 不能包含空字符串"));
        }

        if self.enabled && self.channel.as_deref().is_some_and(str::is_empty) {
            return Err(QueryLogError::config_error("日志通道不能为空"));
        }
        if self.enabled && self.admin_channel.as_deref().is_some_and(str::is_empty) {
            return Err(QueryLogError::config_error("管理日志通道不能为空"));
        }

        Ok(())
    }
}
