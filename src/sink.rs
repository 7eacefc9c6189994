//! 日志输出通道
//!
//! 拦截器只负责生成日志行，写到哪里由 [`LogSink`] 决定。
//! 持久化、轮转等由宿主的日志系统负责。

use crate::error::{QueryLogError, Result};
use std::collections::BTreeSet;
use std::sync::Mutex;
use tracing::Level;

/// 查询日志的 tracing target
pub const QUERY_TARGET: &str = "query_logger::query";

/// 按通道名写日志的外部接收端
pub trait LogSink: Send + Sync {
    /// 写出一条日志，通道不可用时返回 [`QueryLogError::SinkUnavailable`]
    fn write(&self, channel: &str, level: Level, message: &str) -> Result<()>;
}

/// 通过 tracing 事件输出，`channel` 作为结构化字段
///
/// 构造时可以指定已知通道集合，写入未知通道会返回错误；集合为空时接受任意通道。
#[derive(Debug, Default, Clone)]
pub struct TracingSink {
    channels: BTreeSet<String>,
}

impl TracingSink {
    /// 接受任意通道
    pub fn new() -> Self {
        Self::default()
    }

    /// 只接受给定的通道
    pub fn with_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { channels: channels.into_iter().map(Into::into).collect() }
    }

    /// 通道是否可写
    pub fn accepts(&self, channel: &str) -> bool {
        !channel.is_empty()
            && (self.channels.is_empty() || self.channels.contains(channel))
    }
}

impl LogSink for TracingSink {
    fn write(&self, channel: &str, level: Level, message: &str) -> Result<()> {
        if !self.accepts(channel) {
            return Err(QueryLogError::sink_unavailable(channel));
        }

        // tracing 宏要求级别为常量
        if level == Level::TRACE {
            tracing::trace!(target: QUERY_TARGET, channel, "{}", message);
        } else if level == Level::DEBUG {
            tracing::debug!(target: QUERY_TARGET, channel, "{}", message);
        } else if level == Level::INFO {
            tracing::info!(target: QUERY_TARGET, channel, "{}", message);
        } else if level == Level::WARN {
            tracing::warn!(target: QUERY_TARGET, channel, "{}", message);
        } else {
            tracing::error!(target: QUERY_TARGET, channel, "{}", message);
        }
        Ok(())
    }
}

/// 内存中的一条日志记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub channel: String,
    pub level: Level,
    pub message: String,
}

/// 把日志保存在内存中，便于测试和调试页展示
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入记录的快照
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// 已写入的日志条数
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn write(&self, channel: &str, level: Level, message: &str) -> Result<()> {
        if channel.is_empty() {
            return Err(QueryLogError::sink_unavailable(channel));
        }
        let record = LogRecord {
            channel: channel.to_string(),
            level,
            message: message.to_string(),
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
        Ok(())
    }
}
