//! 查询日志拦截器
//!
//! 每个查询完成事件对应一次同步处理，最多产生一条日志：
//!
//! ```text
//! QueryEvent → 总开关 → 触发器 → 慢查询阈值 → 回填绑定参数
//!            → 忽略子串 → 耗时格式化 → 通道选择 → LogSink
//! ```
//!
//! 拦截器本身无可变状态，配置只读，可在多个线程中并发调用。
//! 忽略与管理通道的子串匹配针对回填后的 SQL，因此绑定值本身也会参与匹配。

use crate::config::QueryLogConfig;
use crate::error::Result;
use crate::query::{QueryEvent, RenderedQuery, format_duration};
use crate::request::{Environment, ProcessEnv, RequestContext, request_has_trigger};
use crate::sink::LogSink;
use std::sync::Arc;
use tracing::Level;

/// 查询未被记录的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 总开关关闭
    Disabled,
    /// 配置了触发器但当前请求没有携带
    TriggerAbsent,
    /// 耗时低于阈值
    FasterThanThreshold,
    /// 命中忽略子串
    Ignored,
}

/// 单次处理的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Skipped(SkipReason),
    Logged(RenderedQuery),
}

impl Outcome {
    pub fn is_logged(&self) -> bool {
        matches!(self, Outcome::Logged(_))
    }

    /// 已记录时返回渲染结果
    pub fn rendered(&self) -> Option<&RenderedQuery> {
        match self {
            Outcome::Logged(rendered) => Some(rendered),
            Outcome::Skipped(_) => None,
        }
    }
}

/// 查询日志拦截器
pub struct QueryLogInterceptor {
    config: Arc<QueryLogConfig>,
    sink: Arc<dyn LogSink>,
    env: Arc<dyn Environment>,
}

impl QueryLogInterceptor {
    /// 使用进程环境变量创建拦截器
    pub fn new(config: QueryLogConfig, sink: Arc<dyn LogSink>) -> Self {
        Self { config: Arc::new(config), sink, env: Arc::new(ProcessEnv) }
    }

    /// 替换环境变量来源
    pub fn with_environment(mut self, env: Arc<dyn Environment>) -> Self {
        self.env = env;
        self
    }

    pub fn config(&self) -> &QueryLogConfig {
        &self.config
    }

    /// 判断当前请求是否应当记录查询（总开关与触发器）
    pub fn is_active(&self, request: Option<&dyn RequestContext>) -> bool {
        self.gate(request).is_none()
    }

    fn gate(&self, request: Option<&dyn RequestContext>) -> Option<SkipReason> {
        if !self.config.enabled {
            return Some(SkipReason::Disabled);
        }
        if let Some(trigger) = self.config.active_trigger() {
            if !request_has_trigger(trigger, self.env.as_ref(), request) {
                return Some(SkipReason::TriggerAbsent);
            }
        }
        None
    }

    /// 渲染事件，不做任何门控，也不写日志
    ///
    /// 返回 `None` 表示命中忽略子串。相同事件与配置的渲染结果逐字节一致。
    pub fn render(
        &self,
        event: &QueryEvent,
        request: Option<&dyn RequestContext>,
    ) -> Option<RenderedQuery> {
        let (text, render_error) = event.render_sql();
        if let Some(err) = render_error {
            tracing::warn!(
                database = %event.database_name,
                sql = %event.sql,
                error = %err,
                "查询渲染失败，输出原始 SQL"
            );
        }

        if contains_any(&text, &self.config.ignored_substrings) {
            return None;
        }

        let duration_label = format_duration(event.elapsed_millis / 1000.0);

        let channel = if contains_any(&text, &self.config.admin_marker_substrings) {
            self.config.resolved_admin_channel()
        } else {
            self.config.resolved_channel()
        };

        let (method, uri) = request.map_or(("", ""), |req| (req.method(), req.uri()));
        let line = format!(
            "[{}] [{}] {} | {}: {}",
            event.database_name, duration_label, text, method, uri
        );

        Some(RenderedQuery {
            text,
            duration_label,
            channel: channel.to_string(),
            line,
        })
    }

    /// 处理一次查询完成事件
    ///
    /// 门控未通过时返回 [`Outcome::Skipped`]；只有日志通道写入失败才会返回错误，
    /// 渲染失败会降级为输出原始 SQL。
    pub fn on_query_executed(
        &self,
        event: &QueryEvent,
        request: Option<&dyn RequestContext>,
    ) -> Result<Outcome> {
        if let Some(reason) = self.gate(request) {
            return Ok(Outcome::Skipped(reason));
        }

        if event.elapsed_millis < self.config.slower_than_millis {
            return Ok(Outcome::Skipped(SkipReason::FasterThanThreshold));
        }

        let Some(rendered) = self.render(event, request) else {
            return Ok(Outcome::Skipped(SkipReason::Ignored));
        };

        self.sink.write(&rendered.channel, Level::DEBUG, &rendered.line)?;
        Ok(Outcome::Logged(rendered))
    }
}

fn contains_any<'a, I>(text: &str, needles: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    needles.into_iter().any(|needle| text.contains(needle.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpRequest;
    use crate::sink::MemorySink;
    use std::collections::HashMap;

    fn interceptor(config: QueryLogConfig) -> (QueryLogInterceptor, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let env: HashMap<String, String> = HashMap::new();
        let interceptor = QueryLogInterceptor::new(config, sink.clone())
            .with_environment(Arc::new(env));
        (interceptor, sink)
    }

    #[test]
    fn test_disabled_emits_nothing() {
        let config = QueryLogConfig { enabled: false, ..QueryLogConfig::enabled_on("sql") };
        let (interceptor, sink) = interceptor(config);
        let event = QueryEvent::new("select 1", "app").with_elapsed(1000.0);

        let outcome = interceptor.on_query_executed(&event, None).unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::Disabled));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_line_format() {
        let (interceptor, sink) = interceptor(QueryLogConfig::enabled_on("sql"));
        let event = QueryEvent::new("select * from users where id = ?", "shop")
            .with_bindings([7])
            .with_elapsed(2.5);
        let request = HttpRequest::new("GET", "/users/7?tab=1");

        let outcome = interceptor.on_query_executed(&event, Some(&request)).unwrap();
        assert!(outcome.is_logged());

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].channel, "sql");
        assert_eq!(records[0].level, Level::DEBUG);
        assert_eq!(
            records[0].message,
            "[shop] [2.5ms] select * from users where id = 7 | GET: /users/7?tab=1"
        );
    }

    #[test]
    fn test_line_without_request() {
        let (interceptor, sink) = interceptor(QueryLogConfig::enabled_on("sql"));
        let event = QueryEvent::new("select 1", "app").with_elapsed(0.5);
        interceptor.on_query_executed(&event, None).unwrap();
        assert_eq!(sink.records()[0].message, "[app] [500μs] select 1 | : ");
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = QueryLogConfig::enabled_on("sql").with_slower_than(10.0);
        let (interceptor, sink) = interceptor(config);

        let fast = QueryEvent::new("select 1", "app").with_elapsed(9.99);
        assert_eq!(
            interceptor.on_query_executed(&fast, None).unwrap(),
            Outcome::Skipped(SkipReason::FasterThanThreshold)
        );

        let exact = QueryEvent::new("select 1", "app").with_elapsed(10.0);
        assert!(interceptor.on_query_executed(&exact, None).unwrap().is_logged());
        assert_eq!(sink.len(), 1);
    }
}
