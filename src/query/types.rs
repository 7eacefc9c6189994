//! 查询事件与渲染结果

use super::binding::{Binding, StandardQuoter, ValueQuoter};
use super::template::SqlTemplate;
use crate::error::{QueryLogError, Result};
use std::fmt;
use std::sync::Arc;

/// 一次查询执行完成后由数据访问层产生的事件
#[derive(Clone)]
pub struct QueryEvent {
    /// 带 `?` 占位符的原始 SQL
    pub sql: String,
    /// 按位置排列的绑定参数
    pub bindings: Vec<Binding>,
    /// 执行耗时（毫秒）
    pub elapsed_millis: f64,
    /// 数据库名
    pub database_name: String,
    /// 连接提供的转义能力
    pub quoter: Arc<dyn ValueQuoter>,
}

impl fmt::Debug for QueryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEvent")
            .field("sql", &self.sql)
            .field("bindings", &self.bindings)
            .field("elapsed_millis", &self.elapsed_millis)
            .field("database_name", &self.database_name)
            .finish_non_exhaustive()
    }
}

impl QueryEvent {
    /// 创建事件，默认无绑定参数、耗时为 0、使用 [`StandardQuoter`]
    pub fn new<S: Into<String>, D: Into<String>>(sql: S, database_name: D) -> Self {
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
            elapsed_millis: 0.0,
            database_name: database_name.into(),
            quoter: Arc::new(StandardQuoter),
        }
    }

    /// 设置绑定参数
    pub fn with_bindings<I, B>(mut self, bindings: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Binding>,
    {
        self.bindings = bindings.into_iter().map(Into::into).collect();
        self
    }

    /// 设置执行耗时（毫秒）
    pub fn with_elapsed(mut self, millis: f64) -> Self {
        self.elapsed_millis = millis;
        self
    }

    /// 设置转义器
    pub fn with_quoter(mut self, quoter: Arc<dyn ValueQuoter>) -> Self {
        self.quoter = quoter;
        self
    }

    /// 预处理后逐个转义绑定参数
    pub fn quoted_bindings(&self) -> Result<Vec<String>> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(index, binding)| {
                self.quoter.quote(&binding.prepare()).map_err(|e| match e {
                    err @ QueryLogError::Quote { .. } => err,
                    other => QueryLogError::quote_error(index, other.to_string()),
                })
            })
            .collect()
    }

    /// 还原出可读的 SQL 文本
    ///
    /// 没有绑定参数时占位符原样保留，`??` 同样还原为 `?`。回填失败时不会报错中断，而是返回未回填的 SQL
    /// 并附带注释说明原因，同时把错误一并返回给调用方记录。
    pub fn render_sql(&self) -> (String, Option<QueryLogError>) {
        let template = SqlTemplate::parse(&self.sql);
        if self.bindings.is_empty() {
            return (template.render_unbound(), None);
        }

        let filled = self
            .quoted_bindings()
            .and_then(|quoted| template.fill(&quoted));

        match filled {
            Ok(text) => (text, None),
            Err(err) => {
                let marker = match &err {
                    QueryLogError::FormatMismatch { expected, actual } => format!(
                        "/* format mismatch: expected {expected} bindings, got {actual} */"
                    ),
                    _ => "/* bindings omitted: quoting failed */".to_string(),
                };
                (format!("{} {}", template.render_unbound(), marker), Some(err))
            }
        }
    }
}

/// 渲染后的查询，仅在单次处理过程中存在
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    /// 回填绑定参数后的 SQL
    pub text: String,
    /// 格式化后的耗时
    pub duration_label: String,
    /// 目标日志通道
    pub channel: String,
    /// 最终写出的日志行
    pub line: String,
}
