//! SQL 占位符模板
//!
//! 单次扫描 SQL 文本，把 `?` 占位符与字面量片段拆开：
//! - `?` 为位置占位符
//! - `??` 表示字面量 `?`（例如 PostgreSQL 的 JSON 运算符）
//! - `%` 等其他字符一律按字面量保留
//!
//! 回填时只拼接片段，绑定值中的 `?`、`%` 不会被再次扫描。

use crate::error::{QueryLogError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder,
}

/// 拆分后的 SQL 模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTemplate {
    segments: Vec<Segment>,
    placeholders: usize,
}

impl SqlTemplate {
    /// 扫描 SQL 文本生成模板
    pub fn parse(sql: &str) -> Self {
        let mut segments = Vec::new();
        let mut placeholders = 0;
        let mut literal = String::with_capacity(sql.len());
        let mut chars = sql.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '?' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'?') {
                chars.next();
                literal.push('?');
                continue;
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder);
            placeholders += 1;
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments, placeholders }
    }

    /// 占位符数量
    pub fn placeholder_count(&self) -> usize {
        self.placeholders
    }

    /// 不回填绑定参数，占位符原样输出为 `?`，`??` 仍还原为字面量 `?`
    pub fn render_unbound(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Placeholder => "?",
            })
            .collect()
    }

    /// 按位置回填已转义的字面量
    ///
    /// 数量与占位符数量不一致时返回 [`QueryLogError::FormatMismatch`]。
    pub fn fill<S: AsRef<str>>(&self, literals: &[S]) -> Result<String> {
        if literals.len() != self.placeholders {
            return Err(QueryLogError::format_mismatch(
                self.placeholders,
                literals.len(),
            ));
        }

        let capacity = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                Segment::Placeholder => 0,
            })
            .sum::<usize>()
            + literals.iter().map(|l| l.as_ref().len()).sum::<usize>();

        let mut out = String::with_capacity(capacity);
        let mut values = literals.iter();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder => {
                    if let Some(value) = values.next() {
                        out.push_str(value.as_ref());
                    }
                }
            }
        }
        Ok(out)
    }
}
