//! 绑定参数与转义
//!
//! `Binding` 是驱动层交给拦截器的绑定值；`ValueQuoter` 由连接提供，
//! 负责把绑定值转成 SQL 字面量。

use crate::error::{QueryLogError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// 日期时间绑定值的格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 单个绑定参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Binding {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
}

impl Binding {
    /// 预处理绑定值：布尔转为 0/1，日期时间按 [`DATETIME_FORMAT`] 转为字符串
    pub fn prepare(&self) -> Binding {
        match self {
            Binding::Bool(b) => Binding::Int(i64::from(*b)),
            Binding::DateTime(dt) => {
                Binding::Text(dt.format(DATETIME_FORMAT).to_string())
            }
            other => other.clone(),
        }
    }
}

impl From<i64> for Binding {
    fn from(v: i64) -> Self {
        Binding::Int(v)
    }
}

impl From<i32> for Binding {
    fn from(v: i32) -> Self {
        Binding::Int(i64::from(v))
    }
}

impl From<f64> for Binding {
    fn from(v: f64) -> Self {
        Binding::Float(v)
    }
}

impl From<bool> for Binding {
    fn from(v: bool) -> Self {
        Binding::Bool(v)
    }
}

impl From<&str> for Binding {
    fn from(v: &str) -> Self {
        Binding::Text(v.to_string())
    }
}

impl From<String> for Binding {
    fn from(v: String) -> Self {
        Binding::Text(v)
    }
}

impl From<NaiveDateTime> for Binding {
    fn from(v: NaiveDateTime) -> Self {
        Binding::DateTime(v)
    }
}

impl<T: Into<Binding>> From<Option<T>> for Binding {
    fn from(v: Option<T>) -> Self {
        v.map_or(Binding::Null, Into::into)
    }
}

/// 把绑定值转成 SQL 字面量的能力，由数据库连接提供
pub trait ValueQuoter: Send + Sync {
    fn quote(&self, value: &Binding) -> Result<String>;
}

/// 通用 SQL 转义：字符串单引号包裹且内部单引号加倍，数值原样输出
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardQuoter;

impl ValueQuoter for StandardQuoter {
    fn quote(&self, value: &Binding) -> Result<String> {
        match value {
            Binding::Null => Ok("NULL".to_string()),
            Binding::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
            Binding::Int(i) => Ok(i.to_string()),
            Binding::Float(f) if f.is_finite() => Ok(f.to_string()),
            Binding::Float(f) => {
                Err(QueryLogError::other(format!("无法表示为 SQL 字面量的浮点数: {f}")))
            }
            Binding::Text(s) => Ok(quote_str(s)),
            Binding::DateTime(dt) => {
                Ok(quote_str(&dt.format(DATETIME_FORMAT).to_string()))
            }
            Binding::Bytes(bytes) => {
                let mut out = String::with_capacity(bytes.len() * 2 + 3);
                out.push_str("X'");
                for b in bytes {
                    let _ = write!(out, "{b:02X}");
                }
                out.push('\'');
                Ok(out)
            }
        }
    }
}

fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
