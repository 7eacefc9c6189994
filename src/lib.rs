//! 数据库查询日志拦截器
//!
//! 监听查询完成事件，把绑定参数回填到 SQL 中，按慢查询阈值、触发器和
//! 子串规则过滤后，以 debug 级别写入指定日志通道：
//!
//! ```text
//! [<数据库名>] [<耗时>] <SQL> | <请求方法>: <请求 URI>
//! ```
//!
//! ```
//! use query_logger::{HttpRequest, MemorySink, QueryEvent, QueryLogConfig, QueryLogInterceptor};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let interceptor = QueryLogInterceptor::new(QueryLogConfig::enabled_on("sql"), sink.clone());
//!
//! let event = QueryEvent::new("select * from t where id = ?", "app")
//!     .with_bindings([42])
//!     .with_elapsed(1.5);
//! let request = HttpRequest::new("GET", "/t/42");
//! interceptor.on_query_executed(&event, Some(&request)).unwrap();
//!
//! assert_eq!(
//!     sink.records()[0].message,
//!     "[app] [1.5ms] select * from t where id = 42 | GET: /t/42"
//! );
//! ```

pub mod config;
pub mod error;
pub mod interceptor;
pub mod observer;
pub mod query;
pub mod request;
pub mod sink;

// 日志初始化 - 需要 logging 功能
#[cfg(feature = "logging")]
pub mod logging;

pub use config::{Config, QueryLogConfig};
pub use error::{QueryLogError, Result};
pub use interceptor::{Outcome, QueryLogInterceptor, SkipReason};
pub use observer::{QueryObserver, QueryObservers};
pub use query::{Binding, QueryEvent, RenderedQuery, ValueQuoter, format_duration};
pub use request::{Environment, HttpRequest, RequestContext};
pub use sink::{LogSink, MemorySink, TracingSink};
