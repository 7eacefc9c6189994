//! 查询观察者注册点
//!
//! 数据访问层在每条语句执行完成后调用 [`QueryObservers::dispatch`]，
//! 已注册的观察者依次收到同一个事件。

use crate::error::{QueryLogError, Result};
use crate::interceptor::QueryLogInterceptor;
use crate::query::QueryEvent;
use crate::request::RequestContext;
use std::fmt;
use std::sync::Arc;

/// 观察错误的 tracing target，与查询日志分开，避免重入
pub const OBSERVER_TARGET: &str = "query_logger::observer";

/// 查询完成事件的观察者
pub trait QueryObserver: Send + Sync {
    fn query_executed(
        &self,
        event: &QueryEvent,
        request: Option<&dyn RequestContext>,
    ) -> Result<()>;
}

impl QueryObserver for QueryLogInterceptor {
    fn query_executed(
        &self,
        event: &QueryEvent,
        request: Option<&dyn RequestContext>,
    ) -> Result<()> {
        self.on_query_executed(event, request).map(|_| ())
    }
}

/// 观察者列表
#[derive(Default, Clone)]
pub struct QueryObservers {
    observers: Vec<Arc<dyn QueryObserver>>,
}

impl fmt::Debug for QueryObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryObservers")
            .field("len", &self.observers.len())
            .finish()
    }
}

impl QueryObservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个观察者
    pub fn register(&mut self, observer: Arc<dyn QueryObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// 通知所有观察者
    ///
    /// 单个观察者失败不影响其他观察者，也不会中断查询执行；
    /// 失败会以 error 级别写到 [`OBSERVER_TARGET`]，并返回给宿主自行上报。
    pub fn dispatch(
        &self,
        event: &QueryEvent,
        request: Option<&dyn RequestContext>,
    ) -> Vec<QueryLogError> {
        let mut errors = Vec::new();
        for observer in &self.observers {
            if let Err(err) = observer.query_executed(event, request) {
                tracing::error!(
                    target: OBSERVER_TARGET,
                    database = %event.database_name,
                    error = %err,
                    "查询观察者处理失败"
                );
                errors.push(err);
            }
        }
        errors
    }
}
