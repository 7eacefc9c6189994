//! 查询渲染模块
//!
//! 提供查询事件、绑定参数转义、占位符回填和耗时格式化

pub mod binding;
pub mod duration;
pub mod template;
pub mod types;

// 重新导出核心类型和函数
pub use binding::{Binding, StandardQuoter, ValueQuoter};
pub use duration::format_duration;
pub use template::SqlTemplate;
pub use types::{QueryEvent, RenderedQuery};
