//! GraphPlan - 图查询逻辑计划编译核心
//!
//! 把外部解析器给出的模式与关系算子编译为带完整类型的逻辑计划：
//! Schema 类型模型、计划节点代数、基于工作队列的标签推导，以及查询计划缓存。

pub mod cache;
pub mod config;
pub mod core;
pub mod query;
pub mod schema;
pub mod utils;

pub use crate::cache::{PlanCacheKey, QueryPlanCache};
pub use crate::config::Config;
pub use crate::core::error::{CompileError, CompileResult, ErrorCode};
pub use crate::query::{LabelSelector, LogicalPlan, LogicalPlanBuilder, PathExpandSpec};
pub use crate::schema::GraphSchema;
