//! 逻辑计划
//!
//! - `plan` 计划节点代数
//! - `alias` 单次编译的别名作用域
//! - `builder` 供解析器调用的构建器 API

pub mod alias;
pub mod builder;
pub mod plan;

pub use alias::AliasScope;
pub use builder::{LabelSelector, LogicalPlanBuilder, PathExpandSpec};
pub use plan::{LogicalPlan, PlanNodeEnum, RowType};
