//! 查询编译核心
//!
//! 解析器调用构建器描述模式与关系算子，构建器借助验证器完成类型推导，
//! 常量折叠负责过滤条件的融合规则

pub mod optimizer;
pub mod planner;
pub mod validator;

pub use planner::{LabelSelector, LogicalPlan, LogicalPlanBuilder, PathExpandSpec};
pub use validator::{InferenceReport, TypeInference};
