//! 模式验证与类型推导
//!
//! - `pattern` 模式图（别名 -> 顶点，Expand/路径 -> 边）
//! - `type_inference` 工作队列式的约束传播
//! - `property_check` 推导后的属性引用检查
//! - `deduce_type` 表达式结果类型推导

pub mod deduce_type;
pub mod pattern;
pub mod property_check;
pub mod type_inference;

pub use deduce_type::{aggregate_output_type, check_predicate, deduce_type};
pub use pattern::{Pattern, PatternEdge, PatternVertex};
pub use property_check::{check_all, check_property_refs};
pub use type_inference::{ElementReport, InferenceReport, TypeInference, DEFAULT_MAX_INFERENCE_ROUNDS};
