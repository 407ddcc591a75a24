//! 核心模块
//!
//! 错误体系、类型系统与字面量值

pub mod error;
pub mod types;
pub mod value;

pub use error::{
    CompileError, CompileResult, ErrorCode, PlanError, PlanResult, SchemaError, SchemaResult,
};
pub use types::*;
pub use value::Value;
