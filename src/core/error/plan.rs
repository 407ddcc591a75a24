//! 计划构建与类型推导错误类型
//!
//! 构建器在推导之前报告结构性错误（IllegalPattern / DuplicateAlias），
//! 推导引擎报告空交集（IncompatiblePattern）

use thiserror::Error;

use crate::core::error::schema::SchemaError;

/// 计划构建结果类型别名
pub type PlanResult<T> = Result<T, PlanError>;

/// 计划构建与类型推导错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("非法的模式: {0}")]
    IllegalPattern(String),

    #[error("别名重复绑定: {0}")]
    DuplicateAlias(String),

    #[error("别名未定义: {0}")]
    AliasNotFound(String),

    #[error("类型不匹配: 期望 {expected}, 实际 {actual} ({context})")]
    TypeMismatch {
        expected: String,
        actual: String,
        context: String,
    },

    #[error("模式类型不兼容: {left} 与 {right} 没有交集, 冲突边: {edge}")]
    IncompatiblePattern {
        left: String,
        right: String,
        edge: String,
    },

    #[error("属性未找到: {alias}.{property}, 可用属性: [{}]", .available.join(", "))]
    PropertyNotFound {
        alias: String,
        property: String,
        available: Vec<String>,
    },

    #[error("Schema错误: {0}")]
    Schema(#[from] SchemaError),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl PlanError {
    pub fn illegal(message: impl Into<String>) -> Self {
        PlanError::IllegalPattern(message.into())
    }

    pub fn type_mismatch(
        expected: impl ToString,
        actual: impl ToString,
        context: impl Into<String>,
    ) -> Self {
        PlanError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
            context: context.into(),
        }
    }

    pub fn incompatible(left: impl ToString, right: impl ToString, edge: impl ToString) -> Self {
        PlanError::IncompatiblePattern {
            left: left.to_string(),
            right: right.to_string(),
            edge: edge.to_string(),
        }
    }
}
