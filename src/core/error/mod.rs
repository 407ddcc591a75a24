//! 统一错误处理系统
//!
//! ## 设计理念
//!
//! 1. **分层**：Schema 层错误（`SchemaError`）与计划层错误（`PlanError`）各自独立，
//!    通过 `#[from]` 汇聚到 `CompileError`
//! 2. **同步失败**：所有错误都是编译期错误，直接返回给构建器/推导 API 的调用方，
//!    核心内部不做恢复或重试
//! 3. **统一接口**：`CompileResult<T>` 作为对外的统一返回类型

use thiserror::Error;

pub mod codes;
pub mod plan;
pub mod schema;

pub use codes::ErrorCode;
pub use plan::{PlanError, PlanResult};
pub use schema::{SchemaError, SchemaResult};

/// 统一的编译错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Schema错误: {0}")]
    Schema(#[from] SchemaError),

    #[error("计划错误: {0}")]
    Plan(#[from] PlanError),

    #[error("解析错误: {0}")]
    Parse(String),
}

/// 统一的结果类型
pub type CompileResult<T> = Result<T, CompileError>;

impl CompileError {
    pub fn parse(message: impl Into<String>) -> Self {
        CompileError::Parse(message.into())
    }

    /// 映射为对外错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::Schema(se) => schema_code(se),
            CompileError::Plan(pe) => match pe {
                PlanError::IllegalPattern(_) => ErrorCode::IllegalPattern,
                PlanError::DuplicateAlias(_) => ErrorCode::DuplicateAlias,
                PlanError::AliasNotFound(_) => ErrorCode::AliasNotFound,
                PlanError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
                PlanError::IncompatiblePattern { .. } => ErrorCode::IncompatiblePattern,
                PlanError::PropertyNotFound { .. } => ErrorCode::PropertyNotFound,
                PlanError::Schema(se) => schema_code(se),
                PlanError::Internal(_) => ErrorCode::InternalError,
            },
            CompileError::Parse(_) => ErrorCode::ParseError,
        }
    }
}

fn schema_code(err: &SchemaError) -> ErrorCode {
    match err {
        SchemaError::TypeNotFound { .. } => ErrorCode::TypeNotFound,
        SchemaError::PropertyNotFound { .. } => ErrorCode::PropertyNotFound,
        SchemaError::UnsupportedType { .. } => ErrorCode::UnsupportedType,
        SchemaError::InvalidSchema(_) => ErrorCode::InvalidSchema,
        SchemaError::Serialization(_) => ErrorCode::InvalidSchema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ElementKind;

    #[test]
    fn test_compile_error_creation() {
        let schema_err = SchemaError::type_not_found(ElementKind::Edge, "LIKES", Vec::new());
        let err: CompileError = schema_err.into();
        assert!(matches!(err, CompileError::Schema(_)));
        assert_eq!(err.code(), ErrorCode::TypeNotFound);
    }

    #[test]
    fn test_nested_schema_error_code() {
        let plan_err: PlanError = SchemaError::unsupported("map").into();
        let err: CompileError = plan_err.into();
        assert_eq!(err.code(), ErrorCode::UnsupportedType);
    }

    #[test]
    fn test_parse_error_code() {
        let err = CompileError::parse("unexpected token");
        assert_eq!(err.code(), ErrorCode::ParseError);
        assert!(err.to_string().contains("unexpected token"));
    }
}
