//! Schema 层错误类型
//!
//! 涵盖标签/属性查找、Schema 构建校验以及 Schema 编解码过程中的错误

use thiserror::Error;

use crate::core::types::ElementKind;

/// Schema 操作结果类型别名
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema 层错误类型
///
/// 查找类错误携带可用的候选项，便于诊断
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("{kind}类型未找到: {name}, 可用类型: [{}]", .available.join(", "))]
    TypeNotFound {
        kind: ElementKind,
        name: String,
        available: Vec<String>,
    },

    #[error("属性未找到: {owner}.{property}, 可用属性: [{}]", .available.join(", "))]
    PropertyNotFound {
        owner: String,
        property: String,
        available: Vec<String>,
    },

    #[error("不支持的类型: {construct}")]
    UnsupportedType { construct: String },

    #[error("无效的Schema定义: {0}")]
    InvalidSchema(String),

    #[error("Schema序列化错误: {0}")]
    Serialization(String),
}

impl SchemaError {
    pub fn type_not_found(
        kind: ElementKind,
        name: impl Into<String>,
        available: impl IntoIterator<Item = String>,
    ) -> Self {
        SchemaError::TypeNotFound {
            kind,
            name: name.into(),
            available: available.into_iter().collect(),
        }
    }

    pub fn property_not_found(
        owner: impl Into<String>,
        property: impl Into<String>,
        available: impl IntoIterator<Item = String>,
    ) -> Self {
        SchemaError::PropertyNotFound {
            owner: owner.into(),
            property: property.into(),
            available: available.into_iter().collect(),
        }
    }

    pub fn unsupported(construct: impl Into<String>) -> Self {
        SchemaError::UnsupportedType {
            construct: construct.into(),
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for SchemaError {
    fn from(err: serde_yaml::Error) -> Self {
        SchemaError::Serialization(err.to_string())
    }
}

impl From<std::str::Utf8Error> for SchemaError {
    fn from(err: std::str::Utf8Error) -> Self {
        SchemaError::Serialization(format!("输入不是合法的UTF-8: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_not_found_lists_alternatives() {
        let err = SchemaError::type_not_found(
            ElementKind::Vertex,
            "PERSN",
            vec!["PERSON".to_string(), "POST".to_string()],
        );
        let message = err.to_string();
        assert!(message.contains("PERSN"));
        assert!(message.contains("PERSON, POST"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SchemaError = parse_err.into();
        assert!(matches!(err, SchemaError::Serialization(_)));
    }
}
