//! 属性数据类型标签
//!
//! Schema 中属性声明使用的类型标签，与通用类型描述符之间的互转
//! 见 `schema::converter`

use serde::{Deserialize, Serialize};
use std::fmt;

/// 属性数据类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float,
    Double,
    /// 定长字符串
    Char(u32),
    /// 变长字符串（带最大长度）
    Varchar(u32),
    /// 无界字符串
    String,
    Date,
    Time,
    Timestamp,
    Decimal { precision: u8, scale: u8 },
    Array(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
}

impl DataType {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                DataType::Float | DataType::Double | DataType::Decimal { .. }
            )
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self,
            DataType::Char(_) | DataType::Varchar(_) | DataType::String
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Date | DataType::Time | DataType::Timestamp)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "BOOL"),
            DataType::Int8 => write!(f, "INT8"),
            DataType::Int16 => write!(f, "INT16"),
            DataType::Int32 => write!(f, "INT32"),
            DataType::Int64 => write!(f, "INT64"),
            DataType::UInt32 => write!(f, "UINT32"),
            DataType::UInt64 => write!(f, "UINT64"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Double => write!(f, "DOUBLE"),
            DataType::Char(n) => write!(f, "CHAR({})", n),
            DataType::Varchar(n) => write!(f, "VARCHAR({})", n),
            DataType::String => write!(f, "STRING"),
            DataType::Date => write!(f, "DATE"),
            DataType::Time => write!(f, "TIME"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::Decimal { precision, scale } => {
                write!(f, "DECIMAL({}, {})", precision, scale)
            }
            DataType::Array(inner) => write!(f, "ARRAY<{}>", inner),
            DataType::Map(key, value) => write!(f, "MAP<{}, {}>", key, value),
        }
    }
}
