//! 对外错误码定义
//!
//! 错误码格式: XXYY
//! - XX: 错误类别 (01=语法, 03=验证/类型, 05=Schema资源, 09=系统)
//! - YY: 具体错误

use serde::{Deserialize, Serialize};
use std::fmt;

/// 对外错误码
///
/// 错误码一旦定义不应随意修改，保证外层查询服务的兼容性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // ==================== 语法错误 (01xx) ====================
    /// 外部解析器报告的解析错误
    ParseError = 101,

    // ==================== 验证错误 (03xx) ====================
    /// 非法的计划构造（混合标签、越界范围等）
    IllegalPattern = 301,
    /// 别名重复绑定
    DuplicateAlias = 302,
    /// 别名未定义
    AliasNotFound = 303,
    /// 类型不匹配
    TypeMismatch = 304,
    /// 模式类型推导得到空交集
    IncompatiblePattern = 305,

    // ==================== Schema 错误 (05xx) ====================
    /// 标签不存在
    TypeNotFound = 501,
    /// 属性不存在
    PropertyNotFound = 502,
    /// 不支持的类型构造
    UnsupportedType = 503,
    /// Schema 定义无效
    InvalidSchema = 504,

    // ==================== 系统错误 (09xx) ====================
    /// 内部错误
    InternalError = 900,
}

impl ErrorCode {
    /// 错误码数值
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// 错误类别名称
    pub fn category(&self) -> &'static str {
        match self.as_i32() / 100 {
            1 => "syntax",
            3 => "validation",
            5 => "schema",
            _ => "system",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.as_i32())
    }
}
