// 核心类型系统模块
//
// 包含属性数据类型、图标签类型、通用类型描述符、表达式与操作符定义

pub mod data_type;
pub mod descriptor;
pub mod expression;
pub mod graph;
pub mod label_type;
pub mod operators;

pub use data_type::DataType;
pub use descriptor::{GraphRecordType, PathRange, PathType, RecordField, ScalarType, TypeDescriptor};
pub use expression::Expression;
pub use graph::{EdgeDirection, GetVOpt, OrderDirection, PathSemantics, ResultSemantics};
pub use label_type::{ElementKind, LabelEntry, LabelRef, LabelType};
pub use operators::{AggregateFunction, BinaryOperator, UnaryOperator};
