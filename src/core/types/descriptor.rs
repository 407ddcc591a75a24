//! 通用类型描述符代数
//!
//! 每个计划节点的输出列都携带一个类型描述符。标量/容器类型对应属性数据类型，
//! 图元素类型（顶点/边/路径）包装标签类型以及当前有效的属性列表。
//!
//! 描述符一经创建即不可变；类型推导通过构造新的描述符来“收窄”类型。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::label_type::{ElementKind, LabelType};

/// 标量类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    Integer { bits: u8, signed: bool },
    Float,
    Double,
    Char(u32),
    Varchar(u32),
    Text,
    Date,
    Time,
    Timestamp,
    Decimal { precision: u8, scale: u8 },
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Bool => write!(f, "BOOLEAN"),
            ScalarType::Integer { bits, signed: true } => write!(f, "INT{}", bits),
            ScalarType::Integer { bits, signed: false } => write!(f, "UINT{}", bits),
            ScalarType::Float => write!(f, "FLOAT"),
            ScalarType::Double => write!(f, "DOUBLE"),
            ScalarType::Char(n) => write!(f, "CHAR({})", n),
            ScalarType::Varchar(n) => write!(f, "VARCHAR({})", n),
            ScalarType::Text => write!(f, "TEXT"),
            ScalarType::Date => write!(f, "DATE"),
            ScalarType::Time => write!(f, "TIME"),
            ScalarType::Timestamp => write!(f, "TIMESTAMP"),
            ScalarType::Decimal { precision, scale } => {
                write!(f, "DECIMAL({}, {})", precision, scale)
            }
        }
    }
}

/// 记录字段（图元素上的属性）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordField {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl RecordField {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// 图元素记录类型
///
/// 属性列表是当前所有有效标签条目上都存在的属性（模糊类型取交集）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphRecordType {
    label_type: LabelType,
    properties: Vec<RecordField>,
}

impl GraphRecordType {
    pub fn new(label_type: LabelType, properties: Vec<RecordField>) -> Self {
        Self {
            label_type,
            properties,
        }
    }

    pub fn label_type(&self) -> &LabelType {
        &self.label_type
    }

    pub fn properties(&self) -> &[RecordField] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&RecordField> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }
}

/// 路径跳数范围 [lower, upper)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathRange {
    pub lower: u32,
    pub upper: u32,
}

impl PathRange {
    pub fn new(lower: u32, upper: u32) -> Self {
        Self { lower, upper }
    }

    /// 是否允许零长路径
    pub fn allows_zero(&self) -> bool {
        self.lower == 0
    }

    /// 是否恰好一跳
    pub fn is_single_hop(&self) -> bool {
        self.lower == 1 && self.upper == 2
    }
}

impl fmt::Display for PathRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

/// 路径类型：重复的 Expand + GetV 及其跳数范围
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathType {
    pub expand: GraphRecordType,
    pub get_v: GraphRecordType,
    pub range: PathRange,
}

/// 类型描述符
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// 不受约束的类型（如 null 字面量、未知函数返回值）
    Any,
    Scalar(ScalarType),
    Array(Box<TypeDescriptor>),
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Vertex(GraphRecordType),
    Edge(GraphRecordType),
    Path(Box<PathType>),
}

impl TypeDescriptor {
    pub fn boolean() -> Self {
        TypeDescriptor::Scalar(ScalarType::Bool)
    }

    pub fn bigint() -> Self {
        TypeDescriptor::Scalar(ScalarType::Integer {
            bits: 64,
            signed: true,
        })
    }

    pub fn double() -> Self {
        TypeDescriptor::Scalar(ScalarType::Double)
    }

    pub fn text() -> Self {
        TypeDescriptor::Scalar(ScalarType::Text)
    }

    pub fn date() -> Self {
        TypeDescriptor::Scalar(ScalarType::Date)
    }

    /// 由记录类型构造图元素描述符，种类由标签类型决定
    pub fn graph_element(record: GraphRecordType) -> Self {
        match record.label_type().kind() {
            ElementKind::Vertex => TypeDescriptor::Vertex(record),
            ElementKind::Edge => TypeDescriptor::Edge(record),
        }
    }

    pub fn path(path: PathType) -> Self {
        TypeDescriptor::Path(Box::new(path))
    }

    /// 顶点/边的记录类型
    pub fn record(&self) -> Option<&GraphRecordType> {
        match self {
            TypeDescriptor::Vertex(r) | TypeDescriptor::Edge(r) => Some(r),
            _ => None,
        }
    }

    /// 顶点/边的标签类型
    pub fn label_type(&self) -> Option<&LabelType> {
        self.record().map(|r| r.label_type())
    }

    pub fn element_kind(&self) -> Option<ElementKind> {
        match self {
            TypeDescriptor::Vertex(_) => Some(ElementKind::Vertex),
            TypeDescriptor::Edge(_) => Some(ElementKind::Edge),
            _ => None,
        }
    }

    pub fn is_graph_element(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Vertex(_) | TypeDescriptor::Edge(_) | TypeDescriptor::Path(_)
        )
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeDescriptor::Scalar(ScalarType::Bool))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Scalar(
                ScalarType::Integer { .. }
                    | ScalarType::Float
                    | ScalarType::Double
                    | ScalarType::Decimal { .. }
            )
        )
    }

    pub fn is_any(&self) -> bool {
        matches!(self, TypeDescriptor::Any)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Any => write!(f, "ANY"),
            TypeDescriptor::Scalar(s) => write!(f, "{}", s),
            TypeDescriptor::Array(inner) => write!(f, "ARRAY<{}>", inner),
            TypeDescriptor::Map(k, v) => write!(f, "MAP<{}, {}>", k, v),
            TypeDescriptor::Vertex(r) => write!(f, "VERTEX{}", r.label_type()),
            TypeDescriptor::Edge(r) => write!(f, "EDGE{}", r.label_type()),
            TypeDescriptor::Path(p) => write!(
                f,
                "PATH<{}, {}>{}",
                p.expand.label_type(),
                p.get_v.label_type(),
                p.range
            ),
        }
    }
}
