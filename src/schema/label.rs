//! 标签与属性定义

use serde::{Deserialize, Serialize};

use crate::core::types::{DataType, LabelRef};

/// 属性定义
///
/// id 为负数表示尚未分配，由 Schema 构建器按 ID 模式补全
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyDef {
    pub id: i32,
    pub name: String,
    pub data_type: DataType,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: -1,
            name: name.into(),
            data_type,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

/// 顶点标签
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexLabel {
    pub id: i32,
    pub name: String,
    pub properties: Vec<PropertyDef>,
    pub primary_keys: Vec<String>,
}

impl VertexLabel {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            properties: Vec::new(),
            primary_keys: Vec::new(),
        }
    }

    pub fn with_properties(mut self, properties: Vec<PropertyDef>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_primary_keys(mut self, keys: Vec<String>) -> Self {
        self.primary_keys = keys;
        self
    }

    pub fn label_ref(&self) -> LabelRef {
        LabelRef::new(self.id, self.name.clone())
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }
}

/// 边标签可连接的一对顶点标签
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relation {
    pub src: LabelRef,
    pub dst: LabelRef,
}

impl Relation {
    pub fn new(src: LabelRef, dst: LabelRef) -> Self {
        Self { src, dst }
    }
}

/// 边标签
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeLabel {
    pub id: i32,
    pub name: String,
    pub properties: Vec<PropertyDef>,
    pub relations: Vec<Relation>,
}

impl EdgeLabel {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            properties: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn with_properties(mut self, properties: Vec<PropertyDef>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// 按名称追加关系，顶点标签 ID 在构建 Schema 时解析
    pub fn with_relation(mut self, src: impl Into<String>, dst: impl Into<String>) -> Self {
        self.relations
            .push(Relation::new(LabelRef::unresolved(src), LabelRef::unresolved(dst)));
        self
    }

    pub fn label_ref(&self) -> LabelRef {
        LabelRef::new(self.id, self.name.clone())
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }
}
