//! 图 Schema 模型
//!
//! 顶点标签、边标签、属性与边的端点关系。构建完成后只读，可在线程间共享。

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::error::{SchemaError, SchemaResult};
use crate::core::types::{ElementKind, LabelEntry, LabelRef, LabelType};
use crate::schema::label::{EdgeLabel, PropertyDef, Relation, VertexLabel};

/// 属性 ID 模式，每个 Schema 实例选定一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IdMode {
    /// 属性 ID 是数据源给出的列 ID
    ColumnId,
    /// 属性按名称识别，ID 在标签内按位置分配
    #[default]
    PropertyName,
}

/// 执行层访问属性时使用的键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Id(i32),
    Name(String),
}

/// Schema 结构指纹，结构相同的 Schema 指纹相同
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion(pub u64);

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{:016x}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct GraphSchema {
    id_mode: IdMode,
    vertex_labels: Vec<VertexLabel>,
    edge_labels: Vec<EdgeLabel>,
    vertex_index: HashMap<String, usize>,
    edge_index: HashMap<String, usize>,
}

/// 结构相等：只比较标签集合、属性与关系，不比较 ID 模式
impl PartialEq for GraphSchema {
    fn eq(&self, other: &Self) -> bool {
        self.vertex_labels == other.vertex_labels && self.edge_labels == other.edge_labels
    }
}

impl Eq for GraphSchema {}

impl GraphSchema {
    pub fn builder() -> GraphSchemaBuilder {
        GraphSchemaBuilder::new()
    }

    pub fn id_mode(&self) -> IdMode {
        self.id_mode
    }

    pub fn vertex_label(&self, name: &str) -> SchemaResult<&VertexLabel> {
        self.vertex_index
            .get(name)
            .map(|&idx| &self.vertex_labels[idx])
            .ok_or_else(|| {
                SchemaError::type_not_found(ElementKind::Vertex, name, self.vertex_label_names())
            })
    }

    pub fn vertex_label_by_id(&self, id: i32) -> SchemaResult<&VertexLabel> {
        self.vertex_labels
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| {
                SchemaError::type_not_found(
                    ElementKind::Vertex,
                    format!("#{}", id),
                    self.vertex_label_names(),
                )
            })
    }

    pub fn edge_label(&self, name: &str) -> SchemaResult<&EdgeLabel> {
        self.edge_index
            .get(name)
            .map(|&idx| &self.edge_labels[idx])
            .ok_or_else(|| {
                SchemaError::type_not_found(ElementKind::Edge, name, self.edge_label_names())
            })
    }

    pub fn edge_label_by_id(&self, id: i32) -> SchemaResult<&EdgeLabel> {
        self.edge_labels
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| {
                SchemaError::type_not_found(
                    ElementKind::Edge,
                    format!("#{}", id),
                    self.edge_label_names(),
                )
            })
    }

    /// 标签名属于顶点还是边
    pub fn element_kind_of(&self, name: &str) -> Option<ElementKind> {
        if self.vertex_index.contains_key(name) {
            Some(ElementKind::Vertex)
        } else if self.edge_index.contains_key(name) {
            Some(ElementKind::Edge)
        } else {
            None
        }
    }

    /// 标签上定义的属性列表，标签可以是顶点或边
    pub fn properties_of(&self, label: &str) -> SchemaResult<&[PropertyDef]> {
        match self.element_kind_of(label) {
            Some(ElementKind::Vertex) => Ok(&self.vertex_label(label)?.properties),
            Some(ElementKind::Edge) => Ok(&self.edge_label(label)?.properties),
            None => {
                let mut available = self.vertex_label_names();
                available.extend(self.edge_label_names());
                Err(SchemaError::type_not_found(ElementKind::Vertex, label, available))
            }
        }
    }

    pub fn property_id(&self, label: &str, name: &str) -> SchemaResult<i32> {
        let properties = self.properties_of(label)?;
        properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .ok_or_else(|| {
                SchemaError::property_not_found(label, name, properties.iter().map(|p| p.name.clone()))
            })
    }

    pub fn property_name(&self, label: &str, id: i32) -> SchemaResult<&str> {
        let properties = self.properties_of(label)?;
        properties
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
            .ok_or_else(|| {
                SchemaError::property_not_found(
                    label,
                    format!("#{}", id),
                    properties.iter().map(|p| p.name.clone()),
                )
            })
    }

    /// 按 ID 模式给出属性访问键
    pub fn property_key(&self, label: &str, name: &str) -> SchemaResult<PropertyKey> {
        let id = self.property_id(label, name)?;
        Ok(match self.id_mode {
            IdMode::ColumnId => PropertyKey::Id(id),
            IdMode::PropertyName => PropertyKey::Name(name.to_string()),
        })
    }

    pub fn relations_of(&self, edge_label: &str) -> SchemaResult<&[Relation]> {
        Ok(&self.edge_label(edge_label)?.relations)
    }

    /// 连接给定顶点对的全部边标签
    pub fn relations_between(&self, src: &str, dst: &str) -> Vec<&EdgeLabel> {
        self.edge_labels
            .iter()
            .filter(|e| e.relations.iter().any(|r| r.src.name == src && r.dst.name == dst))
            .collect()
    }

    pub fn all_vertex_labels(&self) -> &[VertexLabel] {
        &self.vertex_labels
    }

    pub fn all_edge_labels(&self) -> &[EdgeLabel] {
        &self.edge_labels
    }

    pub fn vertex_label_names(&self) -> Vec<String> {
        self.vertex_labels.iter().map(|v| v.name.clone()).collect()
    }

    pub fn edge_label_names(&self) -> Vec<String> {
        self.edge_labels.iter().map(|e| e.name.clone()).collect()
    }

    /// 全部顶点标签组成的标签类型；没有顶点标签时返回 None
    pub fn all_vertices_type(&self) -> Option<LabelType> {
        LabelType::vertices(self.vertex_labels.iter().map(|v| v.label_ref()))
    }

    /// 给定边标签的全部关系条目组成的标签类型
    pub fn edge_type_of<'a>(
        &self,
        labels: impl IntoIterator<Item = &'a EdgeLabel>,
    ) -> Option<LabelType> {
        LabelType::from_entries(labels.into_iter().flat_map(|e| {
            let label = e.label_ref();
            e.relations
                .iter()
                .map(move |r| LabelEntry::edge(label.clone(), r.src.clone(), r.dst.clone()))
        }))
    }

    /// 全部边关系组成的标签类型
    pub fn all_edges_type(&self) -> Option<LabelType> {
        self.edge_type_of(self.edge_labels.iter())
    }

    pub fn fingerprint(&self) -> SchemaVersion {
        let mut hasher = DefaultHasher::new();
        self.vertex_labels.hash(&mut hasher);
        self.edge_labels.hash(&mut hasher);
        SchemaVersion(hasher.finish())
    }
}

/// Schema 构建器，负责校验与补全
#[derive(Debug, Default)]
pub struct GraphSchemaBuilder {
    id_mode: IdMode,
    vertex_labels: Vec<VertexLabel>,
    edge_labels: Vec<EdgeLabel>,
}

impl GraphSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_mode(mut self, mode: IdMode) -> Self {
        self.id_mode = mode;
        self
    }

    pub fn add_vertex_label(mut self, label: VertexLabel) -> Self {
        self.vertex_labels.push(label);
        self
    }

    pub fn add_edge_label(mut self, label: EdgeLabel) -> Self {
        self.edge_labels.push(label);
        self
    }

    pub fn build(self) -> SchemaResult<GraphSchema> {
        let id_mode = self.id_mode;
        let mut vertex_labels = self.vertex_labels;
        let mut edge_labels = self.edge_labels;

        check_unique_labels(
            ElementKind::Vertex,
            vertex_labels.iter().map(|v| (v.id, v.name.as_str())),
        )?;
        check_unique_labels(
            ElementKind::Edge,
            edge_labels.iter().map(|e| (e.id, e.name.as_str())),
        )?;

        let vertex_names: HashMap<String, i32> = vertex_labels
            .iter()
            .map(|v| (v.name.clone(), v.id))
            .collect();
        if let Some(clash) = edge_labels.iter().find(|e| vertex_names.contains_key(&e.name)) {
            return Err(SchemaError::InvalidSchema(format!(
                "标签名 {} 同时用于顶点和边",
                clash.name
            )));
        }

        for vertex in vertex_labels.iter_mut() {
            assign_property_ids(&vertex.name, &mut vertex.properties, id_mode)?;
            if let Some(missing) = vertex
                .primary_keys
                .iter()
                .find(|k| vertex.properties.iter().all(|p| &p.name != *k))
            {
                return Err(SchemaError::InvalidSchema(format!(
                    "顶点标签 {} 的主键 {} 不是已定义的属性",
                    vertex.name, missing
                )));
            }
        }

        for edge in edge_labels.iter_mut() {
            assign_property_ids(&edge.name, &mut edge.properties, id_mode)?;
            if edge.relations.is_empty() {
                return Err(SchemaError::InvalidSchema(format!(
                    "边标签 {} 至少需要一个端点关系",
                    edge.name
                )));
            }
            let mut seen = HashSet::new();
            for relation in edge.relations.iter_mut() {
                relation.src = resolve_endpoint(&edge.name, &relation.src, &vertex_names)?;
                relation.dst = resolve_endpoint(&edge.name, &relation.dst, &vertex_names)?;
                if !seen.insert((relation.src.id, relation.dst.id)) {
                    return Err(SchemaError::InvalidSchema(format!(
                        "边标签 {} 的关系 {}->{} 重复定义",
                        edge.name, relation.src.name, relation.dst.name
                    )));
                }
            }
            // 关系按端点 ID 排序，声明顺序不影响结构相等
            edge.relations.sort_by_key(|r| (r.src.id, r.dst.id));
        }

        vertex_labels.sort_by_key(|v| v.id);
        edge_labels.sort_by_key(|e| e.id);

        let vertex_index = vertex_labels
            .iter()
            .enumerate()
            .map(|(idx, v)| (v.name.clone(), idx))
            .collect();
        let edge_index = edge_labels
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.name.clone(), idx))
            .collect();

        let schema = GraphSchema {
            id_mode,
            vertex_labels,
            edge_labels,
            vertex_index,
            edge_index,
        };
        log::info!(
            "Schema构建完成: {} 个顶点标签, {} 个边标签, 指纹 {}",
            schema.vertex_labels.len(),
            schema.edge_labels.len(),
            schema.fingerprint()
        );
        Ok(schema)
    }
}

fn check_unique_labels<'a>(
    kind: ElementKind,
    labels: impl Iterator<Item = (i32, &'a str)>,
) -> SchemaResult<()> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for (id, name) in labels {
        if id < 0 {
            return Err(SchemaError::InvalidSchema(format!(
                "{}标签 {} 的ID不能为负数: {}",
                kind, name, id
            )));
        }
        if name.is_empty() {
            return Err(SchemaError::InvalidSchema(format!("{}标签名不能为空", kind)));
        }
        if !ids.insert(id) {
            return Err(SchemaError::InvalidSchema(format!(
                "{}标签ID重复: {}",
                kind, id
            )));
        }
        if !names.insert(name) {
            return Err(SchemaError::InvalidSchema(format!(
                "{}标签名重复: {}",
                kind, name
            )));
        }
    }
    Ok(())
}

fn assign_property_ids(
    owner: &str,
    properties: &mut [PropertyDef],
    id_mode: IdMode,
) -> SchemaResult<()> {
    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    for (position, property) in properties.iter_mut().enumerate() {
        if !names.insert(property.name.clone()) {
            return Err(SchemaError::InvalidSchema(format!(
                "标签 {} 的属性名重复: {}",
                owner, property.name
            )));
        }
        if property.id < 0 {
            match id_mode {
                IdMode::PropertyName => property.id = position as i32,
                IdMode::ColumnId => {
                    return Err(SchemaError::InvalidSchema(format!(
                        "列ID模式下属性 {}.{} 缺少ID",
                        owner, property.name
                    )));
                }
            }
        }
        if !ids.insert(property.id) {
            return Err(SchemaError::InvalidSchema(format!(
                "标签 {} 的属性ID重复: {}",
                owner, property.id
            )));
        }
    }
    Ok(())
}

fn resolve_endpoint(
    edge: &str,
    endpoint: &LabelRef,
    vertex_names: &HashMap<String, i32>,
) -> SchemaResult<LabelRef> {
    let id = vertex_names.get(&endpoint.name).copied().ok_or_else(|| {
        SchemaError::InvalidSchema(format!(
            "边标签 {} 的端点 {} 不是已定义的顶点标签",
            edge, endpoint.name
        ))
    })?;
    if endpoint.is_resolved() && endpoint.id != id {
        return Err(SchemaError::InvalidSchema(format!(
            "边标签 {} 的端点 {} ID不一致: {} != {}",
            edge, endpoint.name, endpoint.id, id
        )));
    }
    Ok(LabelRef::new(id, endpoint.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DataType;

    fn sample_schema(mode: IdMode) -> GraphSchema {
        GraphSchema::builder()
            .id_mode(mode)
            .add_vertex_label(
                VertexLabel::new(0, "PERSON")
                    .with_property(PropertyDef::new("id", DataType::Int64).with_id(0))
                    .with_property(PropertyDef::new("name", DataType::String).with_id(1))
                    .with_primary_keys(vec!["id".to_string()]),
            )
            .add_vertex_label(
                VertexLabel::new(1, "COMMENT")
                    .with_property(PropertyDef::new("id", DataType::Int64).with_id(0)),
            )
            .add_edge_label(
                EdgeLabel::new(0, "KNOWS")
                    .with_property(PropertyDef::new("since", DataType::Date).with_id(3))
                    .with_relation("PERSON", "PERSON"),
            )
            .add_edge_label(EdgeLabel::new(1, "LIKES").with_relation("PERSON", "COMMENT"))
            .build()
            .expect("合法的Schema")
    }

    #[test]
    fn test_label_lookup() {
        let schema = sample_schema(IdMode::PropertyName);
        assert_eq!(schema.vertex_label("PERSON").map(|v| v.id), Ok(0));
        assert_eq!(schema.edge_label_by_id(1).map(|e| e.name.as_str()), Ok("LIKES"));
        assert_eq!(schema.element_kind_of("KNOWS"), Some(ElementKind::Edge));

        let err = schema.vertex_label("PERSN").unwrap_err();
        match err {
            SchemaError::TypeNotFound { available, .. } => {
                assert_eq!(available, vec!["PERSON".to_string(), "COMMENT".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_relations_are_resolved() {
        let schema = sample_schema(IdMode::PropertyName);
        let relations = schema.relations_of("LIKES").expect("存在");
        assert_eq!(relations[0].src, LabelRef::new(0, "PERSON"));
        assert_eq!(relations[0].dst, LabelRef::new(1, "COMMENT"));
        assert_eq!(schema.relations_between("PERSON", "PERSON").len(), 1);
        assert!(schema.relations_between("COMMENT", "PERSON").is_empty());
    }

    #[test]
    fn test_property_lookup_and_key() {
        let schema = sample_schema(IdMode::ColumnId);
        assert_eq!(schema.property_id("KNOWS", "since"), Ok(3));
        assert_eq!(schema.property_name("PERSON", 1), Ok("name"));
        assert_eq!(schema.property_key("KNOWS", "since"), Ok(PropertyKey::Id(3)));

        let by_name = sample_schema(IdMode::PropertyName);
        assert_eq!(
            by_name.property_key("PERSON", "name"),
            Ok(PropertyKey::Name("name".to_string()))
        );
        assert!(matches!(
            by_name.property_id("PERSON", "age"),
            Err(SchemaError::PropertyNotFound { .. })
        ));
    }

    #[test]
    fn test_structural_equality_ignores_id_mode() {
        let a = sample_schema(IdMode::ColumnId);
        let b = sample_schema(IdMode::PropertyName);
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_property_name_mode_assigns_positional_ids() {
        let schema = GraphSchema::builder()
            .add_vertex_label(
                VertexLabel::new(0, "POST")
                    .with_property(PropertyDef::new("id", DataType::Int64))
                    .with_property(PropertyDef::new("content", DataType::String)),
            )
            .build()
            .expect("合法的Schema");
        assert_eq!(schema.property_id("POST", "content"), Ok(1));
    }

    #[test]
    fn test_column_id_mode_requires_ids() {
        let result = GraphSchema::builder()
            .id_mode(IdMode::ColumnId)
            .add_vertex_label(
                VertexLabel::new(0, "POST").with_property(PropertyDef::new("id", DataType::Int64)),
            )
            .build();
        assert!(matches!(result, Err(SchemaError::InvalidSchema(_))));
    }

    #[test]
    fn test_invalid_schemas_are_rejected() {
        let unknown_endpoint = GraphSchema::builder()
            .add_vertex_label(VertexLabel::new(0, "PERSON"))
            .add_edge_label(EdgeLabel::new(0, "KNOWS").with_relation("PERSON", "ROBOT"))
            .build();
        assert!(matches!(unknown_endpoint, Err(SchemaError::InvalidSchema(_))));

        let no_relation = GraphSchema::builder()
            .add_vertex_label(VertexLabel::new(0, "PERSON"))
            .add_edge_label(EdgeLabel::new(0, "KNOWS"))
            .build();
        assert!(matches!(no_relation, Err(SchemaError::InvalidSchema(_))));

        let duplicate_id = GraphSchema::builder()
            .add_vertex_label(VertexLabel::new(0, "PERSON"))
            .add_vertex_label(VertexLabel::new(0, "POST"))
            .build();
        assert!(matches!(duplicate_id, Err(SchemaError::InvalidSchema(_))));

        let shared_name = GraphSchema::builder()
            .add_vertex_label(VertexLabel::new(0, "PERSON"))
            .add_edge_label(EdgeLabel::new(0, "PERSON").with_relation("PERSON", "PERSON"))
            .build();
        assert!(matches!(shared_name, Err(SchemaError::InvalidSchema(_))));

        let bad_primary_key = GraphSchema::builder()
            .add_vertex_label(
                VertexLabel::new(0, "PERSON").with_primary_keys(vec!["id".to_string()]),
            )
            .build();
        assert!(matches!(bad_primary_key, Err(SchemaError::InvalidSchema(_))));
    }

    #[test]
    fn test_relation_order_does_not_affect_equality() {
        let build = |relations: [(&str, &str); 2]| {
            let mut edge = EdgeLabel::new(0, "REPLYOF");
            for (src, dst) in relations {
                edge = edge.with_relation(src, dst);
            }
            GraphSchema::builder()
                .add_vertex_label(VertexLabel::new(0, "COMMENT"))
                .add_vertex_label(VertexLabel::new(1, "POST"))
                .add_edge_label(edge)
                .build()
                .expect("合法的Schema")
        };
        let a = build([("COMMENT", "POST"), ("COMMENT", "COMMENT")]);
        let b = build([("COMMENT", "COMMENT"), ("COMMENT", "POST")]);

        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        let relations = a.relations_of("REPLYOF").expect("存在");
        assert_eq!(relations[0].dst, LabelRef::new(0, "COMMENT"));
        assert_eq!(relations[1].dst, LabelRef::new(1, "POST"));
    }

    #[test]
    fn test_all_edges_type_expands_relations() {
        let schema = sample_schema(IdMode::PropertyName);
        let all_edges = schema.all_edges_type().expect("存在边标签");
        assert_eq!(all_edges.len(), 2);
        assert!(all_edges.is_edge());
        assert_eq!(schema.all_vertices_type().map(|t| t.len()), Some(2));
    }
}
