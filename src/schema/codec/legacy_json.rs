//! 旧版 JSON Schema 格式
//!
//! ```json
//! {
//!   "entities": [{"label": "PERSON", "label_id": 0, "columns": [...]}],
//!   "relations": [{"label": "KNOWS", "label_id": 0, "columns": [...],
//!                  "entity_pairs": [{"src": {"id": 0, "name": "PERSON"}, "dst": {...}}]}],
//!   "is_column_id": false
//! }
//! ```
//!
//! 该格式没有 decimal、map、定长/变长字符串、8/16 位整数与无符号整数

use serde::{Deserialize, Serialize};

use super::{SchemaCodec, SchemaEncoding};
use crate::core::error::{SchemaError, SchemaResult};
use crate::core::types::{DataType, LabelRef};
use crate::schema::graph_schema::{GraphSchema, IdMode};
use crate::schema::label::{EdgeLabel, PropertyDef, Relation, VertexLabel};

#[derive(Debug, Serialize, Deserialize)]
struct LegacyDocument {
    #[serde(default)]
    entities: Vec<LegacyEntity>,
    #[serde(default)]
    relations: Vec<LegacyRelation>,
    #[serde(default)]
    is_column_id: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct LegacyKey {
    id: i32,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LegacyColumn {
    key: LegacyKey,
    data_type: String,
    #[serde(default)]
    is_primary_key: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct LegacyEntity {
    label: String,
    label_id: i32,
    #[serde(default)]
    columns: Vec<LegacyColumn>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LegacyEntityPair {
    src: LegacyKey,
    dst: LegacyKey,
}

#[derive(Debug, Serialize, Deserialize)]
struct LegacyRelation {
    label: String,
    label_id: i32,
    #[serde(default)]
    columns: Vec<LegacyColumn>,
    #[serde(default)]
    entity_pairs: Vec<LegacyEntityPair>,
}

/// 旧版 JSON 编解码器
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyJsonCodec;

impl LegacyJsonCodec {
    fn type_tag(owner: &str, property: &PropertyDef) -> SchemaResult<String> {
        let scalar_tag = |data_type: &DataType| -> Option<&'static str> {
            match data_type {
                DataType::Bool => Some("BOOL"),
                DataType::Int32 => Some("INT"),
                DataType::Int64 => Some("LONG"),
                DataType::Float => Some("FLOAT"),
                DataType::Double => Some("DOUBLE"),
                DataType::String => Some("STRING"),
                DataType::Date => Some("DATE"),
                DataType::Time => Some("TIME"),
                DataType::Timestamp => Some("TIMESTAMP"),
                _ => None,
            }
        };
        let tag = match &property.data_type {
            DataType::Array(inner) => match inner.as_ref() {
                DataType::Bool
                | DataType::Int32
                | DataType::Int64
                | DataType::Float
                | DataType::Double
                | DataType::String => scalar_tag(inner.as_ref()).map(|t| format!("{}_LIST", t)),
                _ => None,
            },
            other => scalar_tag(other).map(str::to_string),
        };
        tag.ok_or_else(|| {
            SchemaError::unsupported(format!(
                "旧版JSON格式不支持属性 {}.{} 的类型 {}",
                owner, property.name, property.data_type
            ))
        })
    }

    fn parse_tag(owner: &str, column: &LegacyColumn) -> SchemaResult<DataType> {
        let scalar = |tag: &str| -> Option<DataType> {
            match tag {
                "BOOL" => Some(DataType::Bool),
                "INT" => Some(DataType::Int32),
                "LONG" => Some(DataType::Int64),
                "FLOAT" => Some(DataType::Float),
                "DOUBLE" => Some(DataType::Double),
                "STRING" => Some(DataType::String),
                "DATE" => Some(DataType::Date),
                "TIME" => Some(DataType::Time),
                "TIMESTAMP" => Some(DataType::Timestamp),
                _ => None,
            }
        };
        let tag = column.data_type.as_str();
        let parsed = match tag.strip_suffix("_LIST") {
            Some(element) => scalar(element)
                .filter(|t| !t.is_temporal())
                .map(|t| DataType::Array(Box::new(t))),
            None => scalar(tag),
        };
        parsed.ok_or_else(|| {
            SchemaError::unsupported(format!(
                "旧版JSON格式中属性 {}.{} 的类型标记 {} 无法识别",
                owner, column.key.name, tag
            ))
        })
    }

    fn columns(
        owner: &str,
        properties: &[PropertyDef],
        primary_keys: &[String],
    ) -> SchemaResult<Vec<LegacyColumn>> {
        properties
            .iter()
            .map(|p| {
                Ok(LegacyColumn {
                    key: LegacyKey {
                        id: p.id,
                        name: p.name.clone(),
                    },
                    data_type: Self::type_tag(owner, p)?,
                    is_primary_key: primary_keys.contains(&p.name),
                })
            })
            .collect()
    }

    fn properties(owner: &str, columns: &[LegacyColumn]) -> SchemaResult<Vec<PropertyDef>> {
        columns
            .iter()
            .map(|c| {
                Ok(PropertyDef::new(c.key.name.clone(), Self::parse_tag(owner, c)?).with_id(c.key.id))
            })
            .collect()
    }
}

impl SchemaCodec for LegacyJsonCodec {
    fn encoding(&self) -> SchemaEncoding {
        SchemaEncoding::LegacyJson
    }

    fn encode(&self, schema: &GraphSchema) -> SchemaResult<String> {
        let entities = schema
            .all_vertex_labels()
            .iter()
            .map(|v| {
                Ok(LegacyEntity {
                    label: v.name.clone(),
                    label_id: v.id,
                    columns: Self::columns(&v.name, &v.properties, &v.primary_keys)?,
                })
            })
            .collect::<SchemaResult<Vec<_>>>()?;

        let relations = schema
            .all_edge_labels()
            .iter()
            .map(|e| {
                Ok(LegacyRelation {
                    label: e.name.clone(),
                    label_id: e.id,
                    columns: Self::columns(&e.name, &e.properties, &[])?,
                    entity_pairs: e
                        .relations
                        .iter()
                        .map(|r| LegacyEntityPair {
                            src: LegacyKey {
                                id: r.src.id,
                                name: r.src.name.clone(),
                            },
                            dst: LegacyKey {
                                id: r.dst.id,
                                name: r.dst.name.clone(),
                            },
                        })
                        .collect(),
                })
            })
            .collect::<SchemaResult<Vec<_>>>()?;

        let document = LegacyDocument {
            entities,
            relations,
            is_column_id: schema.id_mode() == IdMode::ColumnId,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn decode(&self, text: &str) -> SchemaResult<GraphSchema> {
        let document: LegacyDocument = serde_json::from_str(text)?;
        let mode = if document.is_column_id {
            IdMode::ColumnId
        } else {
            IdMode::PropertyName
        };
        let mut builder = GraphSchema::builder().id_mode(mode);

        for entity in &document.entities {
            let primary_keys = entity
                .columns
                .iter()
                .filter(|c| c.is_primary_key)
                .map(|c| c.key.name.clone())
                .collect();
            builder = builder.add_vertex_label(
                VertexLabel::new(entity.label_id, entity.label.clone())
                    .with_properties(Self::properties(&entity.label, &entity.columns)?)
                    .with_primary_keys(primary_keys),
            );
        }

        for relation in &document.relations {
            let mut edge = EdgeLabel::new(relation.label_id, relation.label.clone())
                .with_properties(Self::properties(&relation.label, &relation.columns)?);
            edge.relations = relation
                .entity_pairs
                .iter()
                .map(|pair| {
                    Relation::new(
                        LabelRef::new(pair.src.id, pair.src.name.clone()),
                        LabelRef::new(pair.dst.id, pair.dst.name.clone()),
                    )
                })
                .collect();
            builder = builder.add_edge_label(edge);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODERN: &str = r#"{
        "entities": [
            {"label": "person", "label_id": 0, "columns": [
                {"key": {"id": 0, "name": "id"}, "data_type": "LONG", "is_primary_key": true},
                {"key": {"id": 1, "name": "name"}, "data_type": "STRING"},
                {"key": {"id": 2, "name": "tags"}, "data_type": "STRING_LIST"}
            ]},
            {"label": "software", "label_id": 1, "columns": [
                {"key": {"id": 0, "name": "id"}, "data_type": "LONG", "is_primary_key": true}
            ]}
        ],
        "relations": [
            {"label": "created", "label_id": 0,
             "columns": [{"key": {"id": 0, "name": "weight"}, "data_type": "DOUBLE"}],
             "entity_pairs": [{"src": {"id": 0, "name": "person"}, "dst": {"id": 1, "name": "software"}}]}
        ],
        "is_column_id": false
    }"#;

    #[test]
    fn test_decode_legacy_document() {
        let schema = LegacyJsonCodec.decode(MODERN).expect("合法文档");
        let person = schema.vertex_label("person").expect("存在");
        assert_eq!(person.primary_keys, vec!["id".to_string()]);
        assert_eq!(
            person.property("tags").map(|p| p.data_type.clone()),
            Some(DataType::Array(Box::new(DataType::String)))
        );
        assert_eq!(schema.relations_of("created").map(|r| r.len()), Ok(1));
        assert_eq!(schema.id_mode(), IdMode::PropertyName);
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let text = MODERN.replace("\"DOUBLE\"", "\"DECIMAL\"");
        assert!(matches!(
            LegacyJsonCodec.decode(&text),
            Err(SchemaError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_decimal() {
        let schema = GraphSchema::builder()
            .add_vertex_label(VertexLabel::new(0, "ACCOUNT").with_property(PropertyDef::new(
                "balance",
                DataType::Decimal {
                    precision: 18,
                    scale: 2,
                },
            )))
            .build()
            .expect("合法的Schema");
        match LegacyJsonCodec.encode(&schema) {
            Err(SchemaError::UnsupportedType { construct }) => {
                assert!(construct.contains("ACCOUNT.balance"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            LegacyJsonCodec.decode("{\"entities\": ["),
            Err(SchemaError::Serialization(_))
        ));
    }
}
