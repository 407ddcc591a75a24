//! Flex 格式 Schema（YAML 与 JSON 两种载体共用一个文档模型）
//!
//! ```yaml
//! name: modern_graph
//! schema:
//!   vertex_types:
//!     - type_id: 0
//!       type_name: person
//!       properties:
//!         - property_id: 0
//!           property_name: id
//!           property_type:
//!             primitive_type: DT_SIGNED_INT64
//!       primary_keys: [id]
//!   edge_types:
//!     - type_id: 0
//!       type_name: knows
//!       vertex_type_pair_relations:
//!         - source_vertex: person
//!           destination_vertex: person
//!           relation: MANY_TO_MANY
//! ```

use serde::{Deserialize, Serialize};

use super::{SchemaCodec, SchemaEncoding};
use crate::core::error::{SchemaError, SchemaResult};
use crate::core::types::DataType;
use crate::schema::graph_schema::{GraphSchema, IdMode};
use crate::schema::label::{EdgeLabel, PropertyDef, VertexLabel};

const DEFAULT_GRAPH_NAME: &str = "graph";
const DEFAULT_RELATION: &str = "MANY_TO_MANY";

#[derive(Debug, Serialize, Deserialize)]
struct FlexDocument {
    #[serde(default = "default_graph_name")]
    name: String,
    schema: FlexSchema,
}

fn default_graph_name() -> String {
    DEFAULT_GRAPH_NAME.to_string()
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FlexSchema {
    #[serde(default)]
    vertex_types: Vec<FlexVertexType>,
    #[serde(default)]
    edge_types: Vec<FlexEdgeType>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlexVertexType {
    type_id: i32,
    type_name: String,
    #[serde(default)]
    properties: Vec<FlexProperty>,
    #[serde(default)]
    primary_keys: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlexEdgeType {
    type_id: i32,
    type_name: String,
    #[serde(default)]
    vertex_type_pair_relations: Vec<FlexRelation>,
    #[serde(default)]
    properties: Vec<FlexProperty>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlexRelation {
    source_vertex: String,
    destination_vertex: String,
    #[serde(default = "default_relation")]
    relation: String,
}

fn default_relation() -> String {
    DEFAULT_RELATION.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct FlexProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    property_id: Option<i32>,
    property_name: String,
    property_type: FlexPropertyType,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FlexEmpty {}

/// 属性类型：恰好设置一个字段
#[derive(Debug, Default, Serialize, Deserialize)]
struct FlexPropertyType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primitive_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    string: Option<FlexStringType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temporal: Option<FlexTemporalType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decimal: Option<FlexDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    array: Option<Box<FlexArray>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    map: Option<Box<FlexMap>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FlexStringType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    long_text: Option<FlexEmpty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    char: Option<FlexFixedChar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    var_char: Option<FlexVarChar>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlexFixedChar {
    fixed_length: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlexVarChar {
    max_length: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FlexTemporalType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date32: Option<FlexEmpty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time32: Option<FlexEmpty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<FlexEmpty>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlexDecimal {
    precision: u8,
    scale: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlexArray {
    component_type: FlexPropertyType,
    #[serde(default)]
    max_length: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlexMap {
    key_type: FlexPropertyType,
    value_type: FlexPropertyType,
}

fn primitive(name: &str) -> FlexPropertyType {
    FlexPropertyType {
        primitive_type: Some(name.to_string()),
        ..Default::default()
    }
}

fn to_flex_type(data_type: &DataType) -> FlexPropertyType {
    match data_type {
        DataType::Bool => primitive("DT_BOOL"),
        DataType::Int8 => primitive("DT_SIGNED_INT8"),
        DataType::Int16 => primitive("DT_SIGNED_INT16"),
        DataType::Int32 => primitive("DT_SIGNED_INT32"),
        DataType::Int64 => primitive("DT_SIGNED_INT64"),
        DataType::UInt32 => primitive("DT_UNSIGNED_INT32"),
        DataType::UInt64 => primitive("DT_UNSIGNED_INT64"),
        DataType::Float => primitive("DT_FLOAT"),
        DataType::Double => primitive("DT_DOUBLE"),
        DataType::Char(n) => FlexPropertyType {
            string: Some(FlexStringType {
                char: Some(FlexFixedChar { fixed_length: *n }),
                ..Default::default()
            }),
            ..Default::default()
        },
        DataType::Varchar(n) => FlexPropertyType {
            string: Some(FlexStringType {
                var_char: Some(FlexVarChar { max_length: *n }),
                ..Default::default()
            }),
            ..Default::default()
        },
        DataType::String => FlexPropertyType {
            string: Some(FlexStringType {
                long_text: Some(FlexEmpty {}),
                ..Default::default()
            }),
            ..Default::default()
        },
        DataType::Date | DataType::Time | DataType::Timestamp => {
            let empty = || Some(FlexEmpty {});
            let temporal = match data_type {
                DataType::Date => FlexTemporalType {
                    date32: empty(),
                    ..Default::default()
                },
                DataType::Time => FlexTemporalType {
                    time32: empty(),
                    ..Default::default()
                },
                _ => FlexTemporalType {
                    timestamp: empty(),
                    ..Default::default()
                },
            };
            FlexPropertyType {
                temporal: Some(temporal),
                ..Default::default()
            }
        }
        DataType::Decimal { precision, scale } => FlexPropertyType {
            decimal: Some(FlexDecimal {
                precision: *precision,
                scale: *scale,
            }),
            ..Default::default()
        },
        DataType::Array(inner) => FlexPropertyType {
            array: Some(Box::new(FlexArray {
                component_type: to_flex_type(inner),
                max_length: 0,
            })),
            ..Default::default()
        },
        DataType::Map(key, value) => FlexPropertyType {
            map: Some(Box::new(FlexMap {
                key_type: to_flex_type(key),
                value_type: to_flex_type(value),
            })),
            ..Default::default()
        },
    }
}

fn from_flex_type(owner: &str, property: &str, flex: &FlexPropertyType) -> SchemaResult<DataType> {
    let unsupported = |what: &str| {
        SchemaError::unsupported(format!("Flex格式中属性 {}.{} 的类型 {}", owner, property, what))
    };

    if let Some(name) = &flex.primitive_type {
        return match name.as_str() {
            "DT_BOOL" => Ok(DataType::Bool),
            "DT_SIGNED_INT8" => Ok(DataType::Int8),
            "DT_SIGNED_INT16" => Ok(DataType::Int16),
            "DT_SIGNED_INT32" => Ok(DataType::Int32),
            "DT_SIGNED_INT64" => Ok(DataType::Int64),
            "DT_UNSIGNED_INT32" => Ok(DataType::UInt32),
            "DT_UNSIGNED_INT64" => Ok(DataType::UInt64),
            "DT_FLOAT" => Ok(DataType::Float),
            "DT_DOUBLE" => Ok(DataType::Double),
            other => Err(unsupported(other)),
        };
    }
    if let Some(string) = &flex.string {
        if let Some(fixed) = &string.char {
            return Ok(DataType::Char(fixed.fixed_length));
        }
        if let Some(var) = &string.var_char {
            return Ok(DataType::Varchar(var.max_length));
        }
        if string.long_text.is_some() {
            return Ok(DataType::String);
        }
        return Err(unsupported("string{}"));
    }
    if let Some(temporal) = &flex.temporal {
        if temporal.date32.is_some() {
            return Ok(DataType::Date);
        }
        if temporal.time32.is_some() {
            return Ok(DataType::Time);
        }
        if temporal.timestamp.is_some() {
            return Ok(DataType::Timestamp);
        }
        return Err(unsupported("temporal{}"));
    }
    if let Some(decimal) = &flex.decimal {
        return Ok(DataType::Decimal {
            precision: decimal.precision,
            scale: decimal.scale,
        });
    }
    if let Some(array) = &flex.array {
        let inner = from_flex_type(owner, property, &array.component_type)?;
        return Ok(DataType::Array(Box::new(inner)));
    }
    if let Some(map) = &flex.map {
        let key = from_flex_type(owner, property, &map.key_type)?;
        let value = from_flex_type(owner, property, &map.value_type)?;
        return Ok(DataType::Map(Box::new(key), Box::new(value)));
    }
    Err(unsupported("<空>"))
}

fn to_flex_properties(properties: &[PropertyDef]) -> Vec<FlexProperty> {
    properties
        .iter()
        .map(|p| FlexProperty {
            property_id: Some(p.id),
            property_name: p.name.clone(),
            property_type: to_flex_type(&p.data_type),
        })
        .collect()
}

fn from_flex_properties(owner: &str, properties: &[FlexProperty]) -> SchemaResult<Vec<PropertyDef>> {
    properties
        .iter()
        .map(|p| {
            let data_type = from_flex_type(owner, &p.property_name, &p.property_type)?;
            let def = PropertyDef::new(p.property_name.clone(), data_type);
            Ok(match p.property_id {
                Some(id) => def.with_id(id),
                None => def,
            })
        })
        .collect()
}

fn to_document(schema: &GraphSchema) -> FlexDocument {
    let vertex_types = schema
        .all_vertex_labels()
        .iter()
        .map(|v| FlexVertexType {
            type_id: v.id,
            type_name: v.name.clone(),
            properties: to_flex_properties(&v.properties),
            primary_keys: v.primary_keys.clone(),
        })
        .collect();
    let edge_types = schema
        .all_edge_labels()
        .iter()
        .map(|e| FlexEdgeType {
            type_id: e.id,
            type_name: e.name.clone(),
            vertex_type_pair_relations: e
                .relations
                .iter()
                .map(|r| FlexRelation {
                    source_vertex: r.src.name.clone(),
                    destination_vertex: r.dst.name.clone(),
                    relation: default_relation(),
                })
                .collect(),
            properties: to_flex_properties(&e.properties),
        })
        .collect();
    FlexDocument {
        name: default_graph_name(),
        schema: FlexSchema {
            vertex_types,
            edge_types,
        },
    }
}

fn from_document(document: &FlexDocument) -> SchemaResult<GraphSchema> {
    let schema = &document.schema;
    let all_ids_present = schema
        .vertex_types
        .iter()
        .flat_map(|v| v.properties.iter())
        .chain(schema.edge_types.iter().flat_map(|e| e.properties.iter()))
        .all(|p| p.property_id.is_some());
    let mode = if all_ids_present {
        IdMode::ColumnId
    } else {
        IdMode::PropertyName
    };

    let mut builder = GraphSchema::builder().id_mode(mode);
    for vertex in &schema.vertex_types {
        builder = builder.add_vertex_label(
            VertexLabel::new(vertex.type_id, vertex.type_name.clone())
                .with_properties(from_flex_properties(&vertex.type_name, &vertex.properties)?)
                .with_primary_keys(vertex.primary_keys.clone()),
        );
    }
    for edge in &schema.edge_types {
        let mut label = EdgeLabel::new(edge.type_id, edge.type_name.clone())
            .with_properties(from_flex_properties(&edge.type_name, &edge.properties)?);
        for relation in &edge.vertex_type_pair_relations {
            label = label.with_relation(
                relation.source_vertex.clone(),
                relation.destination_vertex.clone(),
            );
        }
        builder = builder.add_edge_label(label);
    }
    builder.build()
}

/// Flex YAML 编解码器
#[derive(Debug, Default, Clone, Copy)]
pub struct FlexYamlCodec;

impl SchemaCodec for FlexYamlCodec {
    fn encoding(&self) -> SchemaEncoding {
        SchemaEncoding::FlexYaml
    }

    fn encode(&self, schema: &GraphSchema) -> SchemaResult<String> {
        Ok(serde_yaml::to_string(&to_document(schema))?)
    }

    fn decode(&self, text: &str) -> SchemaResult<GraphSchema> {
        let document: FlexDocument = serde_yaml::from_str(text)?;
        from_document(&document)
    }
}

/// Flex JSON 编解码器
#[derive(Debug, Default, Clone, Copy)]
pub struct FlexJsonCodec;

impl SchemaCodec for FlexJsonCodec {
    fn encoding(&self) -> SchemaEncoding {
        SchemaEncoding::FlexJson
    }

    fn encode(&self, schema: &GraphSchema) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(&to_document(schema))?)
    }

    fn decode(&self, text: &str) -> SchemaResult<GraphSchema> {
        let document: FlexDocument = serde_json::from_str(text)?;
        from_document(&document)
    }
}
