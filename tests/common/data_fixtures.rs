//! 测试数据生成模块
//!
//! LDBC 社交网络的一个子集：
//! PERSON / COMMENT / POST / FORUM，KNOWS(PERSON→PERSON)、
//! REPLYOF(COMMENT→POST, COMMENT→COMMENT)、CONTAINEROF(FORUM→POST)

use graphplan::core::types::DataType;
use graphplan::schema::{EdgeLabel, GraphSchema, IdMode, PropertyDef, VertexLabel};

fn prop(name: &str, data_type: DataType, id: i32) -> PropertyDef {
    PropertyDef::new(name, data_type).with_id(id)
}

/// 只使用旧版 JSON 格式也能表达的属性类型，三种编码可以互转
pub fn ldbc_schema() -> GraphSchema {
    ldbc_schema_with_mode(IdMode::ColumnId)
}

pub fn ldbc_schema_with_mode(mode: IdMode) -> GraphSchema {
    GraphSchema::builder()
        .id_mode(mode)
        .add_vertex_label(
            VertexLabel::new(0, "PERSON")
                .with_property(prop("id", DataType::Int64, 0))
                .with_property(prop("firstName", DataType::String, 1))
                .with_property(prop("birthday", DataType::Date, 2))
                .with_primary_keys(vec!["id".to_string()]),
        )
        .add_vertex_label(
            VertexLabel::new(1, "COMMENT")
                .with_property(prop("id", DataType::Int64, 0))
                .with_property(prop("content", DataType::String, 3))
                .with_property(prop("length", DataType::Int32, 4))
                .with_primary_keys(vec!["id".to_string()]),
        )
        .add_vertex_label(
            VertexLabel::new(2, "POST")
                .with_property(prop("id", DataType::Int64, 0))
                .with_property(prop("content", DataType::String, 3))
                .with_property(prop("length", DataType::Int32, 4))
                .with_property(prop("tags", DataType::Array(Box::new(DataType::String)), 5))
                .with_primary_keys(vec!["id".to_string()]),
        )
        .add_vertex_label(
            VertexLabel::new(3, "FORUM")
                .with_property(prop("id", DataType::Int64, 0))
                .with_property(prop("title", DataType::String, 6)),
        )
        .add_edge_label(
            EdgeLabel::new(0, "KNOWS")
                .with_property(prop("creationDate", DataType::Timestamp, 7))
                .with_relation("PERSON", "PERSON"),
        )
        .add_edge_label(
            EdgeLabel::new(1, "REPLYOF")
                .with_relation("COMMENT", "POST")
                .with_relation("COMMENT", "COMMENT"),
        )
        .add_edge_label(
            EdgeLabel::new(2, "CONTAINEROF")
                .with_property(prop("weight", DataType::Double, 8))
                .with_relation("FORUM", "POST"),
        )
        .build()
        .expect("LDBC 测试 Schema 应该合法")
}

/// 带 decimal 属性的 Schema，旧版 JSON 无法表达
pub fn decimal_schema() -> GraphSchema {
    GraphSchema::builder()
        .add_vertex_label(
            VertexLabel::new(0, "ACCOUNT")
                .with_property(PropertyDef::new("id", DataType::Int64))
                .with_property(PropertyDef::new(
                    "balance",
                    DataType::Decimal {
                        precision: 18,
                        scale: 2,
                    },
                )),
        )
        .add_edge_label(EdgeLabel::new(0, "TRANSFER").with_relation("ACCOUNT", "ACCOUNT"))
        .build()
        .expect("decimal 测试 Schema 应该合法")
}
