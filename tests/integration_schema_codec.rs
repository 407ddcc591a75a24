//! Schema 编码集成测试
//!
//! 测试范围:
//! - 三种编码两两互转后结构不变
//! - 无法表达的类型直接报 UnsupportedType
//! - 输入流加载与错误码

mod common;

use std::collections::BTreeSet;

use common::data_fixtures::{decimal_schema, ldbc_schema, ldbc_schema_with_mode};
use graphplan::core::error::SchemaError;
use graphplan::core::types::DataType;
use graphplan::core::{CompileError, ErrorCode};
use graphplan::schema::{
    codec_for, convert_schema, encode_schema, load_schema, EdgeLabel, GraphSchema, IdMode,
    PropertyDef, SchemaEncoding, SchemaInputStream, VertexLabel,
};
use proptest::prelude::*;

fn round_trip(schema: &GraphSchema, encoding: SchemaEncoding) -> GraphSchema {
    let text = encode_schema(schema, encoding).expect("编码成功");
    load_schema(&SchemaInputStream::new(text, encoding)).expect("解码成功")
}

#[test]
fn test_round_trip_each_encoding() {
    let schema = ldbc_schema();
    for encoding in SchemaEncoding::all() {
        let decoded = round_trip(&schema, encoding);
        assert_eq!(decoded, schema, "{} 往返后结构变化", encoding);
        assert_eq!(decoded.fingerprint(), schema.fingerprint());
        assert_eq!(decoded.id_mode(), IdMode::ColumnId);
    }
}

#[test]
fn test_pairwise_conversion() {
    let schema = ldbc_schema();
    for from in SchemaEncoding::all() {
        let source = encode_schema(&schema, from).expect("编码成功");
        for to in SchemaEncoding::all() {
            let converted = convert_schema(&source, from, to).expect("转换成功");
            let decoded = codec_for(to).decode(&converted).expect("解码成功");
            assert_eq!(decoded, schema, "{} -> {} 结构变化", from, to);
        }
    }
}

#[test]
fn test_relations_survive_round_trip() {
    let schema = ldbc_schema();
    let decoded = round_trip(&schema, SchemaEncoding::FlexYaml);
    assert_eq!(decoded.relations_of("REPLYOF").map(|r| r.len()), Ok(2));
    assert_eq!(decoded.relations_between("FORUM", "POST").len(), 1);
    assert_eq!(decoded.property_id("POST", "tags"), Ok(5));
    assert_eq!(
        decoded.vertex_label("PERSON").map(|v| v.primary_keys.clone()),
        Ok(vec!["id".to_string()])
    );
}

#[test]
fn test_property_name_mode_round_trip() {
    let schema = ldbc_schema_with_mode(IdMode::PropertyName);
    for encoding in [SchemaEncoding::FlexJson, SchemaEncoding::FlexYaml] {
        assert_eq!(round_trip(&schema, encoding), schema);
    }
}

#[test]
fn test_legacy_rejects_decimal() {
    let schema = decimal_schema();
    match encode_schema(&schema, SchemaEncoding::LegacyJson) {
        Err(SchemaError::UnsupportedType { construct }) => {
            assert!(construct.contains("balance"));
        }
        other => panic!("unexpected result: {:?}", other),
    }

    // flex 格式可以表达 decimal，但转成旧版 JSON 时同样失败
    let yaml = encode_schema(&schema, SchemaEncoding::FlexYaml).expect("flex 支持 decimal");
    let err = convert_schema(&yaml, SchemaEncoding::FlexYaml, SchemaEncoding::LegacyJson)
        .expect_err("旧版 JSON 不支持 decimal");
    let err: CompileError = err.into();
    assert_eq!(err.code(), ErrorCode::UnsupportedType);
}

#[test]
fn test_legacy_rejects_map_and_varchar() {
    for data_type in [
        DataType::Map(Box::new(DataType::String), Box::new(DataType::Int64)),
        DataType::Varchar(64),
        DataType::Int16,
        DataType::UInt64,
    ] {
        let schema = GraphSchema::builder()
            .add_vertex_label(
                VertexLabel::new(0, "DOC").with_property(PropertyDef::new("field", data_type.clone())),
            )
            .build()
            .expect("合法的Schema");
        assert!(
            matches!(
                encode_schema(&schema, SchemaEncoding::LegacyJson),
                Err(SchemaError::UnsupportedType { .. })
            ),
            "{} 应该被旧版 JSON 拒绝",
            data_type
        );
        assert_eq!(round_trip(&schema, SchemaEncoding::FlexJson), schema);
    }
}

#[test]
fn test_invalid_documents_block_schema() {
    let bad_json = SchemaInputStream::new("{\"vertex_types\": 3}", SchemaEncoding::FlexJson);
    assert!(matches!(load_schema(&bad_json), Err(SchemaError::Serialization(_))));

    let bad_utf8 = SchemaInputStream::new(vec![0xc3, 0x28], SchemaEncoding::FlexYaml);
    assert!(matches!(load_schema(&bad_utf8), Err(SchemaError::Serialization(_))));
}

// ---------------------------------------------------------------
// 性质测试：随机 Schema 在三种编码之间往返
// ---------------------------------------------------------------

fn legacy_type() -> impl Strategy<Value = DataType> {
    let scalar = prop_oneof![
        Just(DataType::Bool),
        Just(DataType::Int32),
        Just(DataType::Int64),
        Just(DataType::Float),
        Just(DataType::Double),
        Just(DataType::String),
        Just(DataType::Date),
        Just(DataType::Time),
        Just(DataType::Timestamp),
    ];
    let list = prop_oneof![
        Just(DataType::Int64),
        Just(DataType::Double),
        Just(DataType::String),
    ]
    .prop_map(|inner| DataType::Array(Box::new(inner)));
    prop_oneof![4 => scalar, 1 => list]
}

fn properties() -> impl Strategy<Value = Vec<PropertyDef>> {
    proptest::collection::vec(legacy_type(), 0..5).prop_map(|types| {
        types
            .into_iter()
            .enumerate()
            .map(|(i, ty)| PropertyDef::new(format!("p{}", i), ty).with_id(i as i32))
            .collect()
    })
}

fn random_schema() -> impl Strategy<Value = GraphSchema> {
    (1usize..5)
        .prop_flat_map(|vertex_count| {
            (
                proptest::collection::vec(properties(), vertex_count),
                proptest::collection::vec(
                    (
                        properties(),
                        proptest::collection::vec((0..vertex_count, 0..vertex_count), 1..4),
                    ),
                    0..4,
                ),
            )
        })
        .prop_map(|(vertices, edges)| build_schema(vertices, edges))
}

fn build_schema(
    vertices: Vec<Vec<PropertyDef>>,
    edges: Vec<(Vec<PropertyDef>, Vec<(usize, usize)>)>,
) -> GraphSchema {
    let mut builder = GraphSchema::builder().id_mode(IdMode::ColumnId);
    for (i, props) in vertices.into_iter().enumerate() {
        builder = builder
            .add_vertex_label(VertexLabel::new(i as i32, format!("V{}", i)).with_properties(props));
    }
    for (i, (props, relations)) in edges.into_iter().enumerate() {
        let mut edge = EdgeLabel::new(i as i32, format!("E{}", i)).with_properties(props);
        let relations: BTreeSet<(usize, usize)> = relations.into_iter().collect();
        for (src, dst) in relations {
            edge = edge.with_relation(format!("V{}", src), format!("V{}", dst));
        }
        builder = builder.add_edge_label(edge);
    }
    builder.build().expect("随机 Schema 应该合法")
}

proptest! {
    #[test]
    fn prop_schema_round_trip_pairwise(schema in random_schema()) {
        for from in SchemaEncoding::all() {
            let text = encode_schema(&schema, from).expect("编码成功");
            for to in SchemaEncoding::all() {
                let converted = convert_schema(&text, from, to).expect("转换成功");
                let decoded = codec_for(to).decode(&converted).expect("解码成功");
                prop_assert_eq!(&decoded, &schema);
            }
        }
    }
}
