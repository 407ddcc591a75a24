//! 属性数据类型与类型描述符之间的转换

use crate::core::error::{SchemaError, SchemaResult};
use crate::core::types::{
    DataType, ElementKind, GraphRecordType, LabelType, RecordField, ScalarType, TypeDescriptor,
};
use crate::schema::graph_schema::GraphSchema;
use crate::schema::label::PropertyDef;

pub struct TypeConverter;

impl TypeConverter {
    /// 属性数据类型 -> 类型描述符（总能成功）
    pub fn to_descriptor(data_type: &DataType) -> TypeDescriptor {
        let scalar = |s| TypeDescriptor::Scalar(s);
        match data_type {
            DataType::Bool => scalar(ScalarType::Bool),
            DataType::Int8 => scalar(ScalarType::Integer { bits: 8, signed: true }),
            DataType::Int16 => scalar(ScalarType::Integer { bits: 16, signed: true }),
            DataType::Int32 => scalar(ScalarType::Integer { bits: 32, signed: true }),
            DataType::Int64 => scalar(ScalarType::Integer { bits: 64, signed: true }),
            DataType::UInt32 => scalar(ScalarType::Integer { bits: 32, signed: false }),
            DataType::UInt64 => scalar(ScalarType::Integer { bits: 64, signed: false }),
            DataType::Float => scalar(ScalarType::Float),
            DataType::Double => scalar(ScalarType::Double),
            DataType::Char(n) => scalar(ScalarType::Char(*n)),
            DataType::Varchar(n) => scalar(ScalarType::Varchar(*n)),
            DataType::String => scalar(ScalarType::Text),
            DataType::Date => scalar(ScalarType::Date),
            DataType::Time => scalar(ScalarType::Time),
            DataType::Timestamp => scalar(ScalarType::Timestamp),
            DataType::Decimal { precision, scale } => scalar(ScalarType::Decimal {
                precision: *precision,
                scale: *scale,
            }),
            DataType::Array(inner) => TypeDescriptor::Array(Box::new(Self::to_descriptor(inner))),
            DataType::Map(key, value) => TypeDescriptor::Map(
                Box::new(Self::to_descriptor(key)),
                Box::new(Self::to_descriptor(value)),
            ),
        }
    }

    /// 类型描述符 -> 属性数据类型
    ///
    /// 图元素类型与不受约束的类型没有对应的属性类型
    pub fn to_data_type(descriptor: &TypeDescriptor) -> SchemaResult<DataType> {
        match descriptor {
            TypeDescriptor::Scalar(scalar) => Self::scalar_to_data_type(scalar),
            TypeDescriptor::Array(inner) => {
                Ok(DataType::Array(Box::new(Self::to_data_type(inner)?)))
            }
            TypeDescriptor::Map(key, value) => Ok(DataType::Map(
                Box::new(Self::to_data_type(key)?),
                Box::new(Self::to_data_type(value)?),
            )),
            TypeDescriptor::Any
            | TypeDescriptor::Vertex(_)
            | TypeDescriptor::Edge(_)
            | TypeDescriptor::Path(_) => Err(SchemaError::unsupported(format!(
                "类型 {} 不能作为属性类型",
                descriptor
            ))),
        }
    }

    fn scalar_to_data_type(scalar: &ScalarType) -> SchemaResult<DataType> {
        Ok(match scalar {
            ScalarType::Bool => DataType::Bool,
            ScalarType::Integer { bits: 8, signed: true } => DataType::Int8,
            ScalarType::Integer { bits: 16, signed: true } => DataType::Int16,
            ScalarType::Integer { bits: 32, signed: true } => DataType::Int32,
            ScalarType::Integer { bits: 64, signed: true } => DataType::Int64,
            ScalarType::Integer { bits: 32, signed: false } => DataType::UInt32,
            ScalarType::Integer { bits: 64, signed: false } => DataType::UInt64,
            ScalarType::Integer { .. } => {
                return Err(SchemaError::unsupported(format!("整数类型 {}", scalar)))
            }
            ScalarType::Float => DataType::Float,
            ScalarType::Double => DataType::Double,
            ScalarType::Char(n) => DataType::Char(*n),
            ScalarType::Varchar(n) => DataType::Varchar(*n),
            ScalarType::Text => DataType::String,
            ScalarType::Date => DataType::Date,
            ScalarType::Time => DataType::Time,
            ScalarType::Timestamp => DataType::Timestamp,
            ScalarType::Decimal { precision, scale } => DataType::Decimal {
                precision: *precision,
                scale: *scale,
            },
        })
    }

    /// 由标签类型构造记录类型
    ///
    /// 属性取所有标签共有的部分，顺序以第一个标签为准；
    /// 同名属性类型不一致时记为 Any
    pub fn record_type(schema: &GraphSchema, label_type: &LabelType) -> SchemaResult<GraphRecordType> {
        let mut per_label: Vec<&[PropertyDef]> = Vec::new();
        for label in label_type.labels() {
            let properties = match label_type.kind() {
                ElementKind::Vertex => schema.vertex_label(&label.name)?.properties.as_slice(),
                ElementKind::Edge => schema.edge_label(&label.name)?.properties.as_slice(),
            };
            per_label.push(properties);
        }

        let mut fields = Vec::new();
        if let Some((first, rest)) = per_label.split_first() {
            for property in first.iter() {
                let mut ty = Some(Self::to_descriptor(&property.data_type));
                for others in rest {
                    match others.iter().find(|p| p.name == property.name) {
                        None => {
                            ty = None;
                            break;
                        }
                        Some(other) if other.data_type != property.data_type => {
                            ty = ty.map(|_| TypeDescriptor::Any);
                        }
                        Some(_) => {}
                    }
                }
                if let Some(ty) = ty {
                    fields.push(RecordField::new(property.name.clone(), ty));
                }
            }
        }
        Ok(GraphRecordType::new(label_type.clone(), fields))
    }

    /// 标签类型对应的图元素描述符
    pub fn element_descriptor(
        schema: &GraphSchema,
        label_type: &LabelType,
    ) -> SchemaResult<TypeDescriptor> {
        Ok(TypeDescriptor::graph_element(Self::record_type(schema, label_type)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LabelRef;
    use crate::schema::label::VertexLabel;

    fn schema() -> GraphSchema {
        GraphSchema::builder()
            .add_vertex_label(
                VertexLabel::new(0, "COMMENT")
                    .with_property(PropertyDef::new("id", DataType::Int64))
                    .with_property(PropertyDef::new("content", DataType::String))
                    .with_property(PropertyDef::new("length", DataType::Int32)),
            )
            .add_vertex_label(
                VertexLabel::new(1, "POST")
                    .with_property(PropertyDef::new("id", DataType::Int64))
                    .with_property(PropertyDef::new("length", DataType::Int64))
                    .with_property(PropertyDef::new("imageFile", DataType::String)),
            )
            .build()
            .expect("合法的Schema")
    }

    #[test]
    fn test_data_type_round_trip() {
        let types = vec![
            DataType::Bool,
            DataType::UInt32,
            DataType::Varchar(64),
            DataType::Decimal { precision: 10, scale: 2 },
            DataType::Map(Box::new(DataType::String), Box::new(DataType::Array(Box::new(DataType::Int64)))),
        ];
        for data_type in types {
            let descriptor = TypeConverter::to_descriptor(&data_type);
            assert_eq!(TypeConverter::to_data_type(&descriptor), Ok(data_type));
        }
    }

    #[test]
    fn test_graph_descriptor_is_not_a_property_type() {
        let schema = schema();
        let label = LabelType::vertices(vec![LabelRef::new(0, "COMMENT")]).expect("非空");
        let descriptor = TypeConverter::element_descriptor(&schema, &label).expect("存在");
        assert!(matches!(
            TypeConverter::to_data_type(&descriptor),
            Err(SchemaError::UnsupportedType { .. })
        ));
        assert!(TypeConverter::to_data_type(&TypeDescriptor::Any).is_err());
    }

    #[test]
    fn test_fuzzy_record_intersects_properties() {
        let schema = schema();
        let label = LabelType::vertices(vec![LabelRef::new(0, "COMMENT"), LabelRef::new(1, "POST")])
            .expect("非空");
        let record = TypeConverter::record_type(&schema, &label).expect("存在");
        assert_eq!(record.property_names(), vec!["id", "length"]);
        assert_eq!(
            record.property("id").map(|f| f.ty.clone()),
            Some(TypeDescriptor::bigint())
        );
        assert_eq!(
            record.property("length").map(|f| f.ty.clone()),
            Some(TypeDescriptor::Any)
        );
    }
}
