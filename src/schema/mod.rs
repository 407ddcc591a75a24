//! 图 Schema 模块
//!
//! - label / graph_schema：只读的 Schema 模型
//! - converter：属性类型与类型描述符互转
//! - codec：三种外部文本编码
//! - statistics：基数估计接口

pub mod codec;
pub mod converter;
pub mod graph_schema;
pub mod label;
pub mod statistics;

pub use codec::{
    codec_for, convert_schema, encode_schema, load_schema, SchemaCodec, SchemaEncoding,
    SchemaInputStream,
};
pub use converter::TypeConverter;
pub use graph_schema::{GraphSchema, GraphSchemaBuilder, IdMode, PropertyKey, SchemaVersion};
pub use label::{EdgeLabel, PropertyDef, Relation, VertexLabel};
pub use statistics::{GraphStatistics, StaticStatistics};
