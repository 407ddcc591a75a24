//! Schema 文本编码
//!
//! 三种外部编码都以 `GraphSchema` 为中间表示，任意两种编码之间经由它互转

pub mod flex;
pub mod legacy_json;

pub use flex::{FlexJsonCodec, FlexYamlCodec};
pub use legacy_json::LegacyJsonCodec;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::SchemaResult;
use crate::schema::graph_schema::GraphSchema;

/// 编码标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaEncoding {
    LegacyJson,
    FlexYaml,
    FlexJson,
}

impl SchemaEncoding {
    pub fn all() -> [SchemaEncoding; 3] {
        [
            SchemaEncoding::LegacyJson,
            SchemaEncoding::FlexYaml,
            SchemaEncoding::FlexJson,
        ]
    }
}

impl fmt::Display for SchemaEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaEncoding::LegacyJson => write!(f, "legacy-json"),
            SchemaEncoding::FlexYaml => write!(f, "flex-yaml"),
            SchemaEncoding::FlexJson => write!(f, "flex-json"),
        }
    }
}

/// Schema 编解码器
pub trait SchemaCodec: Send + Sync {
    fn encoding(&self) -> SchemaEncoding;

    fn encode(&self, schema: &GraphSchema) -> SchemaResult<String>;

    fn decode(&self, text: &str) -> SchemaResult<GraphSchema>;
}

pub fn codec_for(encoding: SchemaEncoding) -> Box<dyn SchemaCodec> {
    match encoding {
        SchemaEncoding::LegacyJson => Box::new(LegacyJsonCodec),
        SchemaEncoding::FlexYaml => Box::new(FlexYamlCodec),
        SchemaEncoding::FlexJson => Box::new(FlexJsonCodec),
    }
}

/// Schema 输入流：原始字节加编码标记
#[derive(Debug, Clone)]
pub struct SchemaInputStream {
    bytes: Vec<u8>,
    encoding: SchemaEncoding,
}

impl SchemaInputStream {
    pub fn new(bytes: impl Into<Vec<u8>>, encoding: SchemaEncoding) -> Self {
        Self {
            bytes: bytes.into(),
            encoding,
        }
    }

    pub fn encoding(&self) -> SchemaEncoding {
        self.encoding
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// 从输入流加载 Schema
///
/// 任何失败都使整个 Schema 不可用
pub fn load_schema(input: &SchemaInputStream) -> SchemaResult<GraphSchema> {
    let text = std::str::from_utf8(&input.bytes)?;
    match codec_for(input.encoding).decode(text) {
        Ok(schema) => {
            log::info!(
                "已加载Schema ({}): 指纹 {}",
                input.encoding,
                schema.fingerprint()
            );
            Ok(schema)
        }
        Err(e) => {
            log::warn!("Schema被拒绝 ({}): {}", input.encoding, e);
            Err(e)
        }
    }
}

pub fn encode_schema(schema: &GraphSchema, encoding: SchemaEncoding) -> SchemaResult<String> {
    codec_for(encoding).encode(schema)
}

/// 在两种编码之间转换
pub fn convert_schema(text: &str, from: SchemaEncoding, to: SchemaEncoding) -> SchemaResult<String> {
    let schema = codec_for(from).decode(text)?;
    codec_for(to).encode(&schema)
}
