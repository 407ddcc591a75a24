//! 计划缓存键
//!
//! (规范化查询文本, Schema 版本)。相等与哈希只取决于内容，与对象身份无关。

use std::fmt;

use crate::schema::{GraphSchema, SchemaVersion};

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct PlanCacheKey {
    query: String,
    schema_version: SchemaVersion,
}

impl PlanCacheKey {
    pub fn new(query: &str, schema: &GraphSchema) -> Self {
        Self::with_version(query, schema.fingerprint())
    }

    pub fn with_version(query: &str, schema_version: SchemaVersion) -> Self {
        Self {
            query: Self::normalize(query),
            schema_version,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.schema_version
    }

    /// 连续空白压缩为一个空格并去掉首尾空白，引号内的字符串字面量保持原样
    pub fn normalize(query: &str) -> String {
        let mut out = String::with_capacity(query.len());
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut pending_space = false;

        for c in query.chars() {
            if let Some(q) = quote {
                out.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            if c.is_whitespace() {
                pending_space = !out.is_empty();
                continue;
            }
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            if c == '\'' || c == '"' {
                quote = Some(c);
            }
            out.push(c);
        }
        out
    }
}

impl fmt::Display for PlanCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.schema_version, self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            PlanCacheKey::normalize("  MATCH (a)\n\t-[b]->  (c)   RETURN a "),
            "MATCH (a) -[b]-> (c) RETURN a"
        );
    }

    #[test]
    fn test_normalize_keeps_literals() {
        assert_eq!(
            PlanCacheKey::normalize("WHERE a.name =  'Tom   Hanks'  AND b.x = \"a  \\\"  b\""),
            "WHERE a.name = 'Tom   Hanks' AND b.x = \"a  \\\"  b\""
        );
    }

    #[test]
    fn test_key_equality_by_content() {
        let v = SchemaVersion(7);
        let a = PlanCacheKey::with_version("MATCH (a)  RETURN a", v);
        let b = PlanCacheKey::with_version("MATCH (a) RETURN a", v);
        assert_eq!(a, b);
        assert_ne!(a, PlanCacheKey::with_version("MATCH (a) RETURN a", SchemaVersion(8)));
        assert_eq!(a.to_string(), "[v0000000000000007] MATCH (a) RETURN a");
    }
}
