//! 集成测试共享工具模块
//!
//! 提供测试 Schema 与断言辅助函数，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;
pub mod data_fixtures;

use std::sync::Arc;

use graphplan::query::LogicalPlanBuilder;
use graphplan::schema::GraphSchema;

/// 测试上下文，持有共享的 Schema
pub struct TestContext {
    pub schema: Arc<GraphSchema>,
}

impl TestContext {
    /// 基于 LDBC 子集 Schema 创建上下文
    pub fn ldbc() -> Self {
        Self {
            schema: Arc::new(data_fixtures::ldbc_schema()),
        }
    }

    pub fn builder(&self) -> LogicalPlanBuilder {
        LogicalPlanBuilder::new(self.schema.clone())
    }
}
