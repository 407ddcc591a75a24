//! 模式句子的起点
//!
//! SourceNode 扫描一组同种类的标签（全部顶点或全部边），可携带融合进来的过滤条件

use crate::core::types::TypeDescriptor;
use crate::core::Expression;
use crate::define_plan_node;
use crate::query::planner::plan::core::node_id_generator::next_node_id;
use crate::query::planner::plan::core::row_type::RowType;

define_plan_node! {
    pub struct SourceNode {
        alias: String,
        element_type: TypeDescriptor,
        fused_filter: Option<Expression>,
    }
    enum: Source
    input: ZeroInputNode
}

impl SourceNode {
    pub fn new(
        alias: impl Into<String>,
        element_type: TypeDescriptor,
        fused_filter: Option<Expression>,
    ) -> Self {
        let alias = alias.into();
        let row_type = RowType::single(alias.clone(), element_type.clone());
        Self {
            id: next_node_id(),
            alias,
            element_type,
            fused_filter,
            row_type,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn element_type(&self) -> &TypeDescriptor {
        &self.element_type
    }

    pub fn fused_filter(&self) -> Option<&Expression> {
        self.fused_filter.as_ref()
    }
}
