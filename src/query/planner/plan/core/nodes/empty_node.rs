//! 空结果节点
//!
//! 过滤条件在编译期恒为假时替换整个子树，保留原行类型以便下游类型检查

use crate::define_plan_node;
use crate::query::planner::plan::core::node_id_generator::next_node_id;
use crate::query::planner::plan::core::row_type::RowType;

define_plan_node! {
    pub struct EmptyNode {}
    enum: Empty
    input: ZeroInputNode
}

impl EmptyNode {
    pub fn new(row_type: RowType) -> Self {
        Self {
            id: next_node_id(),
            row_type,
        }
    }
}
