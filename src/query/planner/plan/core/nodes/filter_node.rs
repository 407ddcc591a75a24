//! 过滤节点实现
//!
//! FilterNode 按条件过滤输入行，不改变行类型。
//! 能融合进 Source/GetV 的条件不会生成 FilterNode。

use super::plan_node_enum::PlanNodeEnum;
use crate::core::Expression;
use crate::define_plan_node_with_deps;
use crate::query::planner::plan::core::node_id_generator::next_node_id;

define_plan_node_with_deps! {
    pub struct FilterNode {
        condition: Expression,
    }
    enum: Filter
    input: SingleInputNode
}

impl FilterNode {
    pub fn new(input: PlanNodeEnum, condition: Expression) -> Self {
        let row_type = input.row_type().clone();
        Self {
            id: next_node_id(),
            input: Box::new(input),
            condition,
            row_type,
        }
    }

    /// 过滤条件
    pub fn condition(&self) -> &Expression {
        &self.condition
    }
}
