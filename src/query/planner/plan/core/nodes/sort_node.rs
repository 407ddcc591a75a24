//! 排序节点实现
//!
//! 带 limit 时等价于 TopN

use super::plan_node_enum::PlanNodeEnum;
use crate::core::types::OrderDirection;
use crate::core::Expression;
use crate::define_plan_node_with_deps;
use crate::query::planner::plan::core::node_id_generator::next_node_id;

/// 排序键
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub expr: Expression,
    pub direction: OrderDirection,
}

impl SortKey {
    pub fn new(expr: Expression, direction: OrderDirection) -> Self {
        Self { expr, direction }
    }

    pub fn asc(expr: Expression) -> Self {
        Self::new(expr, OrderDirection::Asc)
    }

    pub fn desc(expr: Expression) -> Self {
        Self::new(expr, OrderDirection::Desc)
    }
}

define_plan_node_with_deps! {
    pub struct SortNode {
        keys: Vec<SortKey>,
        limit: Option<u64>,
    }
    enum: Sort
    input: SingleInputNode
}

impl SortNode {
    pub fn new(input: PlanNodeEnum, keys: Vec<SortKey>, limit: Option<u64>) -> Self {
        let row_type = input.row_type().clone();
        Self {
            id: next_node_id(),
            input: Box::new(input),
            keys,
            limit,
            row_type,
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}
