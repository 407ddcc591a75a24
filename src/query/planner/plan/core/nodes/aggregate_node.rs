//! 聚合节点实现
//!
//! 输出只包含分组键与聚合结果

use super::plan_node_enum::PlanNodeEnum;
use super::project_node::ProjectColumn;
use crate::core::types::{AggregateFunction, TypeDescriptor};
use crate::core::Expression;
use crate::define_plan_node_with_deps;
use crate::query::planner::plan::core::node_id_generator::next_node_id;
use crate::query::planner::plan::core::row_type::RowType;

/// 聚合调用
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
    pub func: AggregateFunction,
    pub arg: Expression,
    pub alias: String,
}

impl AggregateCall {
    pub fn new(func: AggregateFunction, arg: Expression, alias: impl Into<String>) -> Self {
        Self {
            func,
            arg,
            alias: alias.into(),
        }
    }
}

define_plan_node_with_deps! {
    pub struct AggregateNode {
        keys: Vec<ProjectColumn>,
        calls: Vec<AggregateCall>,
    }
    enum: Aggregate
    input: SingleInputNode
}

impl AggregateNode {
    /// key_types 对应 keys，call_types 对应 calls
    pub fn new(
        input: PlanNodeEnum,
        keys: Vec<ProjectColumn>,
        key_types: Vec<TypeDescriptor>,
        calls: Vec<AggregateCall>,
        call_types: Vec<TypeDescriptor>,
    ) -> Self {
        let row_type = keys
            .iter()
            .map(|k| k.alias.clone())
            .zip(key_types)
            .chain(calls.iter().map(|c| c.alias.clone()).zip(call_types))
            .fold(RowType::new(), |row, (alias, ty)| row.with_column(alias, ty));
        Self {
            id: next_node_id(),
            input: Box::new(input),
            keys,
            calls,
            row_type,
        }
    }

    pub fn keys(&self) -> &[ProjectColumn] {
        &self.keys
    }

    pub fn calls(&self) -> &[AggregateCall] {
        &self.calls
    }
}
