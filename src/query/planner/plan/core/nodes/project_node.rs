//! 投影节点实现

use super::plan_node_enum::PlanNodeEnum;
use crate::core::types::TypeDescriptor;
use crate::core::Expression;
use crate::define_plan_node_with_deps;
use crate::query::planner::plan::core::node_id_generator::next_node_id;
use crate::query::planner::plan::core::row_type::RowType;

/// 投影列：表达式及其输出别名
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectColumn {
    pub expr: Expression,
    pub alias: String,
}

impl ProjectColumn {
    pub fn new(expr: Expression, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }
}

define_plan_node_with_deps! {
    pub struct ProjectNode {
        columns: Vec<ProjectColumn>,
        append: bool,
    }
    enum: Project
    input: SingleInputNode
}

impl ProjectNode {
    /// column_types 与 columns 一一对应。
    /// append 为 false 时输出只包含投影列。
    pub fn new(
        input: PlanNodeEnum,
        columns: Vec<ProjectColumn>,
        column_types: Vec<TypeDescriptor>,
        append: bool,
    ) -> Self {
        let base = if append {
            input.row_type().clone()
        } else {
            RowType::new()
        };
        let row_type = columns
            .iter()
            .zip(column_types)
            .fold(base, |row, (column, ty)| row.with_column(column.alias.clone(), ty));
        Self {
            id: next_node_id(),
            input: Box::new(input),
            columns,
            append,
            row_type,
        }
    }

    pub fn columns(&self) -> &[ProjectColumn] {
        &self.columns
    }

    pub fn is_append(&self) -> bool {
        self.append
    }
}
