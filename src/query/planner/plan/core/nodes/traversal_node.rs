//! 遍历节点
//!
//! - ExpandNode：从起点顶点沿边扩展
//! - GetVNode：取边的端点顶点
//! - PathExpandNode：重复的 Expand + GetV，输出路径

use super::plan_node_enum::PlanNodeEnum;
use crate::core::types::{
    EdgeDirection, GetVOpt, PathRange, PathSemantics, PathType, ResultSemantics, TypeDescriptor,
};
use crate::core::Expression;
use crate::define_plan_node_with_deps;
use crate::query::planner::plan::core::node_id_generator::next_node_id;

define_plan_node_with_deps! {
    pub struct ExpandNode {
        direction: EdgeDirection,
        alias: String,
        start_alias: String,
        edge_type: TypeDescriptor,
    }
    enum: Expand
    input: SingleInputNode
}

impl ExpandNode {
    pub fn new(
        input: PlanNodeEnum,
        direction: EdgeDirection,
        alias: impl Into<String>,
        start_alias: impl Into<String>,
        edge_type: TypeDescriptor,
    ) -> Self {
        let alias = alias.into();
        let row_type = input.row_type().clone().with_column(alias.clone(), edge_type.clone());
        Self {
            id: next_node_id(),
            input: Box::new(input),
            direction,
            alias,
            start_alias: start_alias.into(),
            edge_type,
            row_type,
        }
    }

    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn start_alias(&self) -> &str {
        &self.start_alias
    }

    pub fn edge_type(&self) -> &TypeDescriptor {
        &self.edge_type
    }
}

define_plan_node_with_deps! {
    pub struct GetVNode {
        opt: GetVOpt,
        alias: String,
        vertex_type: TypeDescriptor,
        fused_filter: Option<Expression>,
    }
    enum: GetV
    input: SingleInputNode
}

impl GetVNode {
    pub fn new(
        input: PlanNodeEnum,
        opt: GetVOpt,
        alias: impl Into<String>,
        vertex_type: TypeDescriptor,
        fused_filter: Option<Expression>,
    ) -> Self {
        let alias = alias.into();
        let row_type = input.row_type().clone().with_column(alias.clone(), vertex_type.clone());
        Self {
            id: next_node_id(),
            input: Box::new(input),
            opt,
            alias,
            vertex_type,
            fused_filter,
            row_type,
        }
    }

    pub fn opt(&self) -> GetVOpt {
        self.opt
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn vertex_type(&self) -> &TypeDescriptor {
        &self.vertex_type
    }

    pub fn fused_filter(&self) -> Option<&Expression> {
        self.fused_filter.as_ref()
    }
}

define_plan_node_with_deps! {
    pub struct PathExpandNode {
        direction: EdgeDirection,
        alias: String,
        start_alias: String,
        path: PathType,
        path_opt: PathSemantics,
        result_opt: ResultSemantics,
    }
    enum: PathExpand
    input: SingleInputNode
}

impl PathExpandNode {
    pub fn new(
        input: PlanNodeEnum,
        direction: EdgeDirection,
        alias: impl Into<String>,
        start_alias: impl Into<String>,
        path: PathType,
        path_opt: PathSemantics,
        result_opt: ResultSemantics,
    ) -> Self {
        let alias = alias.into();
        let row_type = input
            .row_type()
            .clone()
            .with_column(alias.clone(), TypeDescriptor::path(path.clone()));
        Self {
            id: next_node_id(),
            input: Box::new(input),
            direction,
            alias,
            start_alias: start_alias.into(),
            path,
            path_opt,
            result_opt,
            row_type,
        }
    }

    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn start_alias(&self) -> &str {
        &self.start_alias
    }

    pub fn path(&self) -> &PathType {
        &self.path
    }

    pub fn range(&self) -> PathRange {
        self.path.range
    }

    pub fn path_opt(&self) -> PathSemantics {
        self.path_opt
    }

    pub fn result_opt(&self) -> ResultSemantics {
        self.result_opt
    }
}
