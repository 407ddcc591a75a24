//! PlanNode 枚举定义
//!
//! 封闭的节点集合，避免动态分发

use super::plan_node_traits::PlanNode;
use crate::query::planner::plan::core::row_type::RowType;

pub use super::aggregate_node::{AggregateCall, AggregateNode};
pub use super::empty_node::EmptyNode;
pub use super::filter_node::FilterNode;
pub use super::match_node::{MatchKind, MultiMatchNode, SingleMatchNode};
pub use super::project_node::{ProjectColumn, ProjectNode};
pub use super::sort_node::{SortKey, SortNode};
pub use super::source_node::SourceNode;
pub use super::traversal_node::{ExpandNode, GetVNode, PathExpandNode};

#[derive(Debug, Clone, PartialEq)]
pub enum PlanNodeEnum {
    /// 扫描起点
    Source(SourceNode),
    /// 沿边扩展
    Expand(ExpandNode),
    /// 取端点
    GetV(GetVNode),
    /// 路径扩展
    PathExpand(PathExpandNode),
    /// 投影
    Project(ProjectNode),
    /// 过滤
    Filter(FilterNode),
    /// 聚合
    Aggregate(AggregateNode),
    /// 排序
    Sort(SortNode),
    /// 单句匹配
    SingleMatch(SingleMatchNode),
    /// 多句匹配
    MultiMatch(MultiMatchNode),
    /// 空结果
    Empty(EmptyNode),
}

macro_rules! dispatch {
    ($self:expr, $node:ident => $body:expr) => {
        match $self {
            PlanNodeEnum::Source($node) => $body,
            PlanNodeEnum::Expand($node) => $body,
            PlanNodeEnum::GetV($node) => $body,
            PlanNodeEnum::PathExpand($node) => $body,
            PlanNodeEnum::Project($node) => $body,
            PlanNodeEnum::Filter($node) => $body,
            PlanNodeEnum::Aggregate($node) => $body,
            PlanNodeEnum::Sort($node) => $body,
            PlanNodeEnum::SingleMatch($node) => $body,
            PlanNodeEnum::MultiMatch($node) => $body,
            PlanNodeEnum::Empty($node) => $body,
        }
    };
}

impl PlanNodeEnum {
    pub fn id(&self) -> i64 {
        dispatch!(self, node => node.id())
    }

    pub fn name(&self) -> &'static str {
        dispatch!(self, node => PlanNode::name(node))
    }

    pub fn row_type(&self) -> &RowType {
        dispatch!(self, node => node.row_type())
    }

    /// 子节点
    pub fn children(&self) -> Vec<&PlanNodeEnum> {
        match self {
            PlanNodeEnum::Source(_) | PlanNodeEnum::Empty(_) => Vec::new(),
            PlanNodeEnum::Expand(n) => vec![n.input()],
            PlanNodeEnum::GetV(n) => vec![n.input()],
            PlanNodeEnum::PathExpand(n) => vec![n.input()],
            PlanNodeEnum::Project(n) => vec![n.input()],
            PlanNodeEnum::Filter(n) => vec![n.input()],
            PlanNodeEnum::Aggregate(n) => vec![n.input()],
            PlanNodeEnum::Sort(n) => vec![n.input()],
            PlanNodeEnum::SingleMatch(n) => vec![n.sentence()],
            PlanNodeEnum::MultiMatch(n) => n.sentences().iter().collect(),
        }
    }

    /// 节点绑定的别名（如有）
    pub fn alias(&self) -> Option<&str> {
        match self {
            PlanNodeEnum::Source(n) => Some(n.alias()),
            PlanNodeEnum::Expand(n) => Some(n.alias()),
            PlanNodeEnum::GetV(n) => Some(n.alias()),
            PlanNodeEnum::PathExpand(n) => Some(n.alias()),
            _ => None,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, PlanNodeEnum::Source(_))
    }

    pub fn is_filter(&self) -> bool {
        matches!(self, PlanNodeEnum::Filter(_))
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, PlanNodeEnum::Empty(_))
    }

    /// 节点及其子树的节点总数
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }
}
