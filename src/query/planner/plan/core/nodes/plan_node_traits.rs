//! PlanNode 统一特征定义

use super::plan_node_enum::PlanNodeEnum;
use crate::query::planner::plan::core::row_type::RowType;

/// PlanNode 基础特征
pub trait PlanNode {
    /// 节点的唯一ID
    fn id(&self) -> i64;

    /// 节点类型的名称
    fn name(&self) -> &'static str;

    /// 输出行类型
    fn row_type(&self) -> &RowType;

    /// 转换为 PlanNodeEnum
    fn into_enum(self) -> PlanNodeEnum;
}

/// 无输入节点（模式句子的起点、空结果节点）
pub trait ZeroInputNode: PlanNode {}

/// 单输入节点
pub trait SingleInputNode: PlanNode {
    fn input(&self) -> &PlanNodeEnum;
}
