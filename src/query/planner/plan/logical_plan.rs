//! 逻辑计划
//!
//! 构建完成后不可变，可通过 Arc 在线程间共享

use super::core::explain::explain;
use super::core::node_id_generator::next_node_id;
use super::core::nodes::plan_node_enum::PlanNodeEnum;
use super::core::row_type::RowType;
use crate::query::validator::type_inference::InferenceReport;

#[derive(Debug, Clone)]
pub struct LogicalPlan {
    id: i64,
    root: PlanNodeEnum,
    inference: Vec<InferenceReport>,
}

impl LogicalPlan {
    pub fn new(root: PlanNodeEnum, inference: Vec<InferenceReport>) -> Self {
        Self {
            id: next_node_id(),
            root,
            inference,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn root(&self) -> &PlanNodeEnum {
        &self.root
    }

    /// 最终输出的行类型
    pub fn row_type(&self) -> &RowType {
        self.root.row_type()
    }

    /// 每次模式推导的诊断信息
    pub fn inference_reports(&self) -> &[InferenceReport] {
        &self.inference
    }

    pub fn explain(&self) -> String {
        explain(&self.root)
    }
}

/// 结构相等，忽略计划与节点ID
impl PartialEq for LogicalPlan {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}
