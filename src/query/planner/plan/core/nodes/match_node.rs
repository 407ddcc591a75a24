//! 模式匹配节点
//!
//! SingleMatchNode 包装一个模式句子，MultiMatchNode 包装多个通过共享别名连接的句子。
//! 两者都在类型推导完成之后才构造，输出只包含具名别名。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::plan_node_enum::PlanNodeEnum;
use crate::define_plan_node;
use crate::query::planner::alias::AliasScope;
use crate::query::planner::plan::core::node_id_generator::next_node_id;
use crate::query::planner::plan::core::row_type::RowType;

/// 单句匹配的连接语义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    Inner,
    Optional,
    Anti,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Inner => write!(f, "INNER"),
            MatchKind::Optional => write!(f, "OPTIONAL"),
            MatchKind::Anti => write!(f, "ANTI"),
        }
    }
}

fn named_columns(row: &RowType) -> RowType {
    row.filter(|c| !AliasScope::is_anonymous(&c.alias))
}

define_plan_node! {
    pub struct SingleMatchNode {
        sentence: Box<PlanNodeEnum>,
        kind: MatchKind,
    }
    enum: SingleMatch
    input: ZeroInputNode
}

impl SingleMatchNode {
    pub fn new(sentence: PlanNodeEnum, kind: MatchKind) -> Self {
        let row_type = named_columns(sentence.row_type());
        Self {
            id: next_node_id(),
            sentence: Box::new(sentence),
            kind,
            row_type,
        }
    }

    pub fn sentence(&self) -> &PlanNodeEnum {
        &self.sentence
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }
}

define_plan_node! {
    pub struct MultiMatchNode {
        sentences: Vec<PlanNodeEnum>,
    }
    enum: MultiMatch
    input: ZeroInputNode
}

impl MultiMatchNode {
    pub fn new(sentences: Vec<PlanNodeEnum>) -> Self {
        let row_type = sentences
            .iter()
            .fold(RowType::new(), |row, s| row.merge(&named_columns(s.row_type())));
        Self {
            id: next_node_id(),
            sentences,
            row_type,
        }
    }

    pub fn sentences(&self) -> &[PlanNodeEnum] {
        &self.sentences
    }
}
