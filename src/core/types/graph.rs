//! 图遍历相关的枚举类型
//!
//! 边方向、端点选择、路径语义以及排序方向

use serde::{Deserialize, Serialize};
use std::fmt;

/// 边的方向类型
///
/// 相对于扩展起点而言：OUT 表示起点是边的源顶点，IN 表示起点是边的目标顶点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// 出边：从源节点指向目标节点
    Out,
    /// 入边：从目标节点指向源节点
    In,
    /// 双向：同时包含出边和入边
    Both,
}

impl EdgeDirection {
    /// 判断是否包含出边
    pub fn is_outgoing(&self) -> bool {
        matches!(self, EdgeDirection::Out | EdgeDirection::Both)
    }

    /// 判断是否包含入边
    pub fn is_incoming(&self) -> bool {
        matches!(self, EdgeDirection::In | EdgeDirection::Both)
    }

    /// 获取反向方向
    pub fn reverse(&self) -> Self {
        match self {
            EdgeDirection::Out => EdgeDirection::In,
            EdgeDirection::In => EdgeDirection::Out,
            EdgeDirection::Both => EdgeDirection::Both,
        }
    }

    /// 扩展后到达另一端顶点所用的端点选择
    pub fn default_get_v(&self) -> GetVOpt {
        match self {
            EdgeDirection::Out => GetVOpt::End,
            EdgeDirection::In => GetVOpt::Start,
            EdgeDirection::Both => GetVOpt::Other,
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeDirection::Out => write!(f, "OUT"),
            EdgeDirection::In => write!(f, "IN"),
            EdgeDirection::Both => write!(f, "BOTH"),
        }
    }
}

impl From<&str> for EdgeDirection {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "out" | "outgoing" | "forward" => EdgeDirection::Out,
            "in" | "incoming" | "backward" => EdgeDirection::In,
            _ => EdgeDirection::Both,
        }
    }
}

/// GetV 的端点选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GetVOpt {
    /// 边的源顶点
    Start,
    /// 边的目标顶点
    End,
    /// 相对扩展起点的另一端
    Other,
}

impl fmt::Display for GetVOpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GetVOpt::Start => write!(f, "START"),
            GetVOpt::End => write!(f, "END"),
            GetVOpt::Other => write!(f, "OTHER"),
        }
    }
}

/// 路径语义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSemantics {
    /// 顶点不重复
    Simple,
    /// 任意路径
    Arbitrary,
    /// 边不重复
    Trail,
}

impl fmt::Display for PathSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSemantics::Simple => write!(f, "SIMPLE"),
            PathSemantics::Arbitrary => write!(f, "ARBITRARY"),
            PathSemantics::Trail => write!(f, "TRAIL"),
        }
    }
}

/// 路径结果语义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultSemantics {
    /// 只保留终点
    EndV,
    /// 保留路径上的全部顶点
    AllV,
    /// 保留路径上的全部顶点和边
    AllVE,
}

impl fmt::Display for ResultSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultSemantics::EndV => write!(f, "END_V"),
            ResultSemantics::AllV => write!(f, "ALL_V"),
            ResultSemantics::AllVE => write!(f, "ALL_V_E"),
        }
    }
}

/// 排序方向枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    /// 升序
    Asc,
    /// 降序
    Desc,
}

impl OrderDirection {
    pub fn name(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl From<bool> for OrderDirection {
    fn from(desc: bool) -> Self {
        if desc {
            OrderDirection::Desc
        } else {
            OrderDirection::Asc
        }
    }
}
