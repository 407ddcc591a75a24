//! 计划节点

#[macro_use]
pub mod macros;

pub mod aggregate_node;
pub mod empty_node;
pub mod filter_node;
pub mod match_node;
pub mod plan_node_enum;
pub mod plan_node_traits;
pub mod project_node;
pub mod sort_node;
pub mod source_node;
pub mod traversal_node;

pub use plan_node_enum::*;
pub use plan_node_traits::{PlanNode, SingleInputNode, ZeroInputNode};
