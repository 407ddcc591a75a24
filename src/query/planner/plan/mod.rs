pub mod core;
pub mod logical_plan;

pub use self::core::nodes::*;
pub use self::core::{explain, RowColumn, RowType};
pub use logical_plan::LogicalPlan;
