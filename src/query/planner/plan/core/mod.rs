pub mod explain;
pub mod node_id_generator;
pub mod nodes;
pub mod row_type;

pub use explain::{describe_plan, explain, Pair, PlanNodeDescription};
pub use node_id_generator::{next_node_id, NodeIdGenerator};
pub use nodes::plan_node_enum::PlanNodeEnum;
pub use nodes::plan_node_traits::PlanNode;
pub use row_type::{RowColumn, RowType};
