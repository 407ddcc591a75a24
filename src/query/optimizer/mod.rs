//! 编译期改写
//!
//! 目前只包含常量折叠，构建器用它实现过滤融合中的恒真/恒假规则

pub mod constant_folding;

pub use constant_folding::{ConstantFolder, FilterClass};
