//! 计划节点宏定义
//!
//! 提供宏来简化计划节点的定义，减少样板代码。
//! 生成的节点带有唯一ID与输出行类型；克隆时分配新ID，
//! 相等比较忽略ID，只比较结构。

/// 定义无输入的计划节点
///
/// # 示例
/// ```ignore
/// define_plan_node! {
///     pub struct SourceNode {
///         alias: String,
///         element_type: TypeDescriptor,
///     }
///     enum: Source
///     input: ZeroInputNode
/// }
/// ```
#[macro_export]
macro_rules! define_plan_node {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($field:ident: $type:ty),* $(,)?
        }
        enum: $variant:ident
        input: ZeroInputNode
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            id: i64,
            $($field: $type,)*
            row_type: $crate::query::planner::plan::core::row_type::RowType,
        }

        impl Clone for $name {
            fn clone(&self) -> Self {
                use $crate::query::planner::plan::core::node_id_generator::next_node_id;
                Self {
                    id: next_node_id(),
                    $($field: self.$field.clone(),)*
                    row_type: self.row_type.clone(),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                true $(&& self.$field == other.$field)* && self.row_type == other.row_type
            }
        }

        impl $name {
            pub fn id(&self) -> i64 {
                self.id
            }

            pub fn type_name(&self) -> &'static str {
                stringify!($name)
            }

            pub fn row_type(&self) -> &$crate::query::planner::plan::core::row_type::RowType {
                &self.row_type
            }
        }

        impl $crate::query::planner::plan::core::nodes::plan_node_traits::PlanNode for $name {
            fn id(&self) -> i64 {
                self.id()
            }

            fn name(&self) -> &'static str {
                self.type_name()
            }

            fn row_type(&self) -> &$crate::query::planner::plan::core::row_type::RowType {
                self.row_type()
            }

            fn into_enum(self) -> $crate::query::planner::plan::core::nodes::plan_node_enum::PlanNodeEnum {
                $crate::query::planner::plan::core::nodes::plan_node_enum::PlanNodeEnum::$variant(self)
            }
        }

        impl $crate::query::planner::plan::core::nodes::plan_node_traits::ZeroInputNode for $name {}
    };
}

/// 定义单输入的计划节点
#[macro_export]
macro_rules! define_plan_node_with_deps {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($field:ident: $type:ty),* $(,)?
        }
        enum: $variant:ident
        input: SingleInputNode
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            id: i64,
            input: Box<$crate::query::planner::plan::core::nodes::plan_node_enum::PlanNodeEnum>,
            $($field: $type,)*
            row_type: $crate::query::planner::plan::core::row_type::RowType,
        }

        impl Clone for $name {
            fn clone(&self) -> Self {
                use $crate::query::planner::plan::core::node_id_generator::next_node_id;
                Self {
                    id: next_node_id(),
                    input: self.input.clone(),
                    $($field: self.$field.clone(),)*
                    row_type: self.row_type.clone(),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.input == other.input
                    $(&& self.$field == other.$field)*
                    && self.row_type == other.row_type
            }
        }

        impl $name {
            pub fn id(&self) -> i64 {
                self.id
            }

            pub fn type_name(&self) -> &'static str {
                stringify!($name)
            }

            pub fn row_type(&self) -> &$crate::query::planner::plan::core::row_type::RowType {
                &self.row_type
            }

            pub fn input(&self) -> &$crate::query::planner::plan::core::nodes::plan_node_enum::PlanNodeEnum {
                &self.input
            }
        }

        impl $crate::query::planner::plan::core::nodes::plan_node_traits::PlanNode for $name {
            fn id(&self) -> i64 { self.id() }
            fn name(&self) -> &'static str { self.type_name() }
            fn row_type(&self) -> &$crate::query::planner::plan::core::row_type::RowType { self.row_type() }
            fn into_enum(self) -> $crate::query::planner::plan::core::nodes::plan_node_enum::PlanNodeEnum {
                $crate::query::planner::plan::core::nodes::plan_node_enum::PlanNodeEnum::$variant(self)
            }
        }

        impl $crate::query::planner::plan::core::nodes::plan_node_traits::SingleInputNode for $name {
            fn input(&self) -> &$crate::query::planner::plan::core::nodes::plan_node_enum::PlanNodeEnum {
                self.input()
            }
        }
    };
}
