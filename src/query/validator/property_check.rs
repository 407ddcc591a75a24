//! 属性引用检查
//!
//! 推导到不动点后，模式中每个 alias.property 都必须出现在别名最终类型的属性交集中。
//! 模糊类型只暴露所有候选标签共有的属性。

use crate::core::error::PlanResult;
use crate::core::types::Expression;
use crate::query::planner::plan::core::row_type::RowType;
use crate::query::validator::deduce_type::property_type;

/// 检查单个表达式中的属性引用
pub fn check_property_refs(expr: &Expression, row: &RowType) -> PlanResult<()> {
    for (alias, property) in expr.property_refs() {
        property_type(row, &alias, &property)?;
    }
    Ok(())
}

/// 依次检查多个表达式，返回遇到的第一个错误
pub fn check_all<'a>(
    exprs: impl IntoIterator<Item = &'a Expression>,
    row: &RowType,
) -> PlanResult<()> {
    for expr in exprs {
        check_property_refs(expr, row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PlanError;
    use crate::core::types::{GraphRecordType, LabelRef, LabelType, RecordField, TypeDescriptor};

    /// COMMENT|POST 的公共属性只有 content
    fn fuzzy_row() -> RowType {
        let label = LabelType::vertices(vec![LabelRef::new(1, "COMMENT"), LabelRef::new(2, "POST")])
            .expect("非空");
        let record = GraphRecordType::new(
            label,
            vec![RecordField::new("content", TypeDescriptor::text())],
        );
        RowType::single("m", TypeDescriptor::graph_element(record))
    }

    #[test]
    fn test_common_property_passes() {
        let expr = Expression::eq(Expression::property("m", "content"), Expression::literal("hi"));
        assert!(check_property_refs(&expr, &fuzzy_row()).is_ok());
    }

    #[test]
    fn test_label_specific_property_fails() {
        let ok = Expression::eq(Expression::property("m", "content"), Expression::literal("hi"));
        let bad = Expression::eq(Expression::property("m", "title"), Expression::literal("hi"));
        match check_all([&ok, &bad], &fuzzy_row()) {
            Err(PlanError::PropertyNotFound { property, available, .. }) => {
                assert_eq!(property, "title");
                assert_eq!(available, vec!["content".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
