//! 表达式类型推导
//!
//! 在给定输入行类型下推导表达式的结果类型，
//! 用于投影/聚合的输出列类型以及过滤条件的布尔检查

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::{
    AggregateFunction, BinaryOperator, Expression, ScalarType, TypeDescriptor, UnaryOperator,
};
use crate::query::planner::plan::core::row_type::RowType;

/// 查找 alias.property 的类型
///
/// 别名类型为 Any 时结果也是 Any；标量或路径上的属性访问报 TypeMismatch
pub(crate) fn property_type(
    row: &RowType,
    alias: &str,
    property: &str,
) -> PlanResult<TypeDescriptor> {
    let owner = row
        .get(alias)
        .ok_or_else(|| PlanError::AliasNotFound(alias.to_string()))?;
    match owner {
        TypeDescriptor::Any => Ok(TypeDescriptor::Any),
        TypeDescriptor::Vertex(record) | TypeDescriptor::Edge(record) => record
            .property(property)
            .map(|field| field.ty.clone())
            .ok_or_else(|| PlanError::PropertyNotFound {
                alias: alias.to_string(),
                property: property.to_string(),
                available: record.property_names(),
            }),
        other => Err(PlanError::type_mismatch(
            "VERTEX|EDGE",
            other,
            format!("{}.{}", alias, property),
        )),
    }
}

fn is_floating(ty: &TypeDescriptor) -> bool {
    matches!(
        ty,
        TypeDescriptor::Scalar(ScalarType::Float | ScalarType::Double | ScalarType::Decimal { .. })
    )
}

fn is_text(ty: &TypeDescriptor) -> bool {
    matches!(
        ty,
        TypeDescriptor::Scalar(ScalarType::Text | ScalarType::Char(_) | ScalarType::Varchar(_))
    )
}

fn expect_boolean(ty: &TypeDescriptor, context: &Expression) -> PlanResult<()> {
    if ty.is_boolean() || ty.is_any() {
        Ok(())
    } else {
        Err(PlanError::type_mismatch("BOOLEAN", ty, context.to_string()))
    }
}

/// 聚合函数的输出类型
pub fn aggregate_output_type(
    func: AggregateFunction,
    arg: &TypeDescriptor,
) -> PlanResult<TypeDescriptor> {
    match func {
        AggregateFunction::Count | AggregateFunction::CountDistinct => Ok(TypeDescriptor::bigint()),
        AggregateFunction::Sum | AggregateFunction::Avg => {
            if arg.is_any() {
                return Ok(match func {
                    AggregateFunction::Avg => TypeDescriptor::double(),
                    _ => TypeDescriptor::Any,
                });
            }
            if !arg.is_numeric() {
                return Err(PlanError::type_mismatch("NUMERIC", arg, func.name()));
            }
            if func == AggregateFunction::Avg || is_floating(arg) {
                Ok(TypeDescriptor::double())
            } else {
                Ok(TypeDescriptor::bigint())
            }
        }
        AggregateFunction::Min | AggregateFunction::Max => Ok(arg.clone()),
        AggregateFunction::Collect => Ok(TypeDescriptor::Array(Box::new(arg.clone()))),
    }
}

fn deduce_binary(
    expr: &Expression,
    left: TypeDescriptor,
    op: BinaryOperator,
    right: TypeDescriptor,
) -> PlanResult<TypeDescriptor> {
    if op.is_logical() {
        expect_boolean(&left, expr)?;
        expect_boolean(&right, expr)?;
        return Ok(TypeDescriptor::boolean());
    }
    if op.is_arithmetic() {
        if left.is_any() || right.is_any() {
            return Ok(TypeDescriptor::Any);
        }
        if op == BinaryOperator::Add && is_text(&left) && is_text(&right) {
            return Ok(TypeDescriptor::text());
        }
        for side in [&left, &right] {
            if !side.is_numeric() {
                return Err(PlanError::type_mismatch("NUMERIC", side, expr.to_string()));
            }
        }
        return Ok(if is_floating(&left) || is_floating(&right) {
            TypeDescriptor::double()
        } else {
            TypeDescriptor::bigint()
        });
    }
    // 比较、字符串匹配与 IN 都产生布尔值
    Ok(TypeDescriptor::boolean())
}

/// 推导表达式在 row 上的结果类型
pub fn deduce_type(expr: &Expression, row: &RowType) -> PlanResult<TypeDescriptor> {
    match expr {
        Expression::Literal(value) => Ok(value.type_descriptor()),
        Expression::Variable(alias) => row
            .get(alias)
            .cloned()
            .ok_or_else(|| PlanError::AliasNotFound(alias.clone())),
        Expression::Property { alias, property } => property_type(row, alias, property),
        Expression::Binary { left, op, right } => {
            let l = deduce_type(left, row)?;
            let r = deduce_type(right, row)?;
            deduce_binary(expr, l, *op, r)
        }
        Expression::Unary { op, operand } => {
            let ty = deduce_type(operand, row)?;
            match op {
                UnaryOperator::Not => {
                    expect_boolean(&ty, expr)?;
                    Ok(TypeDescriptor::boolean())
                }
                UnaryOperator::IsNull | UnaryOperator::IsNotNull => Ok(TypeDescriptor::boolean()),
                UnaryOperator::Minus => {
                    if ty.is_numeric() || ty.is_any() {
                        Ok(ty)
                    } else {
                        Err(PlanError::type_mismatch("NUMERIC", &ty, expr.to_string()))
                    }
                }
            }
        }
        Expression::Function { name, args } => {
            for arg in args {
                deduce_type(arg, row)?;
            }
            Ok(match name.to_lowercase().as_str() {
                "id" | "length" | "size" => TypeDescriptor::bigint(),
                "labels" | "type" => TypeDescriptor::text(),
                _ => TypeDescriptor::Any,
            })
        }
        Expression::Aggregate { func, arg } => {
            let ty = deduce_type(arg, row)?;
            aggregate_output_type(*func, &ty)
        }
        Expression::List(items) => {
            let mut element = None;
            for item in items {
                let ty = deduce_type(item, row)?;
                element = match element {
                    None => Some(ty),
                    Some(prev) if prev == ty => Some(prev),
                    Some(_) => Some(TypeDescriptor::Any),
                };
            }
            Ok(TypeDescriptor::Array(Box::new(
                element.unwrap_or(TypeDescriptor::Any),
            )))
        }
    }
}

/// 过滤条件必须是布尔类型（或无法确定的 Any）
pub fn check_predicate(expr: &Expression, row: &RowType) -> PlanResult<()> {
    let ty = deduce_type(expr, row)?;
    expect_boolean(&ty, expr)
}
