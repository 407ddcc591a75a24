//! 常量折叠
//!
//! 自底向上折叠只包含字面量的子表达式，并把过滤条件归类为
//! 恒真、恒假或剩余条件。构建器据此丢弃恒真过滤、把恒假过滤替换为空结果节点。

use crate::core::types::{BinaryOperator, Expression, UnaryOperator};
use crate::core::value::Value;
use std::cmp::Ordering;

/// 过滤条件的折叠结果
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClass {
    /// 恒为 true，可以整体丢弃
    Tautology,
    /// 恒为 false 或 null，结果必为空
    Contradiction,
    /// 折叠后的剩余条件
    Residual(Expression),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantFolder;

impl ConstantFolder {
    pub fn new() -> Self {
        Self
    }

    /// 折叠表达式，返回新的表达式树
    pub fn fold(&self, expr: &Expression) -> Expression {
        match expr {
            Expression::Literal(_) | Expression::Variable(_) | Expression::Property { .. } => {
                expr.clone()
            }
            Expression::Binary { left, op, right } => {
                let left = self.fold(left);
                let right = self.fold(right);
                self.fold_binary(left, *op, right)
            }
            Expression::Unary { op, operand } => {
                let operand = self.fold(operand);
                self.fold_unary(*op, operand)
            }
            Expression::Function { name, args } => {
                Expression::function(name.clone(), args.iter().map(|a| self.fold(a)).collect())
            }
            Expression::Aggregate { func, arg } => Expression::aggregate(*func, self.fold(arg)),
            Expression::List(items) => Expression::List(items.iter().map(|i| self.fold(i)).collect()),
        }
    }

    /// 归类过滤条件
    pub fn classify(&self, condition: &Expression) -> FilterClass {
        let folded = self.fold(condition);
        let class = match &folded {
            Expression::Literal(Value::Bool(true)) => FilterClass::Tautology,
            Expression::Literal(Value::Bool(false)) | Expression::Literal(Value::Null) => {
                FilterClass::Contradiction
            }
            _ => FilterClass::Residual(folded),
        };
        log::debug!("过滤条件 {} 归类为 {:?}", condition, class);
        class
    }

    fn fold_binary(&self, left: Expression, op: BinaryOperator, right: Expression) -> Expression {
        match op {
            BinaryOperator::And => match (left.as_bool_literal(), right.as_bool_literal()) {
                (Some(false), _) | (_, Some(false)) => Expression::literal(false),
                (Some(true), _) => right,
                (_, Some(true)) => left,
                _ => Expression::binary(left, op, right),
            },
            BinaryOperator::Or => match (left.as_bool_literal(), right.as_bool_literal()) {
                (Some(true), _) | (_, Some(true)) => Expression::literal(true),
                (Some(false), _) => right,
                (_, Some(false)) => left,
                _ => Expression::binary(left, op, right),
            },
            _ => match (&left, &right) {
                (Expression::Literal(l), Expression::Literal(r)) => match self.evaluate(l, op, r) {
                    Some(value) => Expression::Literal(value),
                    None => Expression::binary(left, op, right),
                },
                _ => Expression::binary(left, op, right),
            },
        }
    }

    fn fold_unary(&self, op: UnaryOperator, operand: Expression) -> Expression {
        let value = match &operand {
            Expression::Literal(v) => v,
            _ => return Expression::unary(op, operand),
        };
        let folded = match op {
            UnaryOperator::Not => value.as_bool().map(|b| Value::Bool(!b)),
            UnaryOperator::IsNull => Some(Value::Bool(value.is_null())),
            UnaryOperator::IsNotNull => Some(Value::Bool(!value.is_null())),
            UnaryOperator::Minus => match value {
                Value::Int(i) => i.checked_neg().map(Value::Int),
                Value::Float(f) => Some(Value::Float(-f)),
                _ => None,
            },
        };
        match folded {
            Some(v) => Expression::Literal(v),
            None => Expression::unary(op, operand),
        }
    }

    /// 计算两个字面量的二元运算；无法在编译期确定时返回 None
    fn evaluate(&self, left: &Value, op: BinaryOperator, right: &Value) -> Option<Value> {
        if op.is_comparison() {
            if left.is_null() || right.is_null() {
                return Some(Value::Null);
            }
            let ordering = left.compare(right);
            return match (op, ordering) {
                (BinaryOperator::Equal, Some(o)) => Some(Value::Bool(o == Ordering::Equal)),
                (BinaryOperator::Equal, None) => Some(Value::Bool(false)),
                (BinaryOperator::NotEqual, Some(o)) => Some(Value::Bool(o != Ordering::Equal)),
                (BinaryOperator::NotEqual, None) => Some(Value::Bool(true)),
                (BinaryOperator::LessThan, Some(o)) => Some(Value::Bool(o == Ordering::Less)),
                (BinaryOperator::LessThanOrEqual, Some(o)) => {
                    Some(Value::Bool(o != Ordering::Greater))
                }
                (BinaryOperator::GreaterThan, Some(o)) => Some(Value::Bool(o == Ordering::Greater)),
                (BinaryOperator::GreaterThanOrEqual, Some(o)) => {
                    Some(Value::Bool(o != Ordering::Less))
                }
                _ => None,
            };
        }
        match op {
            BinaryOperator::Add => self.fold_add(left, right),
            BinaryOperator::Subtract => self.fold_numeric(left, right, i64::checked_sub, |a, b| a - b),
            BinaryOperator::Multiply => self.fold_numeric(left, right, i64::checked_mul, |a, b| a * b),
            BinaryOperator::Divide => self.fold_numeric(left, right, i64::checked_div, |a, b| {
                a / b
            }),
            BinaryOperator::Modulo => self.fold_numeric(left, right, i64::checked_rem, |a, b| a % b),
            BinaryOperator::Xor => match (left, right) {
                (Value::Bool(l), Value::Bool(r)) => Some(Value::Bool(l ^ r)),
                _ => None,
            },
            BinaryOperator::StartsWith => match (left, right) {
                (Value::String(l), Value::String(r)) => Some(Value::Bool(l.starts_with(r.as_str()))),
                _ => None,
            },
            BinaryOperator::EndsWith => match (left, right) {
                (Value::String(l), Value::String(r)) => Some(Value::Bool(l.ends_with(r.as_str()))),
                _ => None,
            },
            BinaryOperator::Contains => match (left, right) {
                (Value::String(l), Value::String(r)) => Some(Value::Bool(l.contains(r.as_str()))),
                _ => None,
            },
            _ => None,
        }
    }

    fn fold_add(&self, left: &Value, right: &Value) -> Option<Value> {
        match (left, right) {
            (Value::String(l), Value::String(r)) => Some(Value::String(format!("{}{}", l, r))),
            _ => self.fold_numeric(left, right, i64::checked_add, |a, b| a + b),
        }
    }

    /// 整数运算溢出或除零时不折叠，留给运行期报错
    fn fold_numeric(
        &self,
        left: &Value,
        right: &Value,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Option<Value> {
        match (left, right) {
            (Value::Int(l), Value::Int(r)) => int_op(*l, *r).map(Value::Int),
            (Value::Float(l), Value::Float(r)) => Some(Value::Float(float_op(*l, *r))),
            (Value::Int(l), Value::Float(r)) => Some(Value::Float(float_op(*l as f64, *r))),
            (Value::Float(l), Value::Int(r)) => Some(Value::Float(float_op(*l, *r as f64))),
            _ => None,
        }
    }
}
