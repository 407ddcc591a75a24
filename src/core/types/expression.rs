//! 表达式类型定义
//!
//! 过滤条件、投影列、排序键和聚合参数共用的表达式树

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::core::types::operators::{AggregateFunction, BinaryOperator, UnaryOperator};
use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    // 字面量
    Literal(Value),

    // 别名引用
    Variable(String),

    // 属性访问 alias.prop
    Property {
        alias: String,
        property: String,
    },

    // 二元操作
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    // 一元操作
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    // 函数调用
    Function {
        name: String,
        args: Vec<Expression>,
    },

    // 聚合函数
    Aggregate {
        func: AggregateFunction,
        arg: Box<Expression>,
    },

    // 列表
    List(Vec<Expression>),
}

impl Expression {
    /// 创建字面量表达式
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// 创建别名引用表达式
    pub fn variable(alias: impl Into<String>) -> Self {
        Expression::Variable(alias.into())
    }

    /// 创建属性访问表达式
    pub fn property(alias: impl Into<String>, property: impl Into<String>) -> Self {
        Expression::Property {
            alias: alias.into(),
            property: property.into(),
        }
    }

    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function {
            name: name.into(),
            args,
        }
    }

    pub fn aggregate(func: AggregateFunction, arg: Expression) -> Self {
        Expression::Aggregate {
            func,
            arg: Box::new(arg),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary(left, BinaryOperator::And, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary(left, BinaryOperator::Or, right)
    }

    pub fn not(operand: Expression) -> Self {
        Self::unary(UnaryOperator::Not, operand)
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::binary(left, BinaryOperator::Equal, right)
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::binary(left, BinaryOperator::GreaterThan, right)
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::binary(left, BinaryOperator::LessThan, right)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Expression::Variable(_))
    }

    pub fn as_bool_literal(&self) -> Option<bool> {
        match self {
            Expression::Literal(v) => v.as_bool(),
            _ => None,
        }
    }

    /// 子表达式（直接子节点）
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Literal(_) | Expression::Variable(_) | Expression::Property { .. } => {
                Vec::new()
            }
            Expression::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expression::Unary { operand, .. } => vec![operand.as_ref()],
            Expression::Function { args, .. } => args.iter().collect(),
            Expression::Aggregate { arg, .. } => vec![arg.as_ref()],
            Expression::List(items) => items.iter().collect(),
        }
    }

    /// 收集所有属性引用 (alias, property)，按出现顺序去重
    pub fn property_refs(&self) -> Vec<(String, String)> {
        let mut refs = Vec::new();
        self.collect_property_refs(&mut refs);
        refs
    }

    fn collect_property_refs(&self, refs: &mut Vec<(String, String)>) {
        if let Expression::Property { alias, property } = self {
            let pair = (alias.clone(), property.clone());
            if !refs.contains(&pair) {
                refs.push(pair);
            }
        }
        for child in self.children() {
            child.collect_property_refs(refs);
        }
    }

    /// 表达式引用到的全部别名
    pub fn referenced_aliases(&self) -> BTreeSet<String> {
        let mut aliases = BTreeSet::new();
        self.collect_aliases(&mut aliases);
        aliases
    }

    fn collect_aliases(&self, aliases: &mut BTreeSet<String>) {
        match self {
            Expression::Variable(alias) => {
                aliases.insert(alias.clone());
            }
            Expression::Property { alias, .. } => {
                aliases.insert(alias.clone());
            }
            _ => {}
        }
        for child in self.children() {
            child.collect_aliases(aliases);
        }
    }

    pub fn contains_aggregate(&self) -> bool {
        matches!(self, Expression::Aggregate { .. })
            || self.children().iter().any(|c| c.contains_aggregate())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(v) => write!(f, "{}", v),
            Expression::Variable(alias) => write!(f, "{}", alias),
            Expression::Property { alias, property } => write!(f, "{}.{}", alias, property),
            Expression::Binary { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expression::Unary { op, operand } => match op {
                UnaryOperator::IsNull | UnaryOperator::IsNotNull => {
                    write!(f, "({} {})", operand, op)
                }
                _ => write!(f, "({} {})", op, operand),
            },
            Expression::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expression::Aggregate { func, arg } => write!(f, "{}({})", func, arg),
            Expression::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_refs_are_deduplicated() {
        let expr = Expression::and(
            Expression::gt(Expression::property("a", "age"), Expression::literal(18)),
            Expression::lt(Expression::property("a", "age"), Expression::property("b", "age")),
        );
        assert_eq!(
            expr.property_refs(),
            vec![
                ("a".to_string(), "age".to_string()),
                ("b".to_string(), "age".to_string())
            ]
        );
        assert_eq!(expr.referenced_aliases().len(), 2);
    }

    #[test]
    fn test_display() {
        let expr = Expression::eq(Expression::property("a", "name"), Expression::literal("Tom"));
        assert_eq!(expr.to_string(), "(a.name = 'Tom')");
    }

    #[test]
    fn test_contains_aggregate() {
        let expr = Expression::aggregate(AggregateFunction::Count, Expression::variable("a"));
        assert!(expr.contains_aggregate());
        assert!(!Expression::variable("a").contains_aggregate());
    }
}
