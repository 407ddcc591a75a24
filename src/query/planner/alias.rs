//! 别名作用域
//!
//! 单次编译内的别名注册表：别名 -> 当前类型描述符。
//! 推导收窄类型时替换描述符，不修改已构建的节点。

use std::collections::HashMap;

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::TypeDescriptor;
use crate::query::planner::plan::core::row_type::RowType;

/// 匿名别名前缀，解析器不会生成以此开头的别名
pub const ANONYMOUS_PREFIX: &str = "~_";

#[derive(Debug, Clone, Default)]
pub struct AliasScope {
    order: Vec<String>,
    bindings: HashMap<String, TypeDescriptor>,
    anonymous_counter: usize,
}

impl AliasScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_anonymous(alias: &str) -> bool {
        alias.starts_with(ANONYMOUS_PREFIX)
    }

    /// 生成新的匿名别名
    pub fn next_anonymous(&mut self) -> String {
        let alias = format!("{}{}", ANONYMOUS_PREFIX, self.anonymous_counter);
        self.anonymous_counter += 1;
        log::trace!("生成匿名别名: {}", alias);
        alias
    }

    /// 绑定新别名，已绑定时报 DuplicateAlias
    pub fn bind(&mut self, alias: &str, ty: TypeDescriptor) -> PlanResult<()> {
        if self.bindings.contains_key(alias) {
            return Err(PlanError::DuplicateAlias(alias.to_string()));
        }
        self.order.push(alias.to_string());
        self.bindings.insert(alias.to_string(), ty);
        Ok(())
    }

    /// 替换已绑定别名的描述符
    pub fn narrow(&mut self, alias: &str, ty: TypeDescriptor) -> PlanResult<()> {
        match self.bindings.get_mut(alias) {
            Some(slot) => {
                *slot = ty;
                Ok(())
            }
            None => Err(PlanError::AliasNotFound(alias.to_string())),
        }
    }

    pub fn get(&self, alias: &str) -> PlanResult<&TypeDescriptor> {
        self.bindings
            .get(alias)
            .ok_or_else(|| PlanError::AliasNotFound(alias.to_string()))
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.bindings.contains_key(alias)
    }

    /// 按绑定顺序排列的别名
    pub fn aliases(&self) -> &[String] {
        &self.order
    }

    /// 当前可见列组成的行类型
    pub fn row_type(&self) -> RowType {
        self.order.iter().fold(RowType::new(), |row, alias| match self.bindings.get(alias) {
            Some(ty) => row.with_column(alias.clone(), ty.clone()),
            None => row,
        })
    }

    /// 可见性重置为给定行类型（投影、聚合、匹配之后）
    pub fn reset(&mut self, row: &RowType) {
        self.order = row.aliases();
        self.bindings = row
            .columns()
            .iter()
            .map(|c| (c.alias.clone(), c.ty.clone()))
            .collect();
    }
}
