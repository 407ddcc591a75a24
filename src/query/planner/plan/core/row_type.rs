//! 计划节点输出行类型
//!
//! 有序的 (别名, 类型描述符) 列表

use std::fmt;

use crate::core::types::TypeDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowColumn {
    pub alias: String,
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RowType {
    columns: Vec<RowColumn>,
}

impl RowType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(alias: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self::new().with_column(alias, ty)
    }

    /// 追加一列；同名列会被替换
    pub fn with_column(mut self, alias: impl Into<String>, ty: TypeDescriptor) -> Self {
        let alias = alias.into();
        match self.columns.iter_mut().find(|c| c.alias == alias) {
            Some(column) => column.ty = ty,
            None => self.columns.push(RowColumn { alias, ty }),
        }
        self
    }

    pub fn columns(&self) -> &[RowColumn] {
        &self.columns
    }

    pub fn get(&self, alias: &str) -> Option<&TypeDescriptor> {
        self.columns.iter().find(|c| c.alias == alias).map(|c| &c.ty)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    pub fn aliases(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.alias.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// 只保留满足条件的列
    pub fn filter<F>(&self, mut keep: F) -> RowType
    where
        F: FnMut(&RowColumn) -> bool,
    {
        RowType {
            columns: self.columns.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }

    /// 合并另一行类型，已有的列保持原位置并取对方的类型
    pub fn merge(&self, other: &RowType) -> RowType {
        other
            .columns
            .iter()
            .fold(self.clone(), |acc, c| acc.with_column(c.alias.clone(), c.ty.clone()))
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", column.alias, column.ty)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_column_replaces_existing() {
        let row = RowType::single("a", TypeDescriptor::Any)
            .with_column("b", TypeDescriptor::text())
            .with_column("a", TypeDescriptor::bigint());
        assert_eq!(row.aliases(), vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&TypeDescriptor::bigint()));
        assert_eq!(row.to_string(), "{a: INT64, b: TEXT}");
    }

    #[test]
    fn test_merge_and_filter() {
        let left = RowType::single("a", TypeDescriptor::Any);
        let right = RowType::single("b", TypeDescriptor::text()).with_column("a", TypeDescriptor::boolean());
        let merged = left.merge(&right);
        assert_eq!(merged.aliases(), vec!["a", "b"]);
        assert_eq!(merged.get("a"), Some(&TypeDescriptor::boolean()));
        assert_eq!(merged.filter(|c| c.alias != "a").aliases(), vec!["b"]);
    }
}
