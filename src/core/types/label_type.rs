//! 图标签类型
//!
//! 模式元素的类型是一个非空、有序的标签条目集合：
//! - 顶点条目 = {label}
//! - 边条目 = {label, srcLabel, dstLabel}
//!
//! 集合大小为 1 时称为“已确定”，大于 1 时称为“模糊”。
//! 类型之间只通过集合交/并运算进行收窄与合并，空集合不可构造。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 模式元素种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Vertex => write!(f, "顶点"),
            ElementKind::Edge => write!(f, "边"),
        }
    }
}

/// 标签引用（ID + 名称）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LabelRef {
    pub id: i32,
    pub name: String,
}

impl LabelRef {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// 尚未解析 ID 的引用，由 Schema 构建器补全
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::new(-1, name)
    }

    pub fn is_resolved(&self) -> bool {
        self.id >= 0
    }
}

impl fmt::Display for LabelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// 标签条目
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LabelEntry {
    Vertex {
        label: LabelRef,
    },
    Edge {
        label: LabelRef,
        src: LabelRef,
        dst: LabelRef,
    },
}

impl LabelEntry {
    pub fn vertex(label: LabelRef) -> Self {
        LabelEntry::Vertex { label }
    }

    pub fn edge(label: LabelRef, src: LabelRef, dst: LabelRef) -> Self {
        LabelEntry::Edge { label, src, dst }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            LabelEntry::Vertex { .. } => ElementKind::Vertex,
            LabelEntry::Edge { .. } => ElementKind::Edge,
        }
    }

    pub fn label(&self) -> &LabelRef {
        match self {
            LabelEntry::Vertex { label } => label,
            LabelEntry::Edge { label, .. } => label,
        }
    }

    pub fn src(&self) -> Option<&LabelRef> {
        match self {
            LabelEntry::Edge { src, .. } => Some(src),
            LabelEntry::Vertex { .. } => None,
        }
    }

    pub fn dst(&self) -> Option<&LabelRef> {
        match self {
            LabelEntry::Edge { dst, .. } => Some(dst),
            LabelEntry::Vertex { .. } => None,
        }
    }
}

impl fmt::Display for LabelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelEntry::Vertex { label } => write!(f, "{}", label),
            LabelEntry::Edge { label, src, dst } => write!(f, "{}({}->{})", label, src, dst),
        }
    }
}

/// 标签类型：非空、同种类的标签条目集合
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelType {
    kind: ElementKind,
    entries: BTreeSet<LabelEntry>,
}

impl LabelType {
    /// 从条目构造标签类型
    ///
    /// 条目为空或种类混合时返回 None
    pub fn from_entries(entries: impl IntoIterator<Item = LabelEntry>) -> Option<Self> {
        let entries: BTreeSet<LabelEntry> = entries.into_iter().collect();
        let kind = entries.iter().next()?.kind();
        if entries.iter().any(|e| e.kind() != kind) {
            return None;
        }
        Some(Self { kind, entries })
    }

    /// 由顶点标签集合构造顶点类型
    pub fn vertices(labels: impl IntoIterator<Item = LabelRef>) -> Option<Self> {
        Self::from_entries(labels.into_iter().map(LabelEntry::vertex))
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_vertex(&self) -> bool {
        self.kind == ElementKind::Vertex
    }

    pub fn is_edge(&self) -> bool {
        self.kind == ElementKind::Edge
    }

    pub fn entries(&self) -> impl Iterator<Item = &LabelEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 恒为 false，保留以符合集合类型的惯用接口
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 只剩一个条目
    pub fn is_resolved(&self) -> bool {
        self.entries.len() == 1
    }

    /// 存在多个候选条目
    pub fn is_fuzzy(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn contains(&self, entry: &LabelEntry) -> bool {
        self.entries.contains(entry)
    }

    /// 去重后的标签集合（边类型按边标签去重）
    pub fn labels(&self) -> BTreeSet<LabelRef> {
        self.entries.iter().map(|e| e.label().clone()).collect()
    }

    /// 去重后的标签名，按标签 ID 排序
    pub fn label_names(&self) -> Vec<String> {
        self.labels().into_iter().map(|l| l.name).collect()
    }

    /// 边类型的全部源顶点标签
    pub fn src_labels(&self) -> BTreeSet<LabelRef> {
        self.entries.iter().filter_map(|e| e.src().cloned()).collect()
    }

    /// 边类型的全部目标顶点标签
    pub fn dst_labels(&self) -> BTreeSet<LabelRef> {
        self.entries.iter().filter_map(|e| e.dst().cloned()).collect()
    }

    /// 集合交；种类不同或交集为空时返回 None
    pub fn intersect(&self, other: &LabelType) -> Option<LabelType> {
        if self.kind != other.kind {
            return None;
        }
        Self::from_entries(self.entries.intersection(&other.entries).cloned())
    }

    /// 集合并；种类不同时返回 None
    pub fn union(&self, other: &LabelType) -> Option<LabelType> {
        if self.kind != other.kind {
            return None;
        }
        Self::from_entries(self.entries.union(&other.entries).cloned())
    }

    /// 保留满足条件的条目；结果为空时返回 None
    pub fn retain<F>(&self, mut predicate: F) -> Option<LabelType>
    where
        F: FnMut(&LabelEntry) -> bool,
    {
        Self::from_entries(self.entries.iter().filter(|e| predicate(e)).cloned())
    }

    /// 只保留标签属于给定集合的条目
    pub fn restrict_labels(&self, labels: &BTreeSet<LabelRef>) -> Option<LabelType> {
        self.retain(|e| labels.contains(e.label()))
    }

    pub fn is_subset_of(&self, other: &LabelType) -> bool {
        self.kind == other.kind && self.entries.is_subset(&other.entries)
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", entry)?;
        }
        write!(f, "]")
    }
}
