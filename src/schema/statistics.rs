//! 图统计信息接口
//!
//! 基于代价的优化器使用的基数估计，本模块只负责提供，不做解释

use std::collections::HashMap;

/// 统计信息提供者
pub trait GraphStatistics: Send + Sync {
    fn vertex_count(&self) -> u64;

    fn edge_count(&self) -> u64;

    fn vertex_type_count(&self, label_id: i32) -> u64;

    /// 按 (源顶点标签, 边标签, 目标顶点标签) 统计边数，None 表示不限
    fn edge_type_count(&self, src: Option<i32>, edge: Option<i32>, dst: Option<i32>) -> u64;
}

/// 基于内存表的统计信息
#[derive(Debug, Clone, Default)]
pub struct StaticStatistics {
    vertex_counts: HashMap<i32, u64>,
    edge_counts: HashMap<(i32, i32, i32), u64>,
}

impl StaticStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertex_count(mut self, label_id: i32, count: u64) -> Self {
        self.vertex_counts.insert(label_id, count);
        self
    }

    pub fn with_edge_count(mut self, src: i32, edge: i32, dst: i32, count: u64) -> Self {
        self.edge_counts.insert((src, edge, dst), count);
        self
    }
}

impl GraphStatistics for StaticStatistics {
    fn vertex_count(&self) -> u64 {
        self.vertex_counts.values().sum()
    }

    fn edge_count(&self) -> u64 {
        self.edge_counts.values().sum()
    }

    fn vertex_type_count(&self, label_id: i32) -> u64 {
        self.vertex_counts.get(&label_id).copied().unwrap_or(0)
    }

    fn edge_type_count(&self, src: Option<i32>, edge: Option<i32>, dst: Option<i32>) -> u64 {
        let matches = |want: Option<i32>, actual: i32| want.map_or(true, |w| w == actual);
        self.edge_counts
            .iter()
            .filter(|((s, e, d), _)| matches(src, *s) && matches(edge, *e) && matches(dst, *d))
            .map(|(_, count)| *count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_statistics() {
        let stats = StaticStatistics::new()
            .with_vertex_count(0, 100)
            .with_vertex_count(1, 50)
            .with_edge_count(1, 0, 2, 30)
            .with_edge_count(1, 0, 1, 20)
            .with_edge_count(3, 1, 2, 5);

        assert_eq!(stats.vertex_count(), 150);
        assert_eq!(stats.edge_count(), 55);
        assert_eq!(stats.vertex_type_count(1), 50);
        assert_eq!(stats.vertex_type_count(9), 0);
        assert_eq!(stats.edge_type_count(Some(1), Some(0), None), 50);
        assert_eq!(stats.edge_type_count(None, None, Some(2)), 35);
        assert_eq!(stats.edge_type_count(None, None, None), 55);
    }
}
