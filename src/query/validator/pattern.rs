//! 模式图
//!
//! 顶点按别名去重（多个句子共享同一别名即连接在一起），
//! 边记录扩展起点、终点、方向与当前标签类型。

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::{EdgeDirection, LabelType, PathRange};

#[derive(Debug, Clone, PartialEq)]
pub struct PatternVertex {
    pub alias: String,
    pub label_type: LabelType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternEdge {
    pub alias: String,
    /// 扩展起点
    pub start: usize,
    /// 扩展终点
    pub end: usize,
    pub direction: EdgeDirection,
    pub label_type: LabelType,
    /// 路径跳数范围，None 表示单条边
    pub hops: Option<PathRange>,
    /// 路径内部 GetV 的标签约束，只作用于路径终点
    pub path_end_type: Option<LabelType>,
}

impl PatternEdge {
    pub fn single(
        alias: impl Into<String>,
        start: usize,
        end: usize,
        direction: EdgeDirection,
        label_type: LabelType,
    ) -> Self {
        Self {
            alias: alias.into(),
            start,
            end,
            direction,
            label_type,
            hops: None,
            path_end_type: None,
        }
    }

    pub fn path(
        alias: impl Into<String>,
        start: usize,
        end: usize,
        direction: EdgeDirection,
        label_type: LabelType,
        range: PathRange,
        path_end_type: LabelType,
    ) -> Self {
        Self {
            alias: alias.into(),
            start,
            end,
            direction,
            label_type,
            hops: Some(range),
            path_end_type: Some(path_end_type),
        }
    }

    pub fn is_path(&self) -> bool {
        self.hops.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    vertices: Vec<PatternVertex>,
    edges: Vec<PatternEdge>,
    vertex_index: HashMap<String, usize>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入顶点；别名已存在时与已有类型求交
    pub fn add_vertex(&mut self, alias: &str, label_type: LabelType) -> PlanResult<usize> {
        if !label_type.is_vertex() {
            return Err(PlanError::illegal(format!(
                "别名 {} 绑定到顶点位置但类型是 {}",
                alias, label_type
            )));
        }
        if self.edges.iter().any(|e| e.alias == alias) {
            return Err(PlanError::DuplicateAlias(alias.to_string()));
        }
        if let Some(&idx) = self.vertex_index.get(alias) {
            let existing = &self.vertices[idx].label_type;
            let narrowed = existing
                .intersect(&label_type)
                .ok_or_else(|| PlanError::incompatible(existing, &label_type, format!("({})", alias)))?;
            self.vertices[idx].label_type = narrowed;
            return Ok(idx);
        }
        let idx = self.vertices.len();
        self.vertices.push(PatternVertex {
            alias: alias.to_string(),
            label_type,
        });
        self.vertex_index.insert(alias.to_string(), idx);
        Ok(idx)
    }

    pub fn add_edge(&mut self, edge: PatternEdge) -> PlanResult<usize> {
        if !edge.label_type.is_edge() {
            return Err(PlanError::illegal(format!(
                "别名 {} 绑定到边位置但类型是 {}",
                edge.alias, edge.label_type
            )));
        }
        if self.vertex_index.contains_key(&edge.alias)
            || self.edges.iter().any(|e| e.alias == edge.alias)
        {
            return Err(PlanError::DuplicateAlias(edge.alias));
        }
        if edge.start >= self.vertices.len() || edge.end >= self.vertices.len() {
            return Err(PlanError::Internal(format!("边 {} 的端点不存在", edge.alias)));
        }
        self.edges.push(edge);
        Ok(self.edges.len() - 1)
    }

    pub fn vertices(&self) -> &[PatternVertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[PatternEdge] {
        &self.edges
    }

    pub fn vertex_index(&self, alias: &str) -> Option<usize> {
        self.vertex_index.get(alias).copied()
    }

    pub fn vertex_type(&self, alias: &str) -> Option<&LabelType> {
        self.vertex_index(alias).map(|idx| &self.vertices[idx].label_type)
    }

    pub fn edge_type(&self, alias: &str) -> Option<&LabelType> {
        self.edges
            .iter()
            .find(|e| e.alias == alias)
            .map(|e| &e.label_type)
    }

    pub(crate) fn set_vertex_type(&mut self, idx: usize, label_type: LabelType) {
        self.vertices[idx].label_type = label_type;
    }

    pub(crate) fn set_edge_type(&mut self, idx: usize, label_type: LabelType) {
        self.edges[idx].label_type = label_type;
    }

    /// 与顶点相连的边
    pub fn edges_touching(&self, vertex: usize) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.start == vertex || e.end == vertex)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// 可读的边描述，如 `(a)-[b]->(c)`
    pub fn describe_edge(&self, idx: usize) -> String {
        let edge = &self.edges[idx];
        let start = &self.vertices[edge.start].alias;
        let end = &self.vertices[edge.end].alias;
        let body = match edge.hops {
            Some(range) => format!("[{}*{}]", edge.alias, range),
            None => format!("[{}]", edge.alias),
        };
        match edge.direction {
            EdgeDirection::Out => format!("({})-{}->({})", start, body, end),
            EdgeDirection::In => format!("({})<-{}-({})", start, body, end),
            EdgeDirection::Both => format!("({})-{}-({})", start, body, end),
        }
    }

    /// 所有顶点是否通过边连通
    pub fn is_connected(&self) -> bool {
        if self.vertices.is_empty() {
            return true;
        }
        let mut seen = HashSet::from([0usize]);
        let mut queue = VecDeque::from([0usize]);
        while let Some(v) = queue.pop_front() {
            for idx in self.edges_touching(v) {
                let edge = &self.edges[idx];
                let other = if edge.start == v { edge.end } else { edge.start };
                if seen.insert(other) {
                    queue.push_back(other);
                }
            }
        }
        seen.len() == self.vertices.len()
    }
}
