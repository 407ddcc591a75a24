//! 模式类型推导
//!
//! 以边为单位做约束传播，直到不动点：
//! 1. 边的候选关系只保留端点都落在当前顶点类型内的条目
//! 2. 端点顶点类型收窄到剩余关系给出的标签
//! 3. 顶点类型变化后，把与之相连的边重新放入工作队列
//!
//! 类型只会收窄，因此传播必然终止；结果与队列初始顺序无关。

use std::collections::{BTreeSet, VecDeque};

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::{EdgeDirection, ElementKind, LabelEntry, LabelRef, LabelType};
use crate::query::validator::pattern::Pattern;

pub const DEFAULT_MAX_INFERENCE_ROUNDS: usize = 10_000;

/// 单个模式元素的推导记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementReport {
    pub alias: String,
    pub kind: ElementKind,
    pub initial_entries: usize,
    pub final_entries: usize,
}

/// 一次推导的诊断信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceReport {
    pub rounds: usize,
    pub elements: Vec<ElementReport>,
}

impl InferenceReport {
    pub fn element(&self, alias: &str) -> Option<&ElementReport> {
        self.elements.iter().find(|e| e.alias == alias)
    }

    /// 没有任何元素的候选条目变多
    pub fn is_monotone(&self) -> bool {
        self.elements
            .iter()
            .all(|e| e.final_entries <= e.initial_entries)
    }
}

pub struct TypeInference {
    max_rounds: usize,
}

impl Default for TypeInference {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INFERENCE_ROUNDS)
    }
}

fn describe(label_type: &LabelType) -> String {
    match label_type.kind() {
        ElementKind::Vertex => format!("VERTEX{}", label_type),
        ElementKind::Edge => format!("EDGE{}", label_type),
    }
}

/// 条目在给定方向下的 (起点标签, 终点标签) 组合
fn orientations(entry: &LabelEntry, direction: EdgeDirection) -> Vec<(&LabelRef, &LabelRef)> {
    match (entry.src(), entry.dst()) {
        (Some(src), Some(dst)) => match direction {
            EdgeDirection::Out => vec![(src, dst)],
            EdgeDirection::In => vec![(dst, src)],
            EdgeDirection::Both => vec![(src, dst), (dst, src)],
        },
        _ => Vec::new(),
    }
}

impl TypeInference {
    pub fn new(max_rounds: usize) -> Self {
        Self { max_rounds }
    }

    pub fn infer(&self, pattern: &mut Pattern) -> PlanResult<InferenceReport> {
        let order: Vec<usize> = (0..pattern.edges().len()).collect();
        self.infer_with_order(pattern, &order)
    }

    /// 指定工作队列的初始顺序；未出现在 order 中的边排在最后
    pub fn infer_with_order(
        &self,
        pattern: &mut Pattern,
        order: &[usize],
    ) -> PlanResult<InferenceReport> {
        let edge_count = pattern.edges().len();
        let mut queued = vec![false; edge_count];
        let mut queue = VecDeque::with_capacity(edge_count);
        for idx in order.iter().copied().chain(0..edge_count) {
            if idx >= edge_count {
                return Err(PlanError::Internal(format!("推导顺序中的边下标越界: {}", idx)));
            }
            if !queued[idx] {
                queued[idx] = true;
                queue.push_back(idx);
            }
        }

        let initial: Vec<(String, ElementKind, usize)> = pattern
            .vertices()
            .iter()
            .map(|v| (v.alias.clone(), ElementKind::Vertex, v.label_type.len()))
            .chain(
                pattern
                    .edges()
                    .iter()
                    .map(|e| (e.alias.clone(), ElementKind::Edge, e.label_type.len())),
            )
            .collect();

        let mut rounds = 0;
        while let Some(idx) = queue.pop_front() {
            queued[idx] = false;
            rounds += 1;
            if rounds > self.max_rounds {
                return Err(PlanError::Internal(format!(
                    "类型推导超过最大轮数 {}",
                    self.max_rounds
                )));
            }
            for vertex in self.propagate(pattern, idx)? {
                for touching in pattern.edges_touching(vertex) {
                    if !queued[touching] {
                        queued[touching] = true;
                        queue.push_back(touching);
                    }
                }
            }
        }

        let finals = pattern
            .vertices()
            .iter()
            .map(|v| v.label_type.len())
            .chain(pattern.edges().iter().map(|e| e.label_type.len()));
        let elements = initial
            .into_iter()
            .zip(finals)
            .map(|((alias, kind, initial_entries), final_entries)| ElementReport {
                alias,
                kind,
                initial_entries,
                final_entries,
            })
            .collect();

        log::debug!("类型推导完成: {} 轮", rounds);
        Ok(InferenceReport { rounds, elements })
    }

    /// 处理一条边，返回类型发生变化的顶点
    fn propagate(&self, pattern: &mut Pattern, idx: usize) -> PlanResult<Vec<usize>> {
        let edge = pattern.edges()[idx].clone();
        let start_type = pattern.vertices()[edge.start].label_type.clone();
        let end_type = pattern.vertices()[edge.end].label_type.clone();
        let start_labels = start_type.labels();
        let end_labels = end_type.labels();
        let self_loop = edge.start == edge.end;

        let (new_start, new_end): (BTreeSet<LabelRef>, BTreeSet<LabelRef>) = match edge.hops {
            Some(range) if range.allows_zero() => return Ok(Vec::new()),
            Some(_) => {
                // 多跳路径只约束端点：起点能出发，终点能到达
                let mut starts = BTreeSet::new();
                let mut ends = BTreeSet::new();
                for entry in edge.label_type.entries() {
                    for (s, e) in orientations(entry, edge.direction) {
                        if start_labels.contains(s) {
                            starts.insert(s.clone());
                        }
                        if end_labels.contains(e) {
                            ends.insert(e.clone());
                        }
                    }
                }
                if let Some(inner) = &edge.path_end_type {
                    let inner_labels = inner.labels();
                    ends.retain(|l| inner_labels.contains(l));
                }
                if starts.is_empty() {
                    return Err(PlanError::incompatible(
                        describe(&start_type),
                        describe(&edge.label_type),
                        pattern.describe_edge(idx),
                    ));
                }
                if ends.is_empty() {
                    return Err(PlanError::incompatible(
                        describe(&end_type),
                        describe(&edge.label_type),
                        pattern.describe_edge(idx),
                    ));
                }
                (starts, ends)
            }
            None => {
                let compatible = |s: &LabelRef, e: &LabelRef| {
                    start_labels.contains(s) && end_labels.contains(e) && (!self_loop || s == e)
                };
                let narrowed = edge.label_type.retain(|entry| {
                    orientations(entry, edge.direction)
                        .into_iter()
                        .any(|(s, e)| compatible(s, e))
                });
                let narrowed = match narrowed {
                    Some(t) => t,
                    None => {
                        let start_fits = edge.label_type.entries().any(|entry| {
                            orientations(entry, edge.direction)
                                .into_iter()
                                .any(|(s, _)| start_labels.contains(s))
                        });
                        let conflicting = if start_fits { &end_type } else { &start_type };
                        return Err(PlanError::incompatible(
                            describe(conflicting),
                            describe(&edge.label_type),
                            pattern.describe_edge(idx),
                        ));
                    }
                };

                let mut starts = BTreeSet::new();
                let mut ends = BTreeSet::new();
                for entry in narrowed.entries() {
                    for (s, e) in orientations(entry, edge.direction) {
                        if compatible(s, e) {
                            starts.insert(s.clone());
                            ends.insert(e.clone());
                        }
                    }
                }
                if narrowed != edge.label_type {
                    log::debug!(
                        "边 {} 收窄: {} -> {}",
                        edge.alias,
                        edge.label_type,
                        narrowed
                    );
                    pattern.set_edge_type(idx, narrowed);
                }
                (starts, ends)
            }
        };

        let mut changed = Vec::new();
        for (vertex, current, labels) in [
            (edge.start, &start_type, &new_start),
            (edge.end, &end_type, &new_end),
        ] {
            if self_loop && vertex == edge.end && changed.contains(&vertex) {
                continue;
            }
            let restricted = current.restrict_labels(labels).ok_or_else(|| {
                PlanError::incompatible(
                    describe(current),
                    describe(&edge.label_type),
                    pattern.describe_edge(idx),
                )
            })?;
            if &restricted != current {
                log::debug!(
                    "顶点 {} 收窄: {} -> {}",
                    pattern.vertices()[vertex].alias,
                    current,
                    restricted
                );
                pattern.set_vertex_type(vertex, restricted);
                changed.push(vertex);
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::validator::pattern::PatternEdge;

    fn v(id: i32, name: &str) -> LabelRef {
        LabelRef::new(id, name)
    }

    fn vertices(labels: &[LabelRef]) -> LabelType {
        LabelType::vertices(labels.to_vec()).expect("非空")
    }

    fn edges(entries: Vec<LabelEntry>) -> LabelType {
        LabelType::from_entries(entries).expect("非空")
    }

    fn all_vertices() -> LabelType {
        vertices(&[v(0, "PERSON"), v(1, "COMMENT"), v(2, "POST"), v(3, "FORUM")])
    }

    fn reply_of() -> LabelType {
        let r = v(1, "REPLYOF");
        edges(vec![
            LabelEntry::edge(r.clone(), v(1, "COMMENT"), v(2, "POST")),
            LabelEntry::edge(r, v(1, "COMMENT"), v(1, "COMMENT")),
        ])
    }

    fn container_of() -> LabelType {
        edges(vec![LabelEntry::edge(v(2, "CONTAINEROF"), v(3, "FORUM"), v(2, "POST"))])
    }

    #[test]
    fn test_reply_of_container_of() {
        let mut pattern = Pattern::new();
        let a = pattern.add_vertex("a", all_vertices()).expect("加入");
        let c = pattern.add_vertex("c", all_vertices()).expect("加入");
        let d = pattern.add_vertex("d", all_vertices()).expect("加入");
        pattern
            .add_edge(PatternEdge::single("b", a, c, EdgeDirection::Out, reply_of()))
            .expect("加入");
        pattern
            .add_edge(PatternEdge::single("e", c, d, EdgeDirection::In, container_of()))
            .expect("加入");

        let report = TypeInference::default().infer(&mut pattern).expect("可推导");
        assert_eq!(pattern.vertex_type("a"), Some(&vertices(&[v(1, "COMMENT")])));
        assert_eq!(pattern.vertex_type("c"), Some(&vertices(&[v(2, "POST")])));
        assert_eq!(pattern.vertex_type("d"), Some(&vertices(&[v(3, "FORUM")])));
        assert_eq!(pattern.edge_type("b").map(|t| t.len()), Some(1));
        assert!(report.is_monotone());
        assert_eq!(report.element("b").map(|e| e.initial_entries), Some(2));
    }

    #[test]
    fn test_incompatible_endpoints() {
        let mut pattern = Pattern::new();
        let a = pattern.add_vertex("a", vertices(&[v(0, "PERSON")])).expect("加入");
        let b = pattern.add_vertex("b", vertices(&[v(0, "PERSON")])).expect("加入");
        pattern
            .add_edge(PatternEdge::single("c", a, b, EdgeDirection::Out, reply_of()))
            .expect("加入");
        match TypeInference::default().infer(&mut pattern) {
            Err(PlanError::IncompatiblePattern { left, right, edge }) => {
                assert_eq!(left, "VERTEX[PERSON]");
                assert!(right.contains("REPLYOF"));
                assert_eq!(edge, "(a)-[c]->(b)");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_both_direction_unions_orientations() {
        let mut pattern = Pattern::new();
        let a = pattern.add_vertex("a", vertices(&[v(2, "POST")])).expect("加入");
        let b = pattern.add_vertex("b", all_vertices()).expect("加入");
        pattern
            .add_edge(PatternEdge::single("r", a, b, EdgeDirection::Both, reply_of()))
            .expect("加入");
        TypeInference::default().infer(&mut pattern).expect("可推导");
        assert_eq!(pattern.vertex_type("b"), Some(&vertices(&[v(1, "COMMENT")])));
        assert_eq!(pattern.edge_type("r").map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_zero_hop_path_does_not_constrain() {
        let mut pattern = Pattern::new();
        let a = pattern.add_vertex("a", vertices(&[v(0, "PERSON")])).expect("加入");
        let b = pattern.add_vertex("b", all_vertices()).expect("加入");
        pattern
            .add_edge(PatternEdge::path(
                "p",
                a,
                b,
                EdgeDirection::Out,
                reply_of(),
                crate::core::types::PathRange::new(0, 3),
                all_vertices(),
            ))
            .expect("加入");
        TypeInference::default().infer(&mut pattern).expect("可推导");
        assert_eq!(pattern.vertex_type("b").map(|t| t.len()), Some(4));
    }

    #[test]
    fn test_multi_hop_path_constrains_endpoints() {
        let mut pattern = Pattern::new();
        let a = pattern.add_vertex("a", all_vertices()).expect("加入");
        let b = pattern.add_vertex("b", all_vertices()).expect("加入");
        pattern
            .add_edge(PatternEdge::path(
                "p",
                a,
                b,
                EdgeDirection::Out,
                reply_of(),
                crate::core::types::PathRange::new(1, 4),
                all_vertices(),
            ))
            .expect("加入");
        TypeInference::default().infer(&mut pattern).expect("可推导");
        assert_eq!(pattern.vertex_type("a"), Some(&vertices(&[v(1, "COMMENT")])));
        assert_eq!(
            pattern.vertex_type("b"),
            Some(&vertices(&[v(1, "COMMENT"), v(2, "POST")]))
        );
        assert_eq!(pattern.edge_type("p").map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_round_limit() {
        let mut pattern = Pattern::new();
        let a = pattern.add_vertex("a", all_vertices()).expect("加入");
        let c = pattern.add_vertex("c", all_vertices()).expect("加入");
        pattern
            .add_edge(PatternEdge::single("b", a, c, EdgeDirection::Out, reply_of()))
            .expect("加入");
        let result = TypeInference::new(0).infer(&mut pattern);
        assert!(matches!(result, Err(PlanError::Internal(_))));
    }

    #[test]
    fn test_out_of_range_order() {
        let mut pattern = Pattern::new();
        let result = TypeInference::default().infer_with_order(&mut pattern, &[3]);
        assert!(matches!(result, Err(PlanError::Internal(_))));
    }
}
