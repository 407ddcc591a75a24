//! 计划的文本化描述
//!
//! 每个节点一行，子节点缩进两格：
//! ```text
//! SingleMatchNode[12] {a: VERTEX[COMMENT], ...}
//!   GetVNode[11] alias=c opt=END {..}
//! ```

use serde::{Deserialize, Serialize};

use super::nodes::plan_node_enum::PlanNodeEnum;

/// 节点描述键值对
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 单个节点的描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanNodeDescription {
    pub name: String,
    pub id: i64,
    pub depth: usize,
    pub description: Vec<Pair>,
    pub output: String,
}

impl PlanNodeDescription {
    pub fn new(name: impl Into<String>, id: i64, depth: usize) -> Self {
        Self {
            name: name.into(),
            id,
            depth,
            description: Vec::new(),
            output: String::new(),
        }
    }

    pub fn with_description(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.description.push(Pair::new(key, value));
        self
    }

    fn render(&self) -> String {
        let mut line = format!("{}{}[{}]", "  ".repeat(self.depth), self.name, self.id);
        for pair in &self.description {
            line.push_str(&format!(" {}={}", pair.key, pair.value));
        }
        line.push(' ');
        line.push_str(&self.output);
        line
    }
}

fn describe(node: &PlanNodeEnum, depth: usize) -> PlanNodeDescription {
    let desc = PlanNodeDescription::new(node.name(), node.id(), depth);
    let desc = match node {
        PlanNodeEnum::Source(n) => {
            let desc = desc.with_description("alias", n.alias());
            match n.fused_filter() {
                Some(filter) => desc.with_description("filter", filter.to_string()),
                None => desc,
            }
        }
        PlanNodeEnum::Expand(n) => desc
            .with_description("alias", n.alias())
            .with_description("start", n.start_alias())
            .with_description("direction", n.direction().to_string()),
        PlanNodeEnum::GetV(n) => {
            let desc = desc
                .with_description("alias", n.alias())
                .with_description("opt", n.opt().to_string());
            match n.fused_filter() {
                Some(filter) => desc.with_description("filter", filter.to_string()),
                None => desc,
            }
        }
        PlanNodeEnum::PathExpand(n) => desc
            .with_description("alias", n.alias())
            .with_description("start", n.start_alias())
            .with_description("range", n.range().to_string())
            .with_description("path", n.path_opt().to_string())
            .with_description("result", n.result_opt().to_string()),
        PlanNodeEnum::Project(n) => {
            let columns: Vec<String> = n
                .columns()
                .iter()
                .map(|c| format!("{} AS {}", c.expr, c.alias))
                .collect();
            desc.with_description("columns", format!("[{}]", columns.join(", ")))
                .with_description("append", n.is_append().to_string())
        }
        PlanNodeEnum::Filter(n) => desc.with_description("condition", n.condition().to_string()),
        PlanNodeEnum::Aggregate(n) => {
            let keys: Vec<String> = n.keys().iter().map(|k| k.alias.clone()).collect();
            let calls: Vec<String> = n
                .calls()
                .iter()
                .map(|c| format!("{}({}) AS {}", c.func, c.arg, c.alias))
                .collect();
            desc.with_description("keys", format!("[{}]", keys.join(", ")))
                .with_description("calls", format!("[{}]", calls.join(", ")))
        }
        PlanNodeEnum::Sort(n) => {
            let keys: Vec<String> = n
                .keys()
                .iter()
                .map(|k| format!("{} {}", k.expr, k.direction.name()))
                .collect();
            let desc = desc.with_description("keys", format!("[{}]", keys.join(", ")));
            match n.limit() {
                Some(limit) => desc.with_description("limit", limit.to_string()),
                None => desc,
            }
        }
        PlanNodeEnum::SingleMatch(n) => desc.with_description("kind", n.kind().to_string()),
        PlanNodeEnum::MultiMatch(_) | PlanNodeEnum::Empty(_) => desc,
    };
    PlanNodeDescription {
        output: node.row_type().to_string(),
        ..desc
    }
}

/// 深度优先收集节点描述
pub fn describe_plan(root: &PlanNodeEnum) -> Vec<PlanNodeDescription> {
    let mut descriptions = Vec::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        descriptions.push(describe(node, depth));
        for child in node.children().into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    descriptions
}

/// 以缩进树的形式渲染计划
pub fn explain(root: &PlanNodeEnum) -> String {
    describe_plan(root)
        .iter()
        .map(PlanNodeDescription::render)
        .collect::<Vec<_>>()
        .join("\n")
}
