//! 逻辑计划构建器
//!
//! 外部解析器按调用顺序描述模式与关系算子：
//! `source -> expand -> get_v -> ... -> match_single/match_multi -> project/filter/aggregate/sort -> build`
//!
//! 句子内的节点在每一步都按当前类型重新构建；匹配时把全部句子组成模式图，
//! 推导到不动点后用最终类型再构建一次，返回的计划不含过时的类型。

use std::cell::Cell;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::CompilerConfig;
use crate::core::error::{PlanError, PlanResult, SchemaError};
use crate::core::types::{
    EdgeDirection, ElementKind, Expression, GetVOpt, LabelRef, LabelType, PathRange, PathSemantics,
    PathType, ResultSemantics, TypeDescriptor,
};
use crate::query::optimizer::constant_folding::{ConstantFolder, FilterClass};
use crate::query::planner::alias::AliasScope;
use crate::query::planner::plan::core::nodes::{
    AggregateCall, AggregateNode, EmptyNode, ExpandNode, FilterNode, GetVNode, MatchKind,
    MultiMatchNode, PathExpandNode, PlanNodeEnum, ProjectColumn, ProjectNode, SingleMatchNode,
    SortKey, SortNode, SourceNode,
};
use crate::query::planner::plan::LogicalPlan;
use crate::query::validator::deduce_type::{aggregate_output_type, check_predicate, deduce_type};
use crate::query::validator::pattern::{Pattern, PatternEdge};
use crate::query::validator::property_check::check_property_refs;
use crate::query::validator::type_inference::{InferenceReport, TypeInference};
use crate::schema::{GraphSchema, TypeConverter};

/// 标签选择：某一种类的全部标签，或按名称列出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSelector {
    All(ElementKind),
    Labels(Vec<String>),
}

impl LabelSelector {
    pub fn all_vertices() -> Self {
        LabelSelector::All(ElementKind::Vertex)
    }

    pub fn all_edges() -> Self {
        LabelSelector::All(ElementKind::Edge)
    }

    pub fn labels<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        LabelSelector::Labels(names.into_iter().map(Into::into).collect())
    }
}

/// 路径扩展参数，跳数范围为 [lower, upper)
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpandSpec {
    pub direction: EdgeDirection,
    pub edge: LabelSelector,
    pub vertex: LabelSelector,
    pub lower: i64,
    pub upper: i64,
    pub path_opt: PathSemantics,
    pub result_opt: ResultSemantics,
}

impl PathExpandSpec {
    pub fn new(
        direction: EdgeDirection,
        edge: LabelSelector,
        vertex: LabelSelector,
        lower: i64,
        upper: i64,
    ) -> Self {
        Self {
            direction,
            edge,
            vertex,
            lower,
            upper,
            path_opt: PathSemantics::Arbitrary,
            result_opt: ResultSemantics::EndV,
        }
    }

    pub fn with_semantics(mut self, path_opt: PathSemantics, result_opt: ResultSemantics) -> Self {
        self.path_opt = path_opt;
        self.result_opt = result_opt;
        self
    }
}

/// 句子中的一步，类型统一从别名作用域读取
#[derive(Debug, Clone)]
enum Step {
    Source {
        alias: String,
        kind: ElementKind,
        filter: Option<Expression>,
    },
    Expand {
        direction: EdgeDirection,
        alias: String,
        start_alias: String,
    },
    GetV {
        opt: GetVOpt,
        alias: String,
        filter: Option<Expression>,
    },
    PathExpand {
        direction: EdgeDirection,
        alias: String,
        start_alias: String,
        path_opt: PathSemantics,
        result_opt: ResultSemantics,
    },
    Filter {
        condition: Expression,
    },
    /// 恒假过滤，之前的子树替换为空结果；保留原条件供推导后检查
    Contradiction {
        condition: Expression,
    },
}

impl Step {
    fn is_structural(&self) -> bool {
        !matches!(self, Step::Filter { .. } | Step::Contradiction { .. })
    }
}

#[derive(Debug, Default)]
struct Sentence {
    steps: Vec<Step>,
    aliases: HashSet<String>,
    current: Option<PlanNodeEnum>,
    /// 被判定恒真而丢弃的条件，推导后仍需检查
    discarded: Vec<Expression>,
}

impl Sentence {
    fn last_structural(&self) -> Option<&Step> {
        self.steps.iter().rev().find(|s| s.is_structural())
    }
}

/// 等待端点的边
enum PendingEdge<'a> {
    Scan(&'a str),
    Expand {
        alias: &'a str,
        start: &'a str,
        direction: EdgeDirection,
    },
    Path {
        alias: &'a str,
        start: &'a str,
        direction: EdgeDirection,
    },
}

fn edge_text(direction: EdgeDirection, start: &str, alias: &str) -> String {
    match direction {
        EdgeDirection::Out => format!("({})-[{}]->()", start, alias),
        EdgeDirection::In => format!("({})<-[{}]-()", start, alias),
        EdgeDirection::Both => format!("({})-[{}]-()", start, alias),
    }
}

/// 单次编译的计划构建器
///
/// 持有编译期状态，不在线程间共享；构建出的 LogicalPlan 不可变
pub struct LogicalPlanBuilder {
    schema: Arc<GraphSchema>,
    scope: AliasScope,
    inference: TypeInference,
    folder: ConstantFolder,
    sentence: Option<Sentence>,
    sealed: Vec<Sentence>,
    root: Option<PlanNodeEnum>,
    reports: Vec<InferenceReport>,
    _not_sync: PhantomData<Cell<()>>,
}

impl LogicalPlanBuilder {
    pub fn new(schema: Arc<GraphSchema>) -> Self {
        Self {
            schema,
            scope: AliasScope::new(),
            inference: TypeInference::default(),
            folder: ConstantFolder::new(),
            sentence: None,
            sealed: Vec::new(),
            root: None,
            reports: Vec::new(),
            _not_sync: PhantomData,
        }
    }

    /// 按编译器配置创建构建器
    pub fn with_config(schema: Arc<GraphSchema>, config: &CompilerConfig) -> Self {
        Self::new(schema).with_max_inference_rounds(config.max_inference_rounds)
    }

    /// 推导轮数上限
    pub fn with_max_inference_rounds(mut self, max_rounds: usize) -> Self {
        self.inference = TypeInference::new(max_rounds);
        self
    }

    pub fn schema(&self) -> &GraphSchema {
        &self.schema
    }

    /// 当前打开句子按现有类型构建出的节点，推导前可能是模糊类型
    pub fn current(&self) -> Option<&PlanNodeEnum> {
        match &self.sentence {
            Some(sentence) => sentence.current.as_ref(),
            None => self.root.as_ref(),
        }
    }

    // ---------------------------------------------------------------
    // 模式句子
    // ---------------------------------------------------------------

    /// 开始一个新句子
    pub fn source(&mut self, selector: LabelSelector, alias: Option<&str>) -> PlanResult<&mut Self> {
        if self.root.is_some() {
            return Err(PlanError::illegal("模式句子必须出现在匹配之前"));
        }
        let (kind, label_type) = self.resolve_selector(&selector)?;
        let alias = self.resolve_alias(alias)?;
        let previous = self.sentence.replace(Sentence::default());
        let bound = match kind {
            ElementKind::Vertex => self.bind_vertex(&alias, label_type),
            ElementKind::Edge => self.bind_new(&alias, label_type),
        };
        if let Err(err) = bound {
            self.sentence = previous;
            return Err(err);
        }
        if let Some(open) = previous {
            self.sealed.push(open);
        }
        self.push_step(Step::Source {
            alias,
            kind,
            filter: None,
        })?;
        Ok(self)
    }

    /// 从句子当前的顶点沿边扩展
    pub fn expand(
        &mut self,
        direction: EdgeDirection,
        selector: LabelSelector,
        alias: Option<&str>,
    ) -> PlanResult<&mut Self> {
        let start_alias = self.head_vertex("Expand")?;
        let (kind, edge_type) = self.resolve_selector(&selector)?;
        if kind != ElementKind::Edge {
            return Err(PlanError::illegal("Expand 只能选择边标签"));
        }
        let alias = self.resolve_alias(alias)?;

        let start_type = self.label_type_of(&start_alias)?;
        let start_labels = start_type.labels();
        let narrowed = edge_type
            .retain(|entry| match (entry.src(), entry.dst()) {
                (Some(src), Some(dst)) => match direction {
                    EdgeDirection::Out => start_labels.contains(src),
                    EdgeDirection::In => start_labels.contains(dst),
                    EdgeDirection::Both => start_labels.contains(src) || start_labels.contains(dst),
                },
                _ => false,
            })
            .ok_or_else(|| {
                PlanError::incompatible(
                    format!("VERTEX{}", start_type),
                    format!("EDGE{}", edge_type),
                    edge_text(direction, &start_alias, &alias),
                )
            })?;

        self.bind_new(&alias, narrowed)?;
        self.push_step(Step::Expand {
            direction,
            alias,
            start_alias,
        })?;
        Ok(self)
    }

    /// 取上一条边（或路径）的端点
    pub fn get_v(
        &mut self,
        opt: GetVOpt,
        selector: LabelSelector,
        alias: Option<&str>,
    ) -> PlanResult<&mut Self> {
        let implied = self.implied_endpoint(opt)?;
        let (kind, requested) = self.resolve_selector(&selector)?;
        if kind != ElementKind::Vertex {
            return Err(PlanError::illegal("GetV 只能选择顶点标签"));
        }
        let alias = self.resolve_alias(alias)?;
        let vertex_type = requested.intersect(&implied).ok_or_else(|| {
            PlanError::type_mismatch(
                format!("VERTEX{}", requested),
                format!("VERTEX{}", implied),
                format!("GetV({}) {}", opt, alias),
            )
        })?;
        self.bind_vertex(&alias, vertex_type)?;
        self.push_step(Step::GetV {
            opt,
            alias,
            filter: None,
        })?;
        Ok(self)
    }

    /// 可变长路径扩展
    pub fn path_expand(&mut self, spec: PathExpandSpec, alias: Option<&str>) -> PlanResult<&mut Self> {
        let start_alias = self.head_vertex("PathExpand")?;
        if spec.lower < 0 || spec.lower > spec.upper {
            return Err(PlanError::illegal(format!(
                "路径跳数范围非法: [{}, {})",
                spec.lower, spec.upper
            )));
        }
        let lower = u32::try_from(spec.lower)
            .map_err(|_| PlanError::illegal(format!("路径跳数下界过大: {}", spec.lower)))?;
        let upper = u32::try_from(spec.upper)
            .map_err(|_| PlanError::illegal(format!("路径跳数上界过大: {}", spec.upper)))?;

        let (edge_kind, edge_type) = self.resolve_selector(&spec.edge)?;
        let (vertex_kind, vertex_type) = self.resolve_selector(&spec.vertex)?;
        if edge_kind != ElementKind::Edge || vertex_kind != ElementKind::Vertex {
            return Err(PlanError::illegal("PathExpand 需要边标签与顶点标签"));
        }
        let alias = self.resolve_alias(alias)?;

        let expand = TypeConverter::record_type(&self.schema, &edge_type)?;
        let get_v = TypeConverter::record_type(&self.schema, &vertex_type)?;
        let path = PathType {
            expand,
            get_v,
            range: PathRange::new(lower, upper),
        };
        self.bind_descriptor(&alias, TypeDescriptor::path(path))?;
        self.push_step(Step::PathExpand {
            direction: spec.direction,
            alias,
            start_alias,
            path_opt: spec.path_opt,
            result_opt: spec.result_opt,
        })?;
        Ok(self)
    }

    /// 过滤
    ///
    /// 恒真条件直接丢弃，恒假条件生成空结果节点；
    /// 句子内只引用紧邻 Source/GetV 别名的条件融合进该节点
    pub fn filter(&mut self, condition: Expression) -> PlanResult<&mut Self> {
        if self.sentence.is_some() {
            self.filter_in_sentence(condition)?;
            return Ok(self);
        }
        let root = self
            .root
            .take()
            .ok_or_else(|| PlanError::illegal("过滤缺少输入"))?;
        if let Err(err) = check_property_refs(&condition, root.row_type())
            .and_then(|_| check_predicate(&condition, root.row_type()))
        {
            self.root = Some(root);
            return Err(err);
        }
        self.root = Some(match self.folder.classify(&condition) {
            FilterClass::Tautology => root,
            FilterClass::Contradiction => {
                PlanNodeEnum::Empty(EmptyNode::new(root.row_type().clone()))
            }
            FilterClass::Residual(cond) => PlanNodeEnum::Filter(FilterNode::new(root, cond)),
        });
        Ok(self)
    }

    fn filter_in_sentence(&mut self, condition: Expression) -> PlanResult<()> {
        let sentence = self
            .sentence
            .as_mut()
            .ok_or_else(|| PlanError::Internal("没有打开的句子".to_string()))?;
        let referenced = condition.referenced_aliases();
        if let Some(missing) = referenced.iter().find(|a| !sentence.aliases.contains(*a)) {
            return Err(PlanError::AliasNotFound(missing.clone()));
        }

        match self.folder.classify(&condition) {
            FilterClass::Tautology => {
                sentence.discarded.push(condition);
                return Ok(());
            }
            FilterClass::Contradiction => sentence.steps.push(Step::Contradiction { condition }),
            FilterClass::Residual(cond) => {
                let aliases = cond.referenced_aliases();
                let slot = match sentence.steps.last_mut() {
                    Some(Step::Source { alias, filter, .. }) | Some(Step::GetV { alias, filter, .. })
                        if aliases.len() == 1 && aliases.contains(alias.as_str()) =>
                    {
                        Some(filter)
                    }
                    _ => None,
                };
                match slot {
                    Some(filter) => {
                        log::debug!("过滤条件 {} 融合进前一节点", cond);
                        *filter = Some(match filter.take() {
                            Some(existing) => Expression::and(existing, cond),
                            None => cond,
                        });
                    }
                    None => sentence.steps.push(Step::Filter { condition: cond }),
                }
            }
        }
        self.refresh_current()
    }

    // ---------------------------------------------------------------
    // 匹配
    // ---------------------------------------------------------------

    /// 单句匹配
    pub fn match_single(&mut self, kind: MatchKind) -> PlanResult<&mut Self> {
        let sentences = self.take_sentences()?;
        if sentences.len() != 1 {
            return Err(PlanError::illegal(format!(
                "单句匹配需要恰好一个句子，实际 {} 个",
                sentences.len()
            )));
        }
        let mut built = self.compile_pattern(&sentences, false)?;
        let sentence = built
            .pop()
            .ok_or_else(|| PlanError::Internal("句子构建结果为空".to_string()))?;
        let node = PlanNodeEnum::SingleMatch(SingleMatchNode::new(sentence, kind));
        self.scope.reset(node.row_type());
        self.root = Some(node);
        Ok(self)
    }

    /// 多句匹配，句子之间必须通过共享别名连通
    pub fn match_multi(&mut self) -> PlanResult<&mut Self> {
        let sentences = self.take_sentences()?;
        let built = self.compile_pattern(&sentences, true)?;
        let node = PlanNodeEnum::MultiMatch(MultiMatchNode::new(built));
        self.scope.reset(node.row_type());
        self.root = Some(node);
        Ok(self)
    }

    // ---------------------------------------------------------------
    // 关系算子
    // ---------------------------------------------------------------

    pub fn project(&mut self, columns: Vec<ProjectColumn>, append: bool) -> PlanResult<&mut Self> {
        let input = self.take_root()?;
        let mut seen = HashSet::new();
        let mut types = Vec::with_capacity(columns.len());
        for column in &columns {
            if column.expr.contains_aggregate() {
                self.root = Some(input);
                return Err(PlanError::illegal(format!(
                    "投影列 {} 含有聚合函数",
                    column.alias
                )));
            }
            if !seen.insert(column.alias.clone())
                || (append && input.row_type().contains(&column.alias))
            {
                self.root = Some(input);
                return Err(PlanError::DuplicateAlias(column.alias.clone()));
            }
            match deduce_type(&column.expr, input.row_type()) {
                Ok(ty) => types.push(ty),
                Err(err) => {
                    self.root = Some(input);
                    return Err(err);
                }
            }
        }
        let node = PlanNodeEnum::Project(ProjectNode::new(input, columns, types, append));
        self.scope.reset(node.row_type());
        self.root = Some(node);
        Ok(self)
    }

    pub fn aggregate(
        &mut self,
        keys: Vec<ProjectColumn>,
        calls: Vec<AggregateCall>,
    ) -> PlanResult<&mut Self> {
        let input = self.take_root()?;
        match self.aggregate_types(&input, &keys, &calls) {
            Ok((key_types, call_types)) => {
                let node = PlanNodeEnum::Aggregate(AggregateNode::new(
                    input, keys, key_types, calls, call_types,
                ));
                self.scope.reset(node.row_type());
                self.root = Some(node);
                Ok(self)
            }
            Err(err) => {
                self.root = Some(input);
                Err(err)
            }
        }
    }

    fn aggregate_types(
        &self,
        input: &PlanNodeEnum,
        keys: &[ProjectColumn],
        calls: &[AggregateCall],
    ) -> PlanResult<(Vec<TypeDescriptor>, Vec<TypeDescriptor>)> {
        let row = input.row_type();
        let mut seen = HashSet::new();
        let mut key_types = Vec::with_capacity(keys.len());
        for key in keys {
            if !seen.insert(key.alias.as_str()) {
                return Err(PlanError::DuplicateAlias(key.alias.clone()));
            }
            if key.expr.contains_aggregate() {
                return Err(PlanError::illegal(format!("分组键 {} 含有聚合函数", key.alias)));
            }
            key_types.push(deduce_type(&key.expr, row)?);
        }
        let mut call_types = Vec::with_capacity(calls.len());
        for call in calls {
            if !seen.insert(call.alias.as_str()) {
                return Err(PlanError::DuplicateAlias(call.alias.clone()));
            }
            let arg = deduce_type(&call.arg, row)?;
            call_types.push(aggregate_output_type(call.func, &arg)?);
        }
        Ok((key_types, call_types))
    }

    pub fn sort(&mut self, keys: Vec<SortKey>, limit: Option<u64>) -> PlanResult<&mut Self> {
        let input = self.take_root()?;
        for key in &keys {
            if let Err(err) = deduce_type(&key.expr, input.row_type()) {
                self.root = Some(input);
                return Err(err);
            }
        }
        self.root = Some(PlanNodeEnum::Sort(SortNode::new(input, keys, limit)));
        Ok(self)
    }

    /// 完成构建
    ///
    /// 没有显式匹配的单个句子按裸遍历处理：推导后直接作为根节点
    pub fn build(mut self) -> PlanResult<LogicalPlan> {
        let root = self.take_root()?;
        log::debug!("逻辑计划构建完成: {} 个节点", root.node_count());
        Ok(LogicalPlan::new(root, self.reports))
    }

    // ---------------------------------------------------------------
    // 内部实现
    // ---------------------------------------------------------------

    /// 取出根节点；句子仍打开时先封闭为裸遍历
    fn take_root(&mut self) -> PlanResult<PlanNodeEnum> {
        if self.root.is_none() && (self.sentence.is_some() || !self.sealed.is_empty()) {
            let sentences = self.take_sentences()?;
            if sentences.len() != 1 {
                return Err(PlanError::illegal("多个句子必须通过匹配组合"));
            }
            let mut built = self.compile_pattern(&sentences, false)?;
            let node = built
                .pop()
                .ok_or_else(|| PlanError::Internal("句子构建结果为空".to_string()))?;
            self.scope.reset(node.row_type());
            self.root = Some(node);
        }
        self.root
            .take()
            .ok_or_else(|| PlanError::illegal("计划为空"))
    }

    fn take_sentences(&mut self) -> PlanResult<Vec<Sentence>> {
        if self.root.is_some() {
            return Err(PlanError::illegal("匹配只能出现在计划开头"));
        }
        let mut sentences = std::mem::take(&mut self.sealed);
        if let Some(open) = self.sentence.take() {
            sentences.push(open);
        }
        if sentences.is_empty() {
            return Err(PlanError::illegal("匹配缺少模式句子"));
        }
        Ok(sentences)
    }

    /// 模式推导、属性检查与最终重建
    fn compile_pattern(
        &mut self,
        sentences: &[Sentence],
        require_connected: bool,
    ) -> PlanResult<Vec<PlanNodeEnum>> {
        let mut pattern = Pattern::new();
        for sentence in sentences {
            self.add_to_pattern(&mut pattern, &sentence.steps)?;
        }
        if require_connected && !pattern.is_connected() {
            return Err(PlanError::illegal("匹配中的句子没有通过共享别名连通"));
        }

        let report = self.inference.infer(&mut pattern)?;

        for vertex in pattern.vertices() {
            if self.scope.contains(&vertex.alias) {
                let ty = TypeConverter::element_descriptor(&self.schema, &vertex.label_type)?;
                self.scope.narrow(&vertex.alias, ty)?;
            }
        }
        for edge in pattern.edges().iter().filter(|e| !e.is_path()) {
            let ty = TypeConverter::element_descriptor(&self.schema, &edge.label_type)?;
            self.scope.narrow(&edge.alias, ty)?;
        }

        let row = self.scope.row_type();
        for sentence in sentences {
            let conditions = sentence
                .steps
                .iter()
                .filter_map(|s| match s {
                    Step::Source { filter, .. } | Step::GetV { filter, .. } => filter.as_ref(),
                    Step::Filter { condition } | Step::Contradiction { condition } => {
                        Some(condition)
                    }
                    _ => None,
                })
                .chain(sentence.discarded.iter());
            for condition in conditions {
                check_property_refs(condition, &row)?;
                check_predicate(condition, &row)?;
            }
        }

        self.reports.push(report);
        sentences
            .iter()
            .map(|s| self.build_chain(&s.steps))
            .collect()
    }

    fn add_to_pattern(&mut self, pattern: &mut Pattern, steps: &[Step]) -> PlanResult<()> {
        let mut pending: Option<PendingEdge<'_>> = None;
        for step in steps {
            match step {
                Step::Source { alias, kind: ElementKind::Vertex, .. } => {
                    pattern.add_vertex(alias, self.label_type_of(alias)?)?;
                }
                Step::Source { alias, kind: ElementKind::Edge, .. } => {
                    pending = Some(PendingEdge::Scan(alias));
                }
                Step::Expand { direction, alias, start_alias } => {
                    pending = Some(PendingEdge::Expand {
                        alias,
                        start: start_alias,
                        direction: *direction,
                    });
                }
                Step::PathExpand { direction, alias, start_alias, .. } => {
                    pending = Some(PendingEdge::Path {
                        alias,
                        start: start_alias,
                        direction: *direction,
                    });
                }
                Step::GetV { opt, alias, .. } => {
                    let vertex = pattern.add_vertex(alias, self.label_type_of(alias)?)?;
                    if let Some(edge) = pending.take() {
                        self.close_edge(pattern, edge, Some((vertex, *opt)))?;
                    }
                }
                Step::Filter { .. } | Step::Contradiction { .. } => {}
            }
        }
        if let Some(edge) = pending {
            self.close_edge(pattern, edge, None)?;
        }
        Ok(())
    }

    /// 把边加入模式图；没有具名端点时补一个匿名顶点
    fn close_edge(
        &mut self,
        pattern: &mut Pattern,
        edge: PendingEdge<'_>,
        endpoint: Option<(usize, GetVOpt)>,
    ) -> PlanResult<()> {
        let pattern_edge = match edge {
            PendingEdge::Scan(alias) => {
                let (src, dst) = match endpoint {
                    Some((v, GetVOpt::Start)) => (v, self.anonymous_vertex(pattern)?),
                    Some((v, _)) => (self.anonymous_vertex(pattern)?, v),
                    None => (self.anonymous_vertex(pattern)?, self.anonymous_vertex(pattern)?),
                };
                PatternEdge::single(alias, src, dst, EdgeDirection::Out, self.label_type_of(alias)?)
            }
            PendingEdge::Expand { alias, start, direction } => {
                let start = self.pattern_vertex(pattern, start)?;
                let end = match endpoint {
                    Some((v, _)) => v,
                    None => self.anonymous_vertex(pattern)?,
                };
                PatternEdge::single(alias, start, end, direction, self.label_type_of(alias)?)
            }
            PendingEdge::Path { alias, start, direction } => {
                let start = self.pattern_vertex(pattern, start)?;
                let end = match endpoint {
                    Some((v, _)) => v,
                    None => self.anonymous_vertex(pattern)?,
                };
                let path = self.path_type_of(alias)?;
                PatternEdge::path(
                    alias,
                    start,
                    end,
                    direction,
                    path.expand.label_type().clone(),
                    path.range,
                    path.get_v.label_type().clone(),
                )
            }
        };
        pattern.add_edge(pattern_edge)?;
        Ok(())
    }

    fn pattern_vertex(&self, pattern: &Pattern, alias: &str) -> PlanResult<usize> {
        pattern
            .vertex_index(alias)
            .ok_or_else(|| PlanError::Internal(format!("模式中缺少顶点 {}", alias)))
    }

    fn anonymous_vertex(&mut self, pattern: &mut Pattern) -> PlanResult<usize> {
        let alias = self.scope.next_anonymous();
        let all = self.all_of(ElementKind::Vertex)?;
        pattern.add_vertex(&alias, all)
    }

    /// 用作用域中的当前类型构建句子的节点链
    fn build_chain(&self, steps: &[Step]) -> PlanResult<PlanNodeEnum> {
        let mut node: Option<PlanNodeEnum> = None;
        for step in steps {
            let next = match step {
                Step::Source { alias, filter, .. } => PlanNodeEnum::Source(SourceNode::new(
                    alias.clone(),
                    self.scope.get(alias)?.clone(),
                    filter.clone(),
                )),
                Step::Expand { direction, alias, start_alias } => {
                    PlanNodeEnum::Expand(ExpandNode::new(
                        Self::chain_input(node.take())?,
                        *direction,
                        alias.clone(),
                        start_alias.clone(),
                        self.scope.get(alias)?.clone(),
                    ))
                }
                Step::GetV { opt, alias, filter } => PlanNodeEnum::GetV(GetVNode::new(
                    Self::chain_input(node.take())?,
                    *opt,
                    alias.clone(),
                    self.scope.get(alias)?.clone(),
                    filter.clone(),
                )),
                Step::PathExpand {
                    direction,
                    alias,
                    start_alias,
                    path_opt,
                    result_opt,
                } => PlanNodeEnum::PathExpand(PathExpandNode::new(
                    Self::chain_input(node.take())?,
                    *direction,
                    alias.clone(),
                    start_alias.clone(),
                    self.path_type_of(alias)?,
                    *path_opt,
                    *result_opt,
                )),
                Step::Filter { condition } => PlanNodeEnum::Filter(FilterNode::new(
                    Self::chain_input(node.take())?,
                    condition.clone(),
                )),
                Step::Contradiction { .. } => {
                    let input = Self::chain_input(node.take())?;
                    PlanNodeEnum::Empty(EmptyNode::new(input.row_type().clone()))
                }
            };
            node = Some(next);
        }
        node.ok_or_else(|| PlanError::Internal("空句子".to_string()))
    }

    fn chain_input(node: Option<PlanNodeEnum>) -> PlanResult<PlanNodeEnum> {
        node.ok_or_else(|| PlanError::Internal("句子缺少起点".to_string()))
    }

    fn push_step(&mut self, step: Step) -> PlanResult<()> {
        let sentence = self
            .sentence
            .as_mut()
            .ok_or_else(|| PlanError::Internal("没有打开的句子".to_string()))?;
        sentence.steps.push(step);
        self.refresh_current()
    }

    fn refresh_current(&mut self) -> PlanResult<()> {
        let current = match &self.sentence {
            Some(sentence) => self.build_chain(&sentence.steps)?,
            None => return Ok(()),
        };
        if let Some(sentence) = self.sentence.as_mut() {
            sentence.current = Some(current);
        }
        Ok(())
    }

    fn open_sentence(&self, operation: &str) -> PlanResult<&Sentence> {
        self.sentence
            .as_ref()
            .ok_or_else(|| PlanError::illegal(format!("{} 必须位于模式句子中", operation)))
    }

    /// Expand/PathExpand 的起点：句子最后一个顶点
    fn head_vertex(&self, operation: &str) -> PlanResult<String> {
        match self.open_sentence(operation)?.last_structural() {
            Some(Step::Source {
                alias,
                kind: ElementKind::Vertex,
                ..
            })
            | Some(Step::GetV { alias, .. }) => Ok(alias.clone()),
            _ => Err(PlanError::illegal(format!(
                "{} 之前必须是顶点（Source 或 GetV）",
                operation
            ))),
        }
    }

    /// 上一条边在给定端点选择下蕴含的顶点类型
    fn implied_endpoint(&self, opt: GetVOpt) -> PlanResult<LabelType> {
        let labels = match self.open_sentence("GetV")?.last_structural() {
            Some(Step::Source {
                alias,
                kind: ElementKind::Edge,
                ..
            }) => {
                let edge = self.label_type_of(alias)?;
                match opt {
                    GetVOpt::Start => edge.src_labels(),
                    GetVOpt::End => edge.dst_labels(),
                    GetVOpt::Other => {
                        return Err(PlanError::illegal("边扫描之后的 GetV 只能取 START 或 END"))
                    }
                }
            }
            Some(Step::Expand {
                direction,
                alias,
                start_alias,
            }) => {
                let valid = match direction {
                    EdgeDirection::Out => matches!(opt, GetVOpt::End | GetVOpt::Other),
                    EdgeDirection::In => matches!(opt, GetVOpt::Start | GetVOpt::Other),
                    EdgeDirection::Both => opt == GetVOpt::Other,
                };
                if !valid {
                    return Err(PlanError::illegal(format!(
                        "{} 方向的扩展不能使用 GetV({})",
                        direction, opt
                    )));
                }
                let edge = self.label_type_of(alias)?;
                match direction {
                    EdgeDirection::Out => edge.dst_labels(),
                    EdgeDirection::In => edge.src_labels(),
                    EdgeDirection::Both => {
                        let start = self.label_type_of(start_alias)?.labels();
                        edge.entries()
                            .flat_map(|entry| {
                                let mut other: Vec<LabelRef> = Vec::new();
                                if let (Some(src), Some(dst)) = (entry.src(), entry.dst()) {
                                    if start.contains(src) {
                                        other.push(dst.clone());
                                    }
                                    if start.contains(dst) {
                                        other.push(src.clone());
                                    }
                                }
                                other
                            })
                            .collect()
                    }
                }
            }
            Some(Step::PathExpand {
                alias, start_alias, ..
            }) => {
                if opt == GetVOpt::Start {
                    return Err(PlanError::illegal("路径之后的 GetV 只能取 END 或 OTHER"));
                }
                let path = self.path_type_of(alias)?;
                let mut labels = path.get_v.label_type().labels();
                // 零跳路径的终点就是起点
                if path.range.allows_zero() {
                    labels.extend(self.label_type_of(start_alias)?.labels());
                }
                labels
            }
            _ => return Err(PlanError::illegal("GetV 之前必须是边（Expand、PathExpand 或边扫描）")),
        };
        LabelType::vertices(labels)
            .ok_or_else(|| PlanError::Internal(format!("GetV({}) 没有可达的顶点标签", opt)))
    }

    fn resolve_alias(&mut self, alias: Option<&str>) -> PlanResult<String> {
        match alias {
            Some(a) if AliasScope::is_anonymous(a) => {
                Err(PlanError::illegal(format!("别名不能以保留前缀开头: {}", a)))
            }
            Some(a) if a.is_empty() => Err(PlanError::illegal("别名不能为空")),
            Some(a) => Ok(a.to_string()),
            None => Ok(self.scope.next_anonymous()),
        }
    }

    fn all_of(&self, kind: ElementKind) -> PlanResult<LabelType> {
        let all = match kind {
            ElementKind::Vertex => self.schema.all_vertices_type(),
            ElementKind::Edge => self.schema.all_edges_type(),
        };
        all.ok_or_else(|| PlanError::illegal(format!("Schema 中没有{}标签", kind)))
    }

    fn resolve_selector(&self, selector: &LabelSelector) -> PlanResult<(ElementKind, LabelType)> {
        let names = match selector {
            LabelSelector::All(kind) => return Ok((*kind, self.all_of(*kind)?)),
            LabelSelector::Labels(names) => names,
        };
        if names.is_empty() {
            return Err(PlanError::illegal("标签列表不能为空"));
        }
        let mut kinds = HashSet::new();
        for name in names {
            let kind = self.schema.element_kind_of(name).ok_or_else(|| {
                let available = self
                    .schema
                    .vertex_label_names()
                    .into_iter()
                    .chain(self.schema.edge_label_names());
                SchemaError::type_not_found(ElementKind::Vertex, name.clone(), available)
            })?;
            kinds.insert(kind);
        }
        if kinds.len() > 1 {
            return Err(PlanError::illegal(format!(
                "同一位置混用了顶点与边标签: [{}]",
                names.join(", ")
            )));
        }
        if kinds.contains(&ElementKind::Vertex) {
            let mut refs = Vec::with_capacity(names.len());
            for name in names {
                refs.push(self.schema.vertex_label(name)?.label_ref());
            }
            let label_type = LabelType::vertices(refs)
                .ok_or_else(|| PlanError::Internal("顶点标签为空".to_string()))?;
            Ok((ElementKind::Vertex, label_type))
        } else {
            let mut labels = Vec::with_capacity(names.len());
            for name in names {
                labels.push(self.schema.edge_label(name)?);
            }
            let label_type = self
                .schema
                .edge_type_of(labels)
                .ok_or_else(|| PlanError::Internal("边标签没有关系".to_string()))?;
            Ok((ElementKind::Edge, label_type))
        }
    }

    fn label_type_of(&self, alias: &str) -> PlanResult<LabelType> {
        self.scope
            .get(alias)?
            .label_type()
            .cloned()
            .ok_or_else(|| PlanError::type_mismatch("VERTEX|EDGE", self.describe(alias), alias))
    }

    fn path_type_of(&self, alias: &str) -> PlanResult<PathType> {
        match self.scope.get(alias)? {
            TypeDescriptor::Path(path) => Ok(path.as_ref().clone()),
            other => Err(PlanError::type_mismatch("PATH", other, alias)),
        }
    }

    fn describe(&self, alias: &str) -> String {
        self.scope
            .get(alias)
            .map(|ty| ty.to_string())
            .unwrap_or_default()
    }

    fn sentence_mut(&mut self) -> PlanResult<&mut Sentence> {
        self.sentence
            .as_mut()
            .ok_or_else(|| PlanError::Internal("没有打开的句子".to_string()))
    }

    /// 绑定句子内的新别名
    fn bind_descriptor(&mut self, alias: &str, ty: TypeDescriptor) -> PlanResult<()> {
        if self.sentence_mut()?.aliases.contains(alias) {
            return Err(PlanError::DuplicateAlias(alias.to_string()));
        }
        self.scope.bind(alias, ty)?;
        self.sentence_mut()?.aliases.insert(alias.to_string());
        Ok(())
    }

    fn bind_new(&mut self, alias: &str, label_type: LabelType) -> PlanResult<()> {
        let ty = TypeConverter::element_descriptor(&self.schema, &label_type)?;
        self.bind_descriptor(alias, ty)
    }

    /// 绑定顶点别名；前面句子已绑定的同名顶点与之求交
    fn bind_vertex(&mut self, alias: &str, label_type: LabelType) -> PlanResult<()> {
        if self.sentence_mut()?.aliases.contains(alias) {
            return Err(PlanError::DuplicateAlias(alias.to_string()));
        }
        if !self.scope.contains(alias) {
            return self.bind_new(alias, label_type);
        }
        let existing = self.scope.get(alias)?.clone();
        let merged = match (&existing, existing.label_type()) {
            (TypeDescriptor::Vertex(_), Some(current)) => {
                current.intersect(&label_type).ok_or_else(|| {
                    PlanError::incompatible(
                        &existing,
                        format!("VERTEX{}", label_type),
                        format!("({})", alias),
                    )
                })?
            }
            _ => return Err(PlanError::DuplicateAlias(alias.to_string())),
        };
        let ty = TypeConverter::element_descriptor(&self.schema, &merged)?;
        self.scope.narrow(alias, ty)?;
        self.sentence_mut()?.aliases.insert(alias.to_string());
        Ok(())
    }
}
