//! 查询计划缓存集成测试
//!
//! 测试范围:
//! - 缓存键的结构相等与哈希
//! - 容量满后的 LRU 淘汰
//! - 并发单飞编译
//! - 编译失败不缓存
//! - 与构建器组合的完整编译流程

mod common;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use common::data_fixtures::ldbc_schema;
use common::TestContext;
use graphplan::cache::{PlanCacheConfig, PlanCacheKey, QueryPlanCache};
use graphplan::core::types::{EdgeDirection, GetVOpt};
use graphplan::core::{CompileError, CompileResult, ErrorCode};
use graphplan::query::planner::plan::MatchKind;
use graphplan::query::{LabelSelector, LogicalPlan};
use graphplan::schema::{EdgeLabel, GraphSchema, VertexLabel};

fn hash_of(key: &PlanCacheKey) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_key_equality_across_schema_instances() {
    let first = ldbc_schema();
    let second = ldbc_schema();
    assert!(!std::ptr::eq(&first, &second));

    let a = PlanCacheKey::new("MATCH (a)-[b:REPLYOF]->(c) RETURN a", &first);
    let b = PlanCacheKey::new("MATCH (a)-[b:REPLYOF]->(c)   RETURN a", &second);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    let other_query = PlanCacheKey::new("MATCH (a) RETURN a", &first);
    assert_ne!(a, other_query);

    let other_schema = GraphSchema::builder()
        .add_vertex_label(VertexLabel::new(0, "PERSON"))
        .add_edge_label(EdgeLabel::new(0, "KNOWS").with_relation("PERSON", "PERSON"))
        .build()
        .expect("合法的Schema");
    let c = PlanCacheKey::new("MATCH (a)-[b:REPLYOF]->(c) RETURN a", &other_schema);
    assert_ne!(a, c);
}

#[test]
fn test_key_ignores_relation_declaration_order() {
    let build = |first: (&str, &str), second: (&str, &str)| {
        GraphSchema::builder()
            .add_vertex_label(VertexLabel::new(0, "COMMENT"))
            .add_vertex_label(VertexLabel::new(1, "POST"))
            .add_edge_label(
                EdgeLabel::new(0, "REPLYOF")
                    .with_relation(first.0, first.1)
                    .with_relation(second.0, second.1),
            )
            .build()
            .expect("合法的Schema")
    };
    let a = build(("COMMENT", "POST"), ("COMMENT", "COMMENT"));
    let b = build(("COMMENT", "COMMENT"), ("COMMENT", "POST"));
    assert_eq!(a, b);

    let query = "MATCH (a)-[:REPLYOF]->(b) RETURN b";
    let key_a = PlanCacheKey::new(query, &a);
    let key_b = PlanCacheKey::new(query, &b);
    assert_eq!(key_a, key_b);
    assert_eq!(hash_of(&key_a), hash_of(&key_b));
}

#[test]
fn test_bounded_size_evicts_least_recent() {
    let capacity = 8;
    let cache: QueryPlanCache<usize> = QueryPlanCache::with_capacity(capacity).expect("容量有效");
    let schema = ldbc_schema();
    let keys: Vec<PlanCacheKey> = (0..=capacity)
        .map(|i| PlanCacheKey::new(&format!("MATCH (a) RETURN {}", i), &schema))
        .collect();

    for (i, key) in keys.iter().take(capacity).enumerate() {
        cache.insert(key.clone(), i);
    }
    // 访问 key0，使 key1 成为最久未使用
    assert_eq!(cache.get(&keys[0]), Some(0));
    cache.insert(keys[capacity].clone(), capacity);

    assert_eq!(cache.len(), capacity);
    assert_eq!(cache.get(&keys[1]), None);
    for (i, key) in keys.iter().enumerate().filter(|(i, _)| *i != 1) {
        assert_eq!(cache.get(key), Some(i), "key{} 应该仍然可取", i);
    }
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_concurrent_single_flight() {
    let cache: Arc<QueryPlanCache<String>> =
        Arc::new(QueryPlanCache::with_capacity(16).expect("容量有效"));
    let compiles = Arc::new(AtomicUsize::new(0));
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let key = PlanCacheKey::new("MATCH (a:PERSON) RETURN a", &ldbc_schema());

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = cache.clone();
            let compiles = compiles.clone();
            let barrier = barrier.clone();
            let key = key.clone();
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_compile(key, || -> Result<String, String> {
                    compiles.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(50));
                    Ok("plan".to_string())
                })
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().expect("线程不应该 panic");
        assert_eq!(result, Ok("plan".to_string()));
    }
    assert_eq!(compiles.load(Ordering::SeqCst), 1);
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.inserts, 1);
}

#[test]
fn test_failed_leader_lets_waiter_retry() {
    let cache: Arc<QueryPlanCache<u32>> = Arc::new(QueryPlanCache::with_capacity(4).expect("容量有效"));
    let key = PlanCacheKey::new("MATCH (a) RETURN a", &ldbc_schema());
    let attempts = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let cache = cache.clone();
            let key = key.clone();
            let attempts = attempts.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_compile(key, || {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(30));
                    if n == 0 {
                        Err(CompileError::parse("第一次编译失败"))
                    } else {
                        Ok(42)
                    }
                })
            })
        })
        .collect();

    let results: Vec<CompileResult<u32>> = handles
        .into_iter()
        .map(|h| h.join().expect("线程不应该 panic"))
        .collect();

    // 每次失败只影响发起编译的调用者，失败结果不会被缓存
    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    assert_eq!(results.iter().filter(|r| **r == Ok(42)).count(), 1);
    assert_eq!(cache.get(&key), Some(42));
    assert_eq!(cache.stats().compile_failures, 1);
}

#[test]
fn test_failure_is_not_cached() {
    let cache: QueryPlanCache<u32> = QueryPlanCache::new(PlanCacheConfig::default()).expect("默认配置有效");
    let key = PlanCacheKey::new("MATCH (", &ldbc_schema());

    let first: CompileResult<u32> = cache.get_or_compile(key.clone(), || Err(CompileError::parse("语法错误")));
    assert_eq!(first.map_err(|e| e.code()), Err(ErrorCode::ParseError));
    assert!(!cache.contains(&key));

    let calls = AtomicUsize::new(0);
    let second: CompileResult<u32> = cache.get_or_compile(key.clone(), || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(CompileError::parse("语法错误"))
    });
    assert!(second.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_invalidate_schema_version() {
    let cache: QueryPlanCache<u32> = QueryPlanCache::with_capacity(8).expect("容量有效");
    let old_schema = ldbc_schema();
    let new_schema = GraphSchema::builder()
        .add_vertex_label(VertexLabel::new(0, "PERSON"))
        .build()
        .expect("合法的Schema");

    cache.insert(PlanCacheKey::new("q1", &old_schema), 1);
    cache.insert(PlanCacheKey::new("q2", &old_schema), 2);
    cache.insert(PlanCacheKey::new("q1", &new_schema), 3);

    assert_eq!(cache.invalidate_schema(old_schema.fingerprint()), 2);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&PlanCacheKey::new("q1", &new_schema)), Some(3));
}

#[test]
fn test_cache_compiled_logical_plans() {
    let ctx = TestContext::ldbc();
    let cache: QueryPlanCache<Arc<LogicalPlan>> = QueryPlanCache::with_capacity(4).expect("容量有效");
    let query = "MATCH (a)-[b:REPLYOF]->(c)<-[:CONTAINEROF]-(d) RETURN a";
    let compiles = AtomicUsize::new(0);

    let compile = || -> CompileResult<Arc<LogicalPlan>> {
        compiles.fetch_add(1, Ordering::SeqCst);
        let mut builder = ctx.builder();
        builder
            .source(LabelSelector::all_vertices(), Some("a"))?
            .expand(EdgeDirection::Out, LabelSelector::labels(["REPLYOF"]), Some("b"))?
            .get_v(GetVOpt::End, LabelSelector::all_vertices(), Some("c"))?
            .expand(EdgeDirection::In, LabelSelector::labels(["CONTAINEROF"]), None)?
            .get_v(GetVOpt::Start, LabelSelector::all_vertices(), Some("d"))?
            .match_single(MatchKind::Inner)?;
        Ok(Arc::new(builder.build()?))
    };

    let key = PlanCacheKey::new(query, &ctx.schema);
    let first = cache.get_or_compile(key.clone(), compile).expect("编译成功");
    let second = cache
        .get_or_compile(key, || -> CompileResult<Arc<LogicalPlan>> {
            panic!("命中缓存时不应该再次编译")
        })
        .expect("命中缓存");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(compiles.load(Ordering::SeqCst), 1);
    assert!((cache.stats().hit_rate() - 0.5).abs() < f64::EPSILON);
}
