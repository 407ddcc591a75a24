//! 查询计划缓存
//!
//! 基于 LRU 的编译结果缓存。并发策略为阻塞式单飞：
//! - 同一键的第一个调用者成为 leader 负责编译，其余调用者在条件变量上等待
//! - leader 成功时结果写入缓存，等待者直接读取
//! - leader 失败（或 panic）时不缓存任何内容，等待者重新竞争 leader
//!
//! 编译失败永远不会被缓存。

use std::num::NonZeroUsize;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lru::LruCache;
use parking_lot::{Condvar, Mutex};

use crate::cache::config::PlanCacheConfig;
use crate::cache::key::PlanCacheKey;
use crate::schema::SchemaVersion;

/// 缓存错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanCacheError {
    #[error("缓存容量必须大于0")]
    InvalidCapacity,
}

/// 计划缓存统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanCacheStats {
    /// 命中次数
    pub hits: u64,
    /// 未命中次数（即实际编译次数）
    pub misses: u64,
    /// 插入次数
    pub inserts: u64,
    /// 淘汰次数
    pub evictions: u64,
    /// 编译失败次数
    pub compile_failures: u64,
    /// 等待其他线程编译的次数
    pub waits: u64,
}

impl PlanCacheStats {
    /// 总查询次数
    pub fn total_queries(&self) -> u64 {
        self.hits + self.misses
    }

    /// 命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_queries();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlightState {
    Running,
    Finished,
    Failed,
}

/// 一次进行中的编译
#[derive(Debug)]
struct Flight {
    state: Mutex<FlightState>,
    done: Condvar,
}

impl Flight {
    fn new() -> Self {
        Self {
            state: Mutex::new(FlightState::Running),
            done: Condvar::new(),
        }
    }

    fn wait(&self) -> FlightState {
        let mut state = self.state.lock();
        while *state == FlightState::Running {
            self.done.wait(&mut state);
        }
        *state
    }

    fn complete(&self, outcome: FlightState) {
        *self.state.lock() = outcome;
        self.done.notify_all();
    }
}

/// leader 退出（包括 panic）时结束本次编译并唤醒等待者
struct LeaderGuard<'a, V: Clone> {
    cache: &'a QueryPlanCache<V>,
    key: &'a PlanCacheKey,
    flight: Arc<Flight>,
    outcome: FlightState,
}

impl<V: Clone> Drop for LeaderGuard<'_, V> {
    fn drop(&mut self) {
        self.cache
            .in_flight
            .remove_if(self.key, |_, f| Arc::ptr_eq(f, &self.flight));
        self.flight.complete(self.outcome);
    }
}

#[derive(Debug)]
pub struct QueryPlanCache<V: Clone> {
    entries: Mutex<LruCache<PlanCacheKey, V>>,
    in_flight: DashMap<PlanCacheKey, Arc<Flight>>,
    stats: Mutex<PlanCacheStats>,
    config: PlanCacheConfig,
}

impl<V: Clone> QueryPlanCache<V> {
    pub fn new(config: PlanCacheConfig) -> Result<Self, PlanCacheError> {
        let capacity = NonZeroUsize::new(config.capacity).ok_or(PlanCacheError::InvalidCapacity)?;
        log::info!("创建查询计划缓存，容量 {}", capacity);
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            in_flight: DashMap::new(),
            stats: Mutex::new(PlanCacheStats::default()),
            config,
        })
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, PlanCacheError> {
        Self::new(PlanCacheConfig::with_capacity(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// 读取缓存并刷新 LRU 顺序
    pub fn get(&self, key: &PlanCacheKey) -> Option<V> {
        let value = self.entries.lock().get(key).cloned();
        match value {
            Some(_) => self.record(|s| s.hits += 1),
            None => self.record(|s| s.misses += 1),
        }
        value
    }

    /// 获取缓存的计划，不存在时调用 compile 编译
    ///
    /// 同一键同时只有一个编译在进行；compile 的错误原样返回且不缓存
    pub fn get_or_compile<F, E>(&self, key: PlanCacheKey, compile: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        loop {
            if let Some(value) = self.lookup(&key) {
                log::debug!("计划缓存命中: {}", key);
                return Ok(value);
            }

            let (flight, leader) = match self.in_flight.entry(key.clone()) {
                Entry::Occupied(entry) => (entry.get().clone(), false),
                Entry::Vacant(entry) => {
                    let flight = Arc::new(Flight::new());
                    entry.insert(flight.clone());
                    (flight, true)
                }
            };

            if !leader {
                self.record(|s| s.waits += 1);
                let outcome = flight.wait();
                log::debug!("等待编译结束: {} ({:?})", key, outcome);
                continue;
            }

            let mut guard = LeaderGuard {
                cache: self,
                key: &key,
                flight,
                outcome: FlightState::Failed,
            };

            // 上一个 leader 可能在本次查找之后刚写入缓存
            if let Some(value) = self.lookup(&key) {
                guard.outcome = FlightState::Finished;
                return Ok(value);
            }

            log::debug!("计划缓存未命中，开始编译: {}", key);
            self.record(|s| s.misses += 1);
            let result = compile();
            match &result {
                Ok(value) => {
                    self.store(key.clone(), value.clone());
                    guard.outcome = FlightState::Finished;
                }
                Err(_) => {
                    log::debug!("编译失败，不缓存: {}", key);
                    self.record(|s| s.compile_failures += 1);
                }
            }
            return result;
        }
    }

    /// 直接写入缓存
    pub fn insert(&self, key: PlanCacheKey, value: V) {
        self.store(key, value);
    }

    pub fn remove(&self, key: &PlanCacheKey) -> Option<V> {
        self.entries.lock().pop(key)
    }

    /// 是否已缓存，不影响 LRU 顺序
    pub fn contains(&self, key: &PlanCacheKey) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// 清空缓存与统计
    pub fn clear(&self) {
        self.entries.lock().clear();
        *self.stats.lock() = PlanCacheStats::default();
    }

    /// 移除针对某个 Schema 版本编译的全部条目，返回移除数量
    pub fn invalidate_schema(&self, version: SchemaVersion) -> usize {
        let mut entries = self.entries.lock();
        let stale: Vec<PlanCacheKey> = entries
            .iter()
            .filter(|(key, _)| key.schema_version() == version)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        log::info!("Schema {} 失效，移除 {} 个缓存计划", version, stale.len());
        stale.len()
    }

    pub fn stats(&self) -> PlanCacheStats {
        self.stats.lock().clone()
    }

    fn lookup(&self, key: &PlanCacheKey) -> Option<V> {
        let value = self.entries.lock().get(key).cloned();
        if value.is_some() {
            self.record(|s| s.hits += 1);
        }
        value
    }

    fn store(&self, key: PlanCacheKey, value: V) {
        let evicted = self.entries.lock().push(key.clone(), value);
        self.record(|s| s.inserts += 1);
        if let Some((old, _)) = evicted {
            if old != key {
                log::debug!("淘汰缓存计划: {}", old);
                self.record(|s| s.evictions += 1);
            }
        }
    }

    fn record(&self, update: impl FnOnce(&mut PlanCacheStats)) {
        if self.config.enable_stats {
            update(&mut self.stats.lock());
        }
    }
}
