//! 查询计划缓存模块
//!
//! - `key` 缓存键（规范化查询文本 + Schema 版本）
//! - `plan_cache` LRU 缓存与单飞编译
//! - `config` 缓存配置

pub mod config;
pub mod key;
pub mod plan_cache;

pub use config::{PlanCacheConfig, DEFAULT_PLAN_CACHE_CAPACITY};
pub use key::PlanCacheKey;
pub use plan_cache::{PlanCacheError, PlanCacheStats, QueryPlanCache};
