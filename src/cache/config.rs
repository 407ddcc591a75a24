//! 计划缓存配置

use serde::{Deserialize, Serialize};

pub const DEFAULT_PLAN_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanCacheConfig {
    /// 最大缓存条目数
    pub capacity: usize,
    /// 启用统计
    pub enable_stats: bool,
}

impl Default for PlanCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PLAN_CACHE_CAPACITY,
            enable_stats: true,
        }
    }
}

impl PlanCacheConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("plan_cache.capacity 必须大于0".to_string());
        }
        Ok(())
    }
}
