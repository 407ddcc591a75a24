use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cache::config::PlanCacheConfig;
use crate::query::validator::type_inference::DEFAULT_MAX_INFERENCE_ROUNDS;

/// 编译器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CompilerConfig {
    /// 类型推导工作队列的最大轮数
    pub max_inference_rounds: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_inference_rounds: DEFAULT_MAX_INFERENCE_ROUNDS,
        }
    }
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphplan".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub compiler: CompilerConfig,
    pub plan_cache: PlanCacheConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.compiler.max_inference_rounds == 0 {
            return Err("compiler.max_inference_rounds 必须大于0".to_string());
        }
        self.plan_cache.validate()?;
        if self.log.file.is_empty() {
            return Err("log.file 不能为空".to_string());
        }
        Ok(())
    }
}
