//! 配置与日志集成测试
//!
//! 测试范围:
//! - 配置文件加载、保存与校验
//! - 按配置初始化日志并写入编译过程日志
//!
//! flexi_logger 使用全局 logger，一个进程只能初始化一次，
//! 日志相关验证集中在一个测试中

mod common;

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use common::TestContext;
use graphplan::config::Config;
use graphplan::query::{LabelSelector, LogicalPlanBuilder};
use graphplan::schema::{encode_schema, load_schema, SchemaEncoding, SchemaInputStream};
use graphplan::utils::logging;

/// 测试配置默认值
#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.compiler.max_inference_rounds, 10_000);
    assert_eq!(config.plan_cache.capacity, 1024);
    assert!(config.plan_cache.enable_stats);
    assert_eq!(config.log.level, "info");
    assert_eq!(config.log.dir, "logs");
    assert_eq!(config.log.file, "graphplan");
    assert_eq!(config.log.max_file_size, 100 * 1024 * 1024); // 100MB
    assert_eq!(config.log.max_files, 5);
}

/// 测试配置从文件加载
#[test]
fn test_config_from_file() {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let config_content = r#"
[compiler]
max_inference_rounds = 500

[plan_cache]
capacity = 64
enable_stats = false

[log]
level = "debug"
dir = "custom_logs"
file = "custom_graphplan"
max_file_size = 52428800
max_files = 3
"#;
    let config_path = temp_dir.path().join("graphplan.toml");
    fs::write(&config_path, config_content).expect("写入配置文件失败");

    let config = Config::load(&config_path).expect("加载配置失败");
    assert_eq!(config.compiler.max_inference_rounds, 500);
    assert_eq!(config.plan_cache.capacity, 64);
    assert!(!config.plan_cache.enable_stats);
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.log.dir, "custom_logs");
    assert_eq!(config.log.max_file_size, 52428800);
    assert_eq!(config.log.max_files, 3);
}

/// 测试配置保存后可以重新加载
#[test]
fn test_config_save_and_reload() {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let path = temp_dir.path().join("saved.toml");

    let mut config = Config::default();
    config.plan_cache.capacity = 7;
    config.log.level = "warn".to_string();
    config.save(&path).expect("保存配置失败");

    let content = fs::read_to_string(&path).expect("读取配置失败");
    assert!(content.contains("[plan_cache]"));
    assert!(content.contains("capacity = 7"));

    let reloaded = Config::load(&path).expect("重新加载失败");
    assert_eq!(reloaded, config);
}

/// 测试非法配置被拒绝
#[test]
fn test_invalid_config_rejected() {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let path = temp_dir.path().join("bad.toml");
    fs::write(&path, "[plan_cache]\ncapacity = 0\n").expect("写入配置文件失败");
    assert!(Config::load(&path).is_err());

    fs::write(&path, "[compiler]\nmax_inference_rounds = \"many\"\n").expect("写入配置文件失败");
    assert!(Config::load(&path).is_err());

    assert!(Config::load(temp_dir.path().join("missing.toml")).is_err());
}

/// 集成测试：按配置初始化日志，编译过程写入日志文件
#[test]
#[serial]
fn test_logging_records_compilation() {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let mut config = Config::default();
    config.log.level = "debug".to_string();
    config.log.dir = temp_dir.path().to_string_lossy().into_owned();
    config.log.file = "compile".to_string();

    logging::init(&config).expect("日志初始化失败");
    assert!(logging::is_initialized());

    // Schema 加载写 info 日志
    let ctx = TestContext::ldbc();
    let text = encode_schema(&ctx.schema, SchemaEncoding::FlexJson).expect("编码成功");
    load_schema(&SchemaInputStream::new(text, SchemaEncoding::FlexJson)).expect("加载成功");

    // 构建过程写 debug 日志
    let mut builder = LogicalPlanBuilder::with_config(ctx.schema.clone(), &config.compiler);
    builder
        .source(LabelSelector::labels(["PERSON"]), Some("a"))
        .expect("Source 构建成功");
    builder.build().expect("构建成功");

    logging::shutdown();
    assert!(!logging::is_initialized());

    let contents: Vec<String> = fs::read_dir(temp_dir.path())
        .expect("读取日志目录失败")
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("compile") && name.ends_with(".log")
        })
        .filter_map(|e| fs::read_to_string(e.path()).ok())
        .collect();
    assert!(!contents.is_empty(), "应该至少有一个日志文件");

    let all = contents.join("\n");
    assert!(all.contains("日志系统初始化完成"), "日志应包含初始化信息");
    assert!(all.contains("已加载Schema"), "日志应包含 Schema 加载信息");
    assert!(all.contains("逻辑计划构建完成"), "日志应包含构建信息");
}
