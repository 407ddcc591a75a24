//! 自定义断言辅助模块
//!
//! 提供测试中的常用断言函数

use graphplan::core::types::TypeDescriptor;
use graphplan::query::planner::RowType;

/// 断言结果成功，返回内部值
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    result.expect("操作应该成功")
}

/// 断言结果失败并匹配错误消息
pub fn assert_err_with<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>, expected_msg: &str) {
    let err = result.expect_err("操作应该失败");
    let err_str = err.to_string();
    assert!(
        err_str.contains(expected_msg),
        "错误消息应包含 '{}', 实际是 '{}'",
        expected_msg,
        err_str
    );
}

/// 断言行类型中某个别名的标签名集合
pub fn assert_labels(row: &RowType, alias: &str, expected: &[&str]) {
    let ty = row
        .get(alias)
        .unwrap_or_else(|| panic!("行类型中缺少别名 {}", alias));
    let mut names = label_names(ty);
    names.dedup();
    let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(names, expected, "别名 {} 的标签不匹配", alias);
}

/// 图元素类型的标签名（已排序）
pub fn label_names(ty: &TypeDescriptor) -> Vec<String> {
    let mut names = ty
        .label_type()
        .map(|t| t.label_names())
        .unwrap_or_default();
    names.sort();
    names
}

/// 图元素类型的条目数
pub fn entry_count(row: &RowType, alias: &str) -> usize {
    row.get(alias)
        .and_then(|ty| ty.label_type())
        .map(|t| t.len())
        .unwrap_or(0)
}
