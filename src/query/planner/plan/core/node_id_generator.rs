//! 节点ID生成器
//!
//! 进程内唯一的计划节点ID，多个编译线程共享同一个计数器

use std::sync::atomic::{AtomicI64, Ordering};

pub struct NodeIdGenerator {
    counter: AtomicI64,
}

impl NodeIdGenerator {
    /// 全局实例
    pub fn instance() -> &'static Self {
        static INSTANCE: NodeIdGenerator = NodeIdGenerator {
            counter: AtomicI64::new(1), // 0 保留为无效ID
        };
        &INSTANCE
    }

    pub fn next_id(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

pub fn next_node_id() -> i64 {
    NodeIdGenerator::instance().next_id()
}
