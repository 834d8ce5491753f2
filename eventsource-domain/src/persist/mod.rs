//! 持久化（persist）
//!
//! 定义聚合记录存储协议及其内存实现：
//! - 记录整体覆盖写入与按版本区间读取（`RecordStore`）；
//! - 基于两者的便捷操作（`RecordStoreExt`：全量读取、读后追加）；
//! - 用于测试与本地开发的内存实现（`InMemoryRecordStore`）。
//!
//! 该模块只描述协议，具体存储后端（如 MongoDB）由上层提供实现并注入。
//!
mod inmemory;
mod record_store;

pub use inmemory::InMemoryRecordStore;
pub use record_store::{RecordStore, RecordStoreExt};
