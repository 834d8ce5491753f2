//! 事件溯源记录存储基础库（eventsource-domain）
//!
//! 提供与具体数据库无关的聚合记录存储抽象：
//! - 聚合标识（`aggregate_id`）：ObjectId 十六进制字符串的解析与生成
//! - 带版本的事件记录（`record`）与版本区间（`value_object`）
//! - 存储协议与内存实现（`persist`）
//! - 统一错误类型（`error`）
//!
//! 典型用法：
//! 1. 选择 `persist::RecordStore` 的一个实现（内存实现或 MongoDB 实现）；
//! 2. 每次 `save` 提交聚合的完整记录序列（整体覆盖，不是追加）；
//! 3. 通过 `load` 按版本闭区间读取记录。
//!
pub mod aggregate_id;
pub mod error;
pub mod persist;
pub mod record;
pub mod value_object;

pub use aggregate_id::AggregateId;
pub use error::{StoreError, StoreResult, WriteOperation};
pub use record::{History, Record};
