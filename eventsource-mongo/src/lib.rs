//! 基于 MongoDB 的聚合记录存储（eventsource-mongo）
//!
//! 为 `eventsource_domain::persist::RecordStore` 提供 MongoDB 实现：
//! - 连接（`connection`）：由 `MongoConfig` 构建已认证的客户端并解析集合
//! - 记录存储（`store`）：每个聚合一份文档，保存时整体覆盖，读取时在客户端按版本过滤
//! - 集合协议（`collection`）：存储所需的单文档操作，测试中可替换为内存实现
//!
//! 存储形态：`{ _id: ObjectId, records: [ { version, data }, ... ] }`。
//!
pub mod collection;
pub mod config;
pub mod connection;
pub mod document;
pub mod store;

pub use collection::DocumentCollection;
pub use config::{MongoConfig, SaveMode};
pub use connection::{MongoConnection, client_options};
pub use document::{AggregateDocument, RecordDocument};
pub use store::MongoRecordStore;
