use crate::{
    error::StoreResult,
    record::{History, Record},
    value_object::VersionRange,
};
use async_trait::async_trait;
use std::sync::Arc;

/// 聚合记录存储协议
///
/// - `save`：整体覆盖聚合的记录序列（不存在则创建），不是追加；
/// - `load`：读取聚合的全部记录并按闭区间 `[from_version, to_version]` 过滤。
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save(&self, aggregate_id: &str, records: Vec<Record>) -> StoreResult<()>;

    async fn load(
        &self,
        aggregate_id: &str,
        from_version: i64,
        to_version: i64,
    ) -> StoreResult<History>;
}

#[async_trait]
pub trait RecordStoreExt: RecordStore {
    async fn load_range(&self, aggregate_id: &str, range: VersionRange) -> StoreResult<History> {
        self.load(aggregate_id, range.from(), range.to()).await
    }

    /// 读取聚合的完整历史
    async fn load_all(&self, aggregate_id: &str) -> StoreResult<History> {
        self.load_range(aggregate_id, VersionRange::all()).await
    }

    /// 在已有历史之后追加记录：先读出完整历史，再整体写回
    ///
    /// 聚合尚不存在时等同于首次 `save`。读与写之间没有并发保护。
    async fn append(&self, aggregate_id: &str, records: Vec<Record>) -> StoreResult<()> {
        let mut history = match self.load_all(aggregate_id).await {
            Ok(history) => history,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => return Err(err),
        };
        history.extend(records);

        self.save(aggregate_id, history).await
    }
}

#[async_trait]
impl<T> RecordStore for Arc<T>
where
    T: RecordStore + ?Sized,
{
    async fn save(&self, aggregate_id: &str, records: Vec<Record>) -> StoreResult<()> {
        (**self).save(aggregate_id, records).await
    }

    async fn load(
        &self,
        aggregate_id: &str,
        from_version: i64,
        to_version: i64,
    ) -> StoreResult<History> {
        (**self).load(aggregate_id, from_version, to_version).await
    }
}

#[async_trait]
impl<T> RecordStoreExt for T where T: RecordStore + ?Sized {}
