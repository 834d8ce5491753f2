use crate::{
    aggregate_id::AggregateId,
    error::{StoreError, StoreResult},
    persist::RecordStore,
    record::{History, Record},
    value_object::VersionRange,
};
use async_trait::async_trait;
use dashmap::DashMap;

/// 基于内存的 RecordStore 实现
/// - 每个聚合一份记录序列，`save` 整体替换
/// - 与数据库实现遵循相同的标识校验与版本过滤规则，便于在上层单元测试中替换
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    documents: DashMap<AggregateId, History>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已保存的聚合数量
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, aggregate_id: &AggregateId) -> bool {
        self.documents.contains_key(aggregate_id)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    #[tracing::instrument(skip(self, records), fields(records_len = records.len()))]
    async fn save(&self, aggregate_id: &str, records: Vec<Record>) -> StoreResult<()> {
        let id = AggregateId::parse(aggregate_id)?;
        self.documents.insert(id, records);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn load(
        &self,
        aggregate_id: &str,
        from_version: i64,
        to_version: i64,
    ) -> StoreResult<History> {
        let id = AggregateId::parse(aggregate_id)?;
        let Some(records) = self.documents.get(&id) else {
            return Err(StoreError::NotFound {
                aggregate_id: aggregate_id.to_string(),
            });
        };

        Ok(VersionRange::new(from_version, to_version).filter(records.iter().cloned()))
    }
}
