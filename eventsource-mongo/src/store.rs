//! 基于 MongoDB 的聚合记录存储
//!
//! 每个聚合一份文档，`save` 整体替换 `records`，`load` 取回整份文档后在客户端按版本过滤。
//! 每次 `save` 都会传输完整历史，适用于事件数量适中的聚合。
//!
use crate::{
    collection::DocumentCollection,
    config::SaveMode,
    connection::MongoConnection,
    document::AggregateDocument,
};
use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use eventsource_domain::{
    AggregateId, History, Record, StoreError, StoreResult, WriteOperation,
    persist::RecordStore, value_object::VersionRange,
};
use mongodb::Collection;
use std::{future::Future, time::Duration};
use tokio::time::Instant;
use tracing::{debug, warn};

/// MongoDB 聚合记录存储
///
/// - `C`：文档集合实现，默认是驱动的 `Collection<Document>`
#[derive(Clone, Debug)]
pub struct MongoRecordStore<C = Collection<Document>> {
    collection: C,
    save_mode: SaveMode,
    operation_timeout: Option<Duration>,
}

impl MongoRecordStore {
    /// 绑定到 `database.collection`，沿用连接配置中的写入策略与截止时间；不产生网络往返
    pub fn new(collection: &str, database: &str, connection: &MongoConnection) -> Self {
        let config = connection.config();
        Self::with_collection(connection.collection(database, collection))
            .with_save_mode(config.save_mode())
            .with_operation_timeout(config.operation_timeout())
    }
}

impl<C> MongoRecordStore<C>
where
    C: DocumentCollection,
{
    pub fn with_collection(collection: C) -> Self {
        Self {
            collection,
            save_mode: SaveMode::default(),
            operation_timeout: None,
        }
    }

    pub fn with_save_mode(mut self, save_mode: SaveMode) -> Self {
        self.save_mode = save_mode;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }

    fn deadline(&self) -> Option<Instant> {
        self.operation_timeout.map(|timeout| Instant::now() + timeout)
    }

    /// 在整个操作共享的截止时间内执行一次往返
    async fn round_trip<T, F>(
        deadline: Option<Instant>,
        phase: &'static str,
        aggregate_id: &str,
        fut: F,
    ) -> StoreResult<anyhow::Result<T>>
    where
        F: Future<Output = anyhow::Result<T>> + Send,
    {
        let Some(deadline) = deadline else {
            return Ok(fut.await);
        };

        tokio::time::timeout_at(deadline, fut).await.map_err(|_| {
            warn!(phase, "deadline exceeded");
            StoreError::DeadlineExceeded {
                phase,
                aggregate_id: aggregate_id.to_string(),
            }
        })
    }

    async fn contains_document(
        &self,
        deadline: Option<Instant>,
        aggregate_id: &str,
        id: ObjectId,
    ) -> StoreResult<bool> {
        let count = Self::round_trip(
            deadline,
            "existence check",
            aggregate_id,
            self.collection.count_by_id(id),
        )
        .await?
        .map_err(|err| StoreError::ExistenceCheckFailed {
            aggregate_id: aggregate_id.to_string(),
            reason: format!("could not count documents: {err:#}"),
        })?;

        Ok(count > 0)
    }

    async fn write(
        &self,
        deadline: Option<Instant>,
        aggregate_id: &str,
        operation: WriteOperation,
        document: &AggregateDocument,
    ) -> StoreResult<()> {
        let fut = async {
            match operation {
                WriteOperation::Insert => self.collection.insert(document).await,
                WriteOperation::Update => {
                    self.collection
                        .set_records(document.id, &document.records)
                        .await
                }
                WriteOperation::Upsert => self.collection.upsert(document).await,
            }
        };

        let phase = match operation {
            WriteOperation::Insert => "insert",
            WriteOperation::Update => "update",
            WriteOperation::Upsert => "upsert",
        };

        Self::round_trip(deadline, phase, aggregate_id, fut)
            .await?
            .map_err(|err| {
                warn!(%operation, error = %err, "write failed");
                StoreError::WriteFailed {
                    operation,
                    aggregate_id: aggregate_id.to_string(),
                    reason: format!("{err:#}"),
                }
            })?;

        debug!(%operation, records_len = document.records.len(), "document written");
        Ok(())
    }
}

#[async_trait]
impl<C> RecordStore for MongoRecordStore<C>
where
    C: DocumentCollection,
{
    #[tracing::instrument(skip(self, records), fields(records_len = records.len()))]
    async fn save(&self, aggregate_id: &str, records: Vec<Record>) -> StoreResult<()> {
        let id = AggregateId::parse(aggregate_id)?;
        let deadline = self.deadline();
        let document = AggregateDocument::new(id, records);

        let operation = match self.save_mode {
            SaveMode::Upsert => WriteOperation::Upsert,
            SaveMode::CheckThenWrite => {
                // 探测与写入之间没有锁，并发保存同一聚合时存在竞态
                if self
                    .contains_document(deadline, aggregate_id, document.id)
                    .await?
                {
                    WriteOperation::Update
                } else {
                    WriteOperation::Insert
                }
            }
        };

        self.write(deadline, aggregate_id, operation, &document).await
    }

    #[tracing::instrument(skip(self))]
    async fn load(
        &self,
        aggregate_id: &str,
        from_version: i64,
        to_version: i64,
    ) -> StoreResult<History> {
        let id = AggregateId::parse(aggregate_id)?;

        let raw = Self::round_trip(
            self.deadline(),
            "fetch",
            aggregate_id,
            self.collection.find_by_id(id.object_id()),
        )
        .await?
        .map_err(|err| StoreError::FetchFailed {
            aggregate_id: aggregate_id.to_string(),
            reason: format!("{err:#}"),
        })?;

        let Some(raw) = raw else {
            debug!("no document for aggregate");
            return Err(StoreError::NotFound {
                aggregate_id: aggregate_id.to_string(),
            });
        };

        let document =
            AggregateDocument::from_document(raw).map_err(|err| StoreError::DecodeFailed {
                aggregate_id: aggregate_id.to_string(),
                reason: err.to_string(),
            })?;

        let stored = document.records.len();
        let history = VersionRange::new(from_version, to_version).filter(document.into_records());
        debug!(stored, returned = history.len(), "history loaded");

        Ok(history)
    }
}
