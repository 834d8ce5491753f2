//! 文档集合协议
//!
//! 记录存储只依赖这几个按 `_id` 的单文档操作；生产环境由 `mongodb::Collection`
//! 实现，测试中可注入内存替身。
//!
use crate::document::{AggregateDocument, RecordDocument};
use anyhow::Result;
use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use mongodb::Collection;
use std::sync::Arc;

#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// 统计 `_id` 匹配的文档数量（存在性探测）
    async fn count_by_id(&self, id: ObjectId) -> Result<u64>;

    async fn insert(&self, document: &AggregateDocument) -> Result<()>;

    /// 整体替换已有文档的 `records` 字段
    async fn set_records(&self, id: ObjectId, records: &[RecordDocument]) -> Result<()>;

    /// 原子地插入或整体替换文档
    async fn upsert(&self, document: &AggregateDocument) -> Result<()>;

    /// 读取原始文档，不存在时返回 `None`
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>>;
}

fn id_filter(id: ObjectId) -> Document {
    doc! { "_id": { "$eq": id } }
}

#[async_trait]
impl DocumentCollection for Collection<Document> {
    async fn count_by_id(&self, id: ObjectId) -> Result<u64> {
        let count = self.count_documents(id_filter(id)).await?;
        Ok(count)
    }

    async fn insert(&self, document: &AggregateDocument) -> Result<()> {
        self.insert_one(document.to_document()?).await?;
        Ok(())
    }

    async fn set_records(&self, id: ObjectId, records: &[RecordDocument]) -> Result<()> {
        let update = doc! { "$set": { "records": bson::to_bson(records)? } };
        self.update_one(id_filter(id), update).await?;
        Ok(())
    }

    async fn upsert(&self, document: &AggregateDocument) -> Result<()> {
        self.replace_one(id_filter(document.id), document.to_document()?)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>> {
        let document = self.find_one(id_filter(id)).await?;
        Ok(document)
    }
}

#[async_trait]
impl<T> DocumentCollection for Arc<T>
where
    T: DocumentCollection + ?Sized,
{
    async fn count_by_id(&self, id: ObjectId) -> Result<u64> {
        (**self).count_by_id(id).await
    }

    async fn insert(&self, document: &AggregateDocument) -> Result<()> {
        (**self).insert(document).await
    }

    async fn set_records(&self, id: ObjectId, records: &[RecordDocument]) -> Result<()> {
        (**self).set_records(id, records).await
    }

    async fn upsert(&self, document: &AggregateDocument) -> Result<()> {
        (**self).upsert(document).await
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>> {
        (**self).find_by_id(id).await
    }
}
