//! 聚合文档的存储形态
//!
//! `{ _id: ObjectId, records: [ { version: <int>, data: <binary|null> }, ... ] }`
//!
use bson::{Binary, Document, oid::ObjectId, spec::BinarySubtype};
use eventsource_domain::{AggregateId, Record};
use serde::{Deserialize, Deserializer, Serialize};

/// 单条记录在文档中的形态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDocument {
    pub version: i64,
    pub data: Option<Binary>,
}

/// 每个聚合对应一份文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub records: Vec<RecordDocument>,
}

// 零条记录的保存可能被写成 `records: null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RecordDocument>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RecordDocument>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AggregateDocument {
    pub fn new(id: AggregateId, records: Vec<Record>) -> Self {
        Self {
            id: id.object_id(),
            records: records.into_iter().map(RecordDocument::from).collect(),
        }
    }

    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }

    pub fn from_document(document: Document) -> Result<Self, bson::de::Error> {
        bson::from_document(document)
    }

    pub fn into_records(self) -> impl Iterator<Item = Record> {
        self.records.into_iter().map(Record::from)
    }
}

impl From<Record> for RecordDocument {
    fn from(record: Record) -> Self {
        Self {
            version: record.version(),
            data: record.into_data().map(|bytes| Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            }),
        }
    }
}

impl From<RecordDocument> for Record {
    fn from(document: RecordDocument) -> Self {
        Record::new(document.version, document.data.map(|binary| binary.bytes))
    }
}
