//! 聚合标识（AggregateId）
//!
//! 外部以字符串传入，必须是合法的 12 字节 ObjectId 十六进制表示（24 个字符），
//! 作为聚合文档的唯一主键。
//!
use crate::error::{StoreError, StoreResult};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateId(ObjectId);

impl AggregateId {
    /// 生成新的聚合标识（时间戳 + 计数器 + 随机数）
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// 从十六进制字符串解析，格式不合法时返回 `InvalidIdentifier`
    pub fn parse(id: &str) -> StoreResult<Self> {
        ObjectId::parse_str(id)
            .map(Self)
            .map_err(|err| StoreError::InvalidIdentifier {
                id: id.to_string(),
                reason: err.to_string(),
            })
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl FromStr for AggregateId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AggregateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl From<ObjectId> for AggregateId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl From<AggregateId> for ObjectId {
    fn from(value: AggregateId) -> Self {
        value.0
    }
}
