use bon::Builder;
use serde::{Deserialize, Serialize};

/// 单条带版本的事件记录
///
/// 版本号由调用方分配，存储层不校验其单调性或唯一性。
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    version: i64,
    data: Option<Vec<u8>>,
}

impl Record {
    pub fn new(version: i64, data: Option<Vec<u8>>) -> Self {
        Self { version, data }
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn into_data(self) -> Option<Vec<u8>> {
        self.data
    }
}

/// 按插入顺序排列的记录序列
pub type History = Vec<Record>;
