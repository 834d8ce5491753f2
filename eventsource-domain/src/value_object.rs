//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象。
//!

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 闭区间版本范围 `[from, to]`
///
/// 不校验 `from <= to`：区间倒置时不匹配任何记录。
///
/// # 示例
///
/// ```
/// use eventsource_domain::value_object::VersionRange;
///
/// let range = VersionRange::new(5, 9);
/// assert!(range.contains(5));
/// assert!(range.contains(9));
/// assert!(!range.contains(10));
///
/// let inverted = VersionRange::new(9, 5);
/// assert!(!inverted.contains(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionRange {
    from: i64,
    to: i64,
}

impl VersionRange {
    pub const fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// 覆盖全部版本
    pub const fn all() -> Self {
        Self::new(i64::MIN, i64::MAX)
    }

    pub fn from(&self) -> i64 {
        self.from
    }

    pub fn to(&self) -> i64 {
        self.to
    }

    pub fn contains(&self, version: i64) -> bool {
        self.from <= version && version <= self.to
    }

    /// 保留版本落在区间内的记录，保持原有顺序
    pub fn filter<I>(&self, records: I) -> Vec<Record>
    where
        I: IntoIterator<Item = Record>,
    {
        records
            .into_iter()
            .filter(|record| self.contains(record.version()))
            .collect()
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

impl From<(i64, i64)> for VersionRange {
    fn from((from, to): (i64, i64)) -> Self {
        Self::new(from, to)
    }
}
