use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Result, StoreError};

/// A stored record: a JSON object keyed by its integer `"id"`
pub type Record = Map<String, Value>;

pub const KEY_FIELD: &str = "id";

/// Extract the key of a record
pub fn record_key(record: &Record) -> Result<i64> {
    record
        .get(KEY_FIELD)
        .and_then(Value::as_i64)
        .ok_or(StoreError::MissingKey)
}

/// On-disk layout of one named store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFile {
    pub version: u32,
    #[serde(default)]
    pub records: Vec<Record>,
}

/// One operation inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Clear,
    Add(Record),
}

/// Ordered operations committed together, all or nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.ops.push(WriteOp::Clear);
        self
    }

    pub fn add(&mut self, record: Record) -> &mut Self {
        self.ops.push(WriteOp::Add(record));
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply the batch to a copy of `records`, returning the copy.
    /// `records` is left untouched when any operation fails.
    pub fn apply_to(&self, records: &[Record]) -> Result<Vec<Record>> {
        let mut next = records.to_vec();
        for op in &self.ops {
            match op {
                WriteOp::Clear => next.clear(),
                WriteOp::Add(record) => {
                    let key = record_key(record)?;
                    for existing in &next {
                        if record_key(existing)? == key {
                            return Err(StoreError::DuplicateKey(key));
                        }
                    }
                    next.push(record.clone());
                }
            }
        }
        Ok(next)
    }
}

/// Iterate-and-update-in-place access to every record, handed to upgrades
pub struct RecordCursor<'a> {
    records: &'a mut Vec<Record>,
    position: usize,
}

impl<'a> RecordCursor<'a> {
    pub fn new(records: &'a mut Vec<Record>) -> Self {
        Self {
            records,
            position: 0,
        }
    }

    /// Step to the next record, returning it for in-place update
    pub fn advance(&mut self) -> Option<&mut Record> {
        let record = self.records.get_mut(self.position)?;
        self.position += 1;
        Some(record)
    }

    pub fn visited(&self) -> usize {
        self.position
    }
}
