//! Schema upgrades for the card store.
//!
//! Version history:
//! - 0: store did not exist
//! - 1: records are `{ id, front, back }`
//! - 2: records carry a `stack` name
//!
//! Upgrading from anything below 2 gives every record without a stack the
//! default stack name. Records that already have one are left alone, so running
//! the pass twice changes nothing.

use serde_json::Value;

use super::{RecordCursor, Result, Upgrade};

pub const CARD_SCHEMA_VERSION: u32 = 2;

const STACK_FIELD: &str = "stack";

/// Upgrade pass applied when opening the card store
#[derive(Debug, Clone)]
pub struct CardUpgrade {
    default_stack: String,
}

impl CardUpgrade {
    pub fn new(default_stack: impl Into<String>) -> Self {
        Self {
            default_stack: default_stack.into(),
        }
    }
}

impl Upgrade for CardUpgrade {
    fn upgrade(&self, old_version: u32, cursor: &mut RecordCursor<'_>) -> Result<()> {
        if old_version >= CARD_SCHEMA_VERSION {
            return Ok(());
        }

        let mut stamped = 0;
        while let Some(record) = cursor.advance() {
            let has_stack = matches!(record.get(STACK_FIELD), Some(Value::String(_)));
            if !has_stack {
                record.insert(
                    STACK_FIELD.to_string(),
                    Value::String(self.default_stack.clone()),
                );
                stamped += 1;
            }
        }

        if stamped > 0 {
            log::info!(
                "Migration: assigned stack '{}' to {} cards",
                self.default_stack,
                stamped
            );
        }
        Ok(())
    }
}
