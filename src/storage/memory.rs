//! @acp:module "Memory Store"
//! @acp:summary "In-process key-value store"
//! @acp:domain storage
//! @acp:layer io

use serde_json::Value;
use std::collections::BTreeMap;

use super::{validate_key, KeyValueStore};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Value) -> Result<bool> {
        validate_key(key)?;
        if self.entries.get(key) == Some(&value) {
            return Ok(false);
        }
        self.entries.insert(key.to_string(), value);
        Ok(true)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.entries.remove(key).is_some())
    }

    fn append(&mut self, key: &str, value: Value) -> Result<()> {
        validate_key(key)?;
        match self.entries.entry(key.to_string()).or_insert_with(|| Value::Array(Vec::new())) {
            Value::Array(items) => {
                items.push(value);
                Ok(())
            }
            _ => Err(crate::error::PolicyError::save(key, "existing value is not a list")),
        }
    }
}
