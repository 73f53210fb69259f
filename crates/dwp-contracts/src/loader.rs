//! # Schema Loader
//!
//! Reads and parses schema documents by key, memoizing the parsed result so
//! each document is read at most once per loader.
//!
//! Load failures are never cached and never retried: schema documents are
//! build artifacts, so a missing or malformed one is a configuration defect.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{ContractError, LoadCause};
use crate::registry::{SchemaKey, SchemaRegistry};

/// Lazily loads and caches schema documents.
#[derive(Debug)]
pub struct SchemaLoader {
    registry: SchemaRegistry,
    cache: RwLock<HashMap<SchemaKey, Arc<Value>>>,
}

impl SchemaLoader {
    /// Create a loader over `registry` with an empty cache.
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The registry this loader resolves keys with.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Load the schema document for `key`.
    ///
    /// The first call reads and parses the file; later calls return the same
    /// `Arc` without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::SchemaLoad`] if the document cannot be read,
    /// is not valid JSON, or is not a JSON object.
    pub fn load(&self, key: SchemaKey) -> Result<Arc<Value>, ContractError> {
        if let Some(schema) = self.cache.read().get(&key) {
            tracing::trace!(schema_key = %key, "schema cache hit");
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(self.read_document(key)?);

        // Two threads may both miss and both read; the first insert wins.
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(key).or_insert(schema)))
    }

    /// Number of documents currently cached.
    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }

    /// True if the document for `key` has been loaded.
    pub fn is_cached(&self, key: SchemaKey) -> bool {
        self.cache.read().contains_key(&key)
    }

    fn read_document(&self, key: SchemaKey) -> Result<Value, ContractError> {
        let path = self.registry.location(key);
        let fail = |source: LoadCause| ContractError::SchemaLoad {
            key,
            path: path.display().to_string(),
            source,
        };

        tracing::debug!(schema_key = %key, path = %path.display(), "reading schema document");
        let content = std::fs::read_to_string(&path).map_err(|e| fail(e.into()))?;
        let schema: Value = serde_json::from_str(&content).map_err(|e| fail(e.into()))?;

        if !schema.is_object() {
            return Err(fail(LoadCause::NotAnObject));
        }
        Ok(schema)
    }
}
