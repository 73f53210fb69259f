//! # Compiled Validator Cache
//!
//! Memoizes compiled validators per schema key for one engine instance.
//!
//! A [`CompilerCache`] is bound to the engine it compiles with and is owned
//! next to it (by [`ContractValidator`](crate::ContractValidator)). Its
//! compiled validators therefore live exactly as long as the cache and its
//! engine handle: dropping the owner drops both. Validators from one engine
//! are never handed out for another.
//!
//! Concurrent first use may compile the same schema twice. Both results are
//! equally valid; the first one stored is the one every later caller sees.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::engine::{CompiledValidator, ValidationEngine};
use crate::error::ContractError;
use crate::loader::SchemaLoader;
use crate::registry::SchemaKey;

/// Compiled validators of one engine instance, keyed by schema key.
pub struct CompilerCache {
    engine: Arc<dyn ValidationEngine>,
    validators: RwLock<HashMap<SchemaKey, Arc<dyn CompiledValidator>>>,
}

impl std::fmt::Debug for CompilerCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilerCache")
            .field("engine", &self.engine.name())
            .field("compiled", &self.compiled_count())
            .finish()
    }
}

impl CompilerCache {
    /// Empty cache compiling with `engine`.
    pub fn new(engine: Arc<dyn ValidationEngine>) -> Self {
        Self {
            engine,
            validators: RwLock::new(HashMap::new()),
        }
    }

    /// The engine this cache compiles with.
    pub fn engine(&self) -> &Arc<dyn ValidationEngine> {
        &self.engine
    }

    /// Return the compiled validator for `key`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`ContractError::SchemaLoad`] from `loader`, and returns
    /// [`ContractError::SchemaCompile`] if the engine rejects the schema.
    /// Neither failure is cached.
    pub fn get_or_compile(
        &self,
        loader: &SchemaLoader,
        key: SchemaKey,
    ) -> Result<Arc<dyn CompiledValidator>, ContractError> {
        if let Some(validator) = self.validators.read().get(&key) {
            tracing::trace!(schema_key = %key, engine = self.engine.name(), "compiled validator cache hit");
            return Ok(Arc::clone(validator));
        }

        let schema = loader.load(key)?;
        let compiled = self.engine.compile(key, &schema).map_err(|e| {
            tracing::warn!(schema_key = %key, engine = self.engine.name(), reason = %e.reason, "schema rejected by engine");
            ContractError::SchemaCompile {
                key,
                reason: e.reason,
            }
        })?;

        let mut validators = self.validators.write();
        Ok(Arc::clone(validators.entry(key).or_insert(compiled)))
    }

    /// Number of validators compiled so far.
    pub fn compiled_count(&self) -> usize {
        self.validators.read().len()
    }

    /// True if a validator for `key` has been compiled.
    pub fn is_compiled(&self, key: SchemaKey) -> bool {
        self.validators.read().contains_key(&key)
    }
}
