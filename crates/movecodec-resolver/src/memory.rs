//! In-memory `FunctionResolver` implementation.
//!
//! Suitable for tests, CLI use with signature files, and embedding.
//! Thread-safe via `Arc<RwLock<..>>`. Function ids are normalized on insert
//! and lookup, so long and short address forms find the same entry.

use async_trait::async_trait;
use movecodec_core::{
    call::{FunctionId, ResolvedFunction},
    error::ResolverError,
    resolver::FunctionResolver,
};
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::debug;

#[derive(Clone, Default)]
pub struct MemoryResolver {
    inner: Arc<RwLock<HashMap<FunctionId, ResolvedFunction>>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a function signature.
    pub fn insert(&self, id: FunctionId, function: ResolvedFunction) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.normalized(), function);
    }

    pub fn get(&self, id: &FunctionId) -> Option<ResolvedFunction> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id.normalized())
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All known function ids, in normalized form.
    pub fn all_ids(&self) -> Vec<FunctionId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Load signatures from a JSON object keyed by function id:
    ///
    /// ```json
    /// { "0x1::TransferScripts::peer_to_peer_v2": { "args": [ ... ] } }
    /// ```
    ///
    /// Returns the number of signatures loaded.
    pub fn load_json(&self, json: &str) -> Result<usize, ResolverError> {
        let entries: HashMap<String, ResolvedFunction> = serde_json::from_str(json)?;
        let count = entries.len();
        for (key, function) in entries {
            let id: FunctionId = key.parse()?;
            self.insert(id, function);
        }
        Ok(count)
    }

    /// Load a signature file (see [`load_json`](Self::load_json)).
    pub fn load_file(&self, path: &Path) -> Result<usize, ResolverError> {
        let content = std::fs::read_to_string(path)?;
        let count = self.load_json(&content)?;
        debug!(path = %path.display(), count, "loaded function signatures");
        Ok(count)
    }
}

#[async_trait]
impl FunctionResolver for MemoryResolver {
    async fn resolve_function(
        &self,
        id: &FunctionId,
    ) -> Result<Option<ResolvedFunction>, ResolverError> {
        Ok(self.get(id))
    }
}
