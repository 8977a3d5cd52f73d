use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Top-level collection holding one preference document per user
pub const USER_PREFERENCE: &str = "user_preference";

/// Collection nested under each preference document
pub const FAVORITES_RECIPE: &str = "favorites_recipe";

/// An opaque JSON object, stored and returned verbatim
pub type Document = Map<String, JsonValue>;

/// Key-addressed hierarchical document store
///
/// Collections hold documents by key. A document may own nested
/// collections, and a nested collection may be addressed even when its
/// parent document does not exist.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document, `None` when absent
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>>;

    /// Overwrite (or create) a document. Never merges.
    async fn set(&self, collection: &str, key: &str, value: Document) -> Result<()>;

    /// Every document in a nested collection, empty when nothing is there
    async fn list_children(
        &self,
        collection: &str,
        parent_key: &str,
        subcollection: &str,
    ) -> Result<Vec<Document>>;

    /// Store a document under a generated key and return that key
    async fn create_child(
        &self,
        collection: &str,
        parent_key: &str,
        subcollection: &str,
        value: Document,
    ) -> Result<String>;

    /// Remove a nested document. Removing an absent key is not an error.
    async fn delete_child(
        &self,
        collection: &str,
        parent_key: &str,
        subcollection: &str,
        child_key: &str,
    ) -> Result<()>;

    /// Verify the store is reachable
    async fn health_check(&self) -> Result<()>;
}

/// Generate a key for a new child document
pub fn generate_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

type ChildPath = (String, String, String);

#[derive(Default)]
struct MemoryCollections {
    documents: HashMap<(String, String), Document>,
    children: HashMap<ChildPath, HashMap<String, Document>>,
}

/// Process-local store used for development and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryCollections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn child_path(collection: &str, parent_key: &str, subcollection: &str) -> ChildPath {
        (
            collection.to_string(),
            parent_key.to_string(),
            subcollection.to_string(),
        )
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow::anyhow!("In-memory store lock poisoned")
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        let guard = self.inner.read().map_err(poisoned)?;
        Ok(guard
            .documents
            .get(&(collection.to_string(), key.to_string()))
            .cloned())
    }

    async fn set(&self, collection: &str, key: &str, value: Document) -> Result<()> {
        let mut guard = self.inner.write().map_err(poisoned)?;
        guard
            .documents
            .insert((collection.to_string(), key.to_string()), value);
        tracing::debug!("Stored {}/{}", collection, key);
        Ok(())
    }

    async fn list_children(
        &self,
        collection: &str,
        parent_key: &str,
        subcollection: &str,
    ) -> Result<Vec<Document>> {
        let guard = self.inner.read().map_err(poisoned)?;
        let path = Self::child_path(collection, parent_key, subcollection);
        Ok(guard
            .children
            .get(&path)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn create_child(
        &self,
        collection: &str,
        parent_key: &str,
        subcollection: &str,
        value: Document,
    ) -> Result<String> {
        let id = generate_document_id();
        let mut guard = self.inner.write().map_err(poisoned)?;
        guard
            .children
            .entry(Self::child_path(collection, parent_key, subcollection))
            .or_default()
            .insert(id.clone(), value);
        tracing::debug!("Created {}/{}/{}/{}", collection, parent_key, subcollection, id);
        Ok(id)
    }

    async fn delete_child(
        &self,
        collection: &str,
        parent_key: &str,
        subcollection: &str,
        child_key: &str,
    ) -> Result<()> {
        let mut guard = self.inner.write().map_err(poisoned)?;
        let path = Self::child_path(collection, parent_key, subcollection);
        if let Some(docs) = guard.children.get_mut(&path) {
            docs.remove(child_key);
            if docs.is_empty() {
                guard.children.remove(&path);
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        let _guard = self.inner.read().map_err(poisoned)?;
        Ok(())
    }
}
