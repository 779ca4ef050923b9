use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::ObjectStore;
use crate::error::MirrorError;

/// In-memory [`ObjectStore`] that records every call.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, (Bytes, String)>>,
    listings: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn with_object(key: &str) -> Self {
        let store = Self::default();
        store
            .objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (Bytes::new(), String::new()));
        store
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn listings(&self) -> Vec<String> {
        self.listings.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn has_objects_under(&self, prefix: &str) -> Result<bool, MirrorError> {
        self.listings.lock().unwrap().push(prefix.to_string());
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .any(|k| k.starts_with(prefix)))
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), MirrorError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(())
    }
}
