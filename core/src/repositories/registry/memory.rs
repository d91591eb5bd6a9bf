//! In-memory implementation of NumberRegistry

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::r#trait::NumberRegistry;

/// Registry of stored numbers and whether each was verified
#[derive(Clone, Default)]
pub struct InMemoryNumberRegistry {
    numbers: Arc<RwLock<HashMap<String, bool>>>,
}

impl InMemoryNumberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stored value
    pub async fn register(&self, canonical: &str, verified: bool) {
        self.numbers
            .write()
            .await
            .insert(canonical.to_string(), verified);
    }

    pub async fn unregister(&self, canonical: &str) {
        self.numbers.write().await.remove(canonical);
    }
}

#[async_trait]
impl NumberRegistry for InMemoryNumberRegistry {
    async fn exists(&self, canonical: &str, verified_only: bool) -> Result<bool, DomainError> {
        let numbers = self.numbers.read().await;
        Ok(match numbers.get(canonical) {
            Some(verified) => !verified_only || *verified,
            None => false,
        })
    }
}
