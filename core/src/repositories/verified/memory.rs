//! In-memory implementation of VerifiedStateStore

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::value_objects::HolderContext;
use crate::errors::DomainError;

use super::r#trait::VerifiedStateStore;

/// Verified-state store for single-instance deployments and tests
#[derive(Clone, Default)]
pub struct InMemoryVerifiedStateStore {
    verified: Arc<RwLock<HashMap<HolderContext, HashSet<String>>>>,
}

impl InMemoryVerifiedStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VerifiedStateStore for InMemoryVerifiedStateStore {
    async fn get(&self, holder: &HolderContext, canonical: &str) -> Result<bool, DomainError> {
        let verified = self.verified.read().await;
        Ok(verified
            .get(holder)
            .is_some_and(|numbers| numbers.contains(canonical)))
    }

    async fn set(&self, holder: &HolderContext, canonical: &str) -> Result<(), DomainError> {
        self.verified
            .write()
            .await
            .entry(holder.clone())
            .or_default()
            .insert(canonical.to_string());
        Ok(())
    }

    async fn delete(&self, holder: &HolderContext, canonical: &str) -> Result<(), DomainError> {
        let mut verified = self.verified.write().await;
        if let Some(numbers) = verified.get_mut(holder) {
            numbers.remove(canonical);
            if numbers.is_empty() {
                verified.remove(holder);
            }
        }
        Ok(())
    }

    async fn delete_holder(&self, holder: &HolderContext) -> Result<u64, DomainError> {
        let removed = self.verified.write().await.remove(holder);
        Ok(removed.map(|numbers| numbers.len() as u64).unwrap_or(0))
    }
}
