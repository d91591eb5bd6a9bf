//! In-memory implementation of ChallengeStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::VerificationChallenge;
use crate::domain::value_objects::HolderContext;
use crate::errors::DomainError;

use super::r#trait::ChallengeStore;

type SlotKey = (String, HolderContext);

/// Challenge store for single-instance deployments and tests
#[derive(Clone, Default)]
pub struct InMemoryChallengeStore {
    challenges: Arc<RwLock<HashMap<SlotKey, VerificationChallenge>>>,
}

impl InMemoryChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored challenges
    pub async fn len(&self) -> usize {
        self.challenges.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.challenges.read().await.is_empty()
    }

    fn key(canonical: &str, holder: &HolderContext) -> SlotKey {
        (canonical.to_string(), holder.clone())
    }
}

#[async_trait]
impl ChallengeStore for InMemoryChallengeStore {
    async fn put(
        &self,
        canonical: &str,
        holder: &HolderContext,
        challenge: &VerificationChallenge,
    ) -> Result<(), DomainError> {
        self.challenges
            .write()
            .await
            .insert(Self::key(canonical, holder), challenge.clone());
        Ok(())
    }

    async fn get(
        &self,
        canonical: &str,
        holder: &HolderContext,
    ) -> Result<Option<VerificationChallenge>, DomainError> {
        let challenges = self.challenges.read().await;
        Ok(challenges.get(&Self::key(canonical, holder)).cloned())
    }

    async fn consume(
        &self,
        canonical: &str,
        holder: &HolderContext,
        token: &str,
    ) -> Result<bool, DomainError> {
        let mut challenges = self.challenges.write().await;
        let key = Self::key(canonical, holder);
        match challenges.get(&key) {
            Some(challenge) if challenge.token_matches(token) => {
                challenges.remove(&key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove(&self, canonical: &str, holder: &HolderContext) -> Result<(), DomainError> {
        self.challenges
            .write()
            .await
            .remove(&Self::key(canonical, holder));
        Ok(())
    }

    async fn purge_issued_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut challenges = self.challenges.write().await;
        let before = challenges.len();
        challenges.retain(|_, challenge| challenge.issued_at >= cutoff);
        Ok((before - challenges.len()) as u64)
    }
}
