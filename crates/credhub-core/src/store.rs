//! Credential storage seam and an in-memory implementation.
use crate::credential::VerifiableCredential;
use crate::service::CredentialFilter;
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// An error relating to credential storage.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A credential with the same ID is already stored.
    #[error("Credential with ID already exists: {0}")]
    Duplicate(String),
}

/// Persists credentials keyed by ID.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert(&self, credential: VerifiableCredential) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<VerifiableCredential>, StoreError>;

    /// Credentials matching the filter.
    async fn list(
        &self,
        filter: &CredentialFilter,
    ) -> Result<Vec<VerifiableCredential>, StoreError>;

    /// Removes a credential, returning whether one was stored under the ID.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// In-memory credential store. Listings are in ascending ID order.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: RwLock<BTreeMap<String, VerifiableCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert(&self, credential: VerifiableCredential) -> Result<(), StoreError> {
        let mut credentials = self.credentials.write().await;
        if credentials.contains_key(&credential.id) {
            return Err(StoreError::Duplicate(credential.id));
        }
        credentials.insert(credential.id.clone(), credential);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<VerifiableCredential>, StoreError> {
        Ok(self.credentials.read().await.get(id).cloned())
    }

    async fn list(
        &self,
        filter: &CredentialFilter,
    ) -> Result<Vec<VerifiableCredential>, StoreError> {
        Ok(self
            .credentials
            .read()
            .await
            .values()
            .filter(|credential| filter.matches(credential))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.credentials.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::CredentialBuilder;
    use std::sync::Arc;

    fn credential(issuer: &str, subject: &str) -> VerifiableCredential {
        CredentialBuilder::new()
            .issuer(issuer)
            .subject(subject)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        let store = MemoryCredentialStore::new();
        let credential = credential("did:example:a", "did:example:b");
        let id = credential.id.clone();
        store.insert(credential.clone()).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(credential.clone()));
        assert!(matches!(
            store.insert(credential).await,
            Err(StoreError::Duplicate(dup)) if dup == id
        ));
        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert_eq!(store.get(&id).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_by_filter() {
        let store = MemoryCredentialStore::new();
        store
            .insert(credential("did:example:a", "did:example:x"))
            .await
            .unwrap();
        store
            .insert(credential("did:example:a", "did:example:y"))
            .await
            .unwrap();
        store
            .insert(credential("did:example:b", "did:example:x"))
            .await
            .unwrap();

        let by_issuer = store
            .list(&CredentialFilter::Issuer("did:example:a".into()))
            .await
            .unwrap();
        assert_eq!(by_issuer.len(), 2);
        assert!(by_issuer.windows(2).all(|w| w[0].id < w[1].id));

        let by_subject = store
            .list(&CredentialFilter::Subject("did:example:x".into()))
            .await
            .unwrap();
        assert_eq!(by_subject.len(), 2);

        let by_schema = store
            .list(&CredentialFilter::Schema("schema".into()))
            .await
            .unwrap();
        assert!(by_schema.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_inserts() {
        let store = Arc::new(MemoryCredentialStore::new());
        let handles = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(credential("did:example:a", &format!("did:example:{i}")))
                        .await
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.len().await, 16);
    }
}
