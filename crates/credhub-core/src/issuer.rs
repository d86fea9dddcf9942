//! Credential service backed by a [`CredentialStore`].
use crate::credential::{CredentialBuilder, VerifiableCredential};
use crate::schema::SchemaRegistry;
use crate::service::{
    CreateCredentialRequest, CredentialFilter, CredentialService, CredentialServiceError,
};
use crate::store::{CredentialStore, MemoryCredentialStore};
use async_trait::async_trait;
use chrono::DateTime;
use log::debug;

/// Builds unsigned credentials from create requests and keeps them in a store.
pub struct LocalCredentialService<S = MemoryCredentialStore>
where
    S: CredentialStore,
{
    store: S,
    schemas: SchemaRegistry,
}

impl LocalCredentialService<MemoryCredentialStore> {
    /// A service keeping credentials in memory.
    pub fn in_memory(schemas: SchemaRegistry) -> Self {
        Self::new(MemoryCredentialStore::new(), schemas)
    }
}

impl<S: CredentialStore> LocalCredentialService<S> {
    pub fn new(store: S, schemas: SchemaRegistry) -> Self {
        Self { store, schemas }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn build(
        &self,
        request: CreateCredentialRequest,
    ) -> Result<VerifiableCredential, CredentialServiceError> {
        let mut builder = CredentialBuilder::new()
            .issuer(&request.issuer)
            .subject(&request.subject);
        if let Some(context) = request.context.as_deref().filter(|c| !c.is_empty()) {
            builder = builder.add_context(context);
        }
        if let Some(schema_id) = request.json_schema.as_deref().filter(|s| !s.is_empty()) {
            self.schemas.validate(schema_id, &request.data)?;
            builder = builder.schema(schema_id);
        }
        if let Some(expiry) = request.expiry.as_deref().filter(|e| !e.is_empty()) {
            DateTime::parse_from_rfc3339(expiry)
                .map_err(|_| CredentialServiceError::InvalidExpiry(expiry.to_string()))?;
            builder = builder.expiration_date(expiry);
        }
        debug!("Building credential: {}", builder.id());
        builder.claims(request.data).build()
    }

    async fn list(
        &self,
        filter: CredentialFilter,
    ) -> Result<Vec<VerifiableCredential>, CredentialServiceError> {
        let credentials = self.store.list(&filter).await?;
        debug!(
            "Listed {} credential(s) by {}",
            credentials.len(),
            filter.kind()
        );
        Ok(credentials)
    }
}

#[async_trait]
impl<S: CredentialStore> CredentialService for LocalCredentialService<S> {
    async fn create_credential(
        &self,
        request: CreateCredentialRequest,
    ) -> Result<VerifiableCredential, CredentialServiceError> {
        let credential = self.build(request)?;
        self.store.insert(credential.clone()).await?;
        debug!("Stored credential: {}", credential.id);
        Ok(credential)
    }

    async fn get_credential(
        &self,
        id: &str,
    ) -> Result<VerifiableCredential, CredentialServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CredentialServiceError::NotFound(id.to_string()))
    }

    async fn list_credentials_by_issuer(
        &self,
        issuer: &str,
    ) -> Result<Vec<VerifiableCredential>, CredentialServiceError> {
        self.list(CredentialFilter::Issuer(issuer.to_string())).await
    }

    async fn list_credentials_by_subject(
        &self,
        subject: &str,
    ) -> Result<Vec<VerifiableCredential>, CredentialServiceError> {
        self.list(CredentialFilter::Subject(subject.to_string())).await
    }

    async fn list_credentials_by_schema(
        &self,
        schema: &str,
    ) -> Result<Vec<VerifiableCredential>, CredentialServiceError> {
        self.list(CredentialFilter::Schema(schema.to_string())).await
    }

    async fn delete_credential(&self, id: &str) -> Result<(), CredentialServiceError> {
        if !self.store.delete(id).await? {
            debug!("No credential to delete: {}", id);
        }
        Ok(())
    }
}
