//! Credential service API consumed by the HTTP layer.
use crate::claims::ClaimMap;
use crate::credential::VerifiableCredential;
use crate::store::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error relating to a credential service operation.
#[derive(Error, Debug)]
pub enum CredentialServiceError {
    /// No credential is stored under the given ID.
    #[error("Credential not found: {0}")]
    NotFound(String),
    /// Referenced schema is not known to the service.
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),
    /// Claims do not satisfy the referenced schema.
    #[error("Claims failed schema validation: {0}")]
    SchemaValidation(String),
    /// Expiry is not an RFC 3339 date-time.
    #[error("Invalid expiry date-time: {0}")]
    InvalidExpiry(String),
    /// Credential could not be constructed.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),
    /// Wrapped error for credential store error.
    #[error("A wrapped variant for a credential store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CredentialServiceError {
    fn from(err: StoreError) -> Self {
        CredentialServiceError::Store(err)
    }
}

/// Service-facing request to create a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialRequest {
    pub issuer: String,
    pub subject: String,
    /// Extra context. If absent, only the default context is applied.
    pub context: Option<String>,
    /// If present, `data` must validate against this schema.
    pub json_schema: Option<String>,
    pub data: ClaimMap,
    pub expiry: Option<String>,
}

/// A single dimension a credential listing is filtered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialFilter {
    Issuer(String),
    Subject(String),
    Schema(String),
}

impl CredentialFilter {
    /// Name of the filtered attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialFilter::Issuer(_) => "issuer",
            CredentialFilter::Subject(_) => "subject",
            CredentialFilter::Schema(_) => "schema",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            CredentialFilter::Issuer(v)
            | CredentialFilter::Subject(v)
            | CredentialFilter::Schema(v) => v,
        }
    }

    /// Whether the credential's attribute equals the filter value.
    pub fn matches(&self, credential: &VerifiableCredential) -> bool {
        match self {
            CredentialFilter::Issuer(issuer) => &credential.issuer == issuer,
            CredentialFilter::Subject(subject) => credential.subject_id() == Some(subject.as_str()),
            CredentialFilter::Schema(schema) => credential.schema_id() == Some(schema.as_str()),
        }
    }
}

/// Issues, retrieves and revokes verifiable credentials.
///
/// Implementations must be safe for concurrent use: concurrent creates get distinct IDs and
/// reads observe a complete prior write.
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Creates and stores a credential. Nothing is stored if this fails.
    async fn create_credential(
        &self,
        request: CreateCredentialRequest,
    ) -> Result<VerifiableCredential, CredentialServiceError>;

    async fn get_credential(&self, id: &str)
        -> Result<VerifiableCredential, CredentialServiceError>;

    async fn list_credentials_by_issuer(
        &self,
        issuer: &str,
    ) -> Result<Vec<VerifiableCredential>, CredentialServiceError>;

    async fn list_credentials_by_subject(
        &self,
        subject: &str,
    ) -> Result<Vec<VerifiableCredential>, CredentialServiceError>;

    async fn list_credentials_by_schema(
        &self,
        schema: &str,
    ) -> Result<Vec<VerifiableCredential>, CredentialServiceError>;

    async fn delete_credential(&self, id: &str) -> Result<(), CredentialServiceError>;
}
