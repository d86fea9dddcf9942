//! Verifiable credential data model and builder.
use crate::claims::{ClaimMap, ClaimValue};
use crate::service::CredentialServiceError;
use crate::{DEFAULT_CONTEXT, DEFAULT_CREDENTIAL_TYPE, JSON_SCHEMA_TYPE, SUBJECT_ID_KEY};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to the schema a credential's claims conform to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSchema {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
}

/// An (unsigned) verifiable credential following the W3C VC data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    pub id: String,
    #[serde(rename = "type")]
    pub type_: Vec<String>,
    pub issuer: String,
    pub issuance_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_schema: Option<CredentialSchema>,
    pub credential_subject: ClaimMap,
}

impl VerifiableCredential {
    /// The `id` claim of the credential subject.
    pub fn subject_id(&self) -> Option<&str> {
        self.credential_subject
            .get(SUBJECT_ID_KEY)
            .and_then(ClaimValue::as_str)
    }

    pub fn schema_id(&self) -> Option<&str> {
        self.credential_schema.as_ref().map(|schema| schema.id.as_str())
    }
}

/// Builder for [`VerifiableCredential`] applying the default context and type and a fresh ID.
#[derive(Debug, Clone)]
pub struct CredentialBuilder {
    id: String,
    context: Vec<String>,
    type_: Vec<String>,
    issuer: String,
    subject: String,
    claims: ClaimMap,
    issuance_date: Option<String>,
    expiration_date: Option<String>,
    credential_schema: Option<CredentialSchema>,
}

impl Default for CredentialBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialBuilder {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            context: vec![DEFAULT_CONTEXT.to_string()],
            type_: vec![DEFAULT_CREDENTIAL_TYPE.to_string()],
            issuer: String::new(),
            subject: String::new(),
            claims: ClaimMap::new(),
            issuance_date: None,
            expiration_date: None,
            credential_schema: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Appends a context unless it is already present.
    pub fn add_context(mut self, context: &str) -> Self {
        if !self.context.iter().any(|c| c == context) {
            self.context.push(context.to_string());
        }
        self
    }

    pub fn issuer(mut self, issuer: &str) -> Self {
        self.issuer = issuer.to_string();
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    /// Sets the subject claims.
    pub fn claims(mut self, claims: ClaimMap) -> Self {
        self.claims = claims;
        self
    }

    pub fn issuance_date(mut self, date: &str) -> Self {
        self.issuance_date = Some(date.to_string());
        self
    }

    pub fn expiration_date(mut self, date: &str) -> Self {
        self.expiration_date = Some(date.to_string());
        self
    }

    pub fn schema(mut self, schema_id: &str) -> Self {
        self.credential_schema = Some(CredentialSchema {
            id: schema_id.to_string(),
            type_: JSON_SCHEMA_TYPE.to_string(),
        });
        self
    }

    /// Builds the credential. The subject is written to the `id` claim, replacing any `id` in
    /// the claims.
    pub fn build(self) -> Result<VerifiableCredential, CredentialServiceError> {
        if self.issuer.is_empty() {
            return Err(CredentialServiceError::InvalidCredential(
                "credential must have an issuer".to_string(),
            ));
        }
        if self.subject.is_empty() {
            return Err(CredentialServiceError::InvalidCredential(
                "credential must have a subject".to_string(),
            ));
        }
        let mut credential_subject = self.claims;
        credential_subject.insert(SUBJECT_ID_KEY.to_string(), ClaimValue::String(self.subject));
        Ok(VerifiableCredential {
            context: self.context,
            id: self.id,
            type_: self.type_,
            issuer: self.issuer,
            issuance_date: self
                .issuance_date
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            expiration_date: self.expiration_date,
            credential_schema: self.credential_schema,
            credential_subject,
        })
    }
}
