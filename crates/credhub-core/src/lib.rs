//! Core credential types and the credential service seam (transport independent).
pub mod claims;
pub mod credential;
pub mod issuer;
pub mod schema;
pub mod service;
pub mod store;

/// Environment variable name for the Credhub config file.
pub const CREDHUB_CONFIG: &str = "CREDHUB_CONFIG";

/// Base context applied to every credential.
pub const DEFAULT_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Base type applied to every credential.
pub const DEFAULT_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Type of the `credentialSchema` reference for JSON schemas.
pub const JSON_SCHEMA_TYPE: &str = "JsonSchemaValidator2018";

/// Claim key holding the credential subject identifier.
pub const SUBJECT_ID_KEY: &str = "id";
