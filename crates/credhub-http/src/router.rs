//! Credential router: validates requests, dispatches them to the credential service and shapes
//! the responses.
use crate::errors::CredhubHTTPError;
use crate::extract::{CredentialQuery, DecodedJson, DecodedPath};
use crate::request::{CreateCredentialRequest, CredentialQueryParams};
use crate::state::AppState;
use crate::utils::sanitize_log;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use credhub_core::credential::VerifiableCredential;
use credhub_core::service::{CredentialFilter, CredentialService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, Span};

/// Response to a created credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCredentialResponse {
    pub credential: VerifiableCredential,
}

/// Response to a credential lookup by ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetCredentialResponse {
    pub id: String,
    pub credential: VerifiableCredential,
}

/// Response to a filtered credential listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetCredentialsResponse {
    pub credentials: Vec<VerifiableCredential>,
}

/// Validates and dispatches credential requests to a [`CredentialService`].
///
/// Holds no per-call state, so one router serves concurrent requests. Errors are logged once,
/// under the span given at construction.
#[derive(Clone)]
pub struct CredentialRouter {
    service: Arc<dyn CredentialService>,
    span: Span,
}

impl CredentialRouter {
    pub fn new(service: Arc<dyn CredentialService>, span: Span) -> Self {
        Self { service, span }
    }

    /// Span that request errors are logged under.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Creates a credential from a wire request.
    pub async fn create_credential(
        &self,
        request: CreateCredentialRequest,
    ) -> Result<CreateCredentialResponse, CredhubHTTPError> {
        if let Some(field) = request.missing_field() {
            let message = format!("invalid create credential request: {field} is required");
            error!(parent: &self.span, operation = "create_credential", "{}", message);
            return Err(CredhubHTTPError::bad_request(message));
        }

        let credential = self
            .service
            .create_credential(request.into_service_request())
            .await
            .map_err(|err| {
                let message = "could not create credential";
                error!(
                    parent: &self.span,
                    operation = "create_credential",
                    error = %sanitize_log(&err.to_string()),
                    "{}",
                    message
                );
                CredhubHTTPError::internal(message, err)
            })?;
        debug!(parent: &self.span, id = %credential.id, "created credential");
        Ok(CreateCredentialResponse { credential })
    }

    /// Looks up a credential by ID. Lookup failures are reported as bad requests.
    pub async fn get_credential(
        &self,
        id: Option<&str>,
    ) -> Result<GetCredentialResponse, CredhubHTTPError> {
        let id = match id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let message = "cannot get credential without ID parameter";
                error!(parent: &self.span, operation = "get_credential", "{}", message);
                return Err(CredhubHTTPError::bad_request(message));
            }
        };

        let credential = self.service.get_credential(id).await.map_err(|err| {
            let message = format!("could not get credential with id: {}", sanitize_log(id));
            error!(
                parent: &self.span,
                operation = "get_credential",
                error = %sanitize_log(&err.to_string()),
                "{}",
                message
            );
            CredhubHTTPError::bad_request_with(message, err)
        })?;
        Ok(GetCredentialResponse {
            id: credential.id.clone(),
            credential,
        })
    }

    /// Lists credentials matching exactly one of issuer, subject or schema.
    pub async fn get_credentials(
        &self,
        params: CredentialQueryParams,
    ) -> Result<GetCredentialsResponse, CredhubHTTPError> {
        let filter = params.into_filter().map_err(|err| {
            error!(parent: &self.span, operation = "get_credentials", "{}", err);
            err
        })?;

        let result = match &filter {
            CredentialFilter::Issuer(issuer) => {
                self.service.list_credentials_by_issuer(issuer).await
            }
            CredentialFilter::Subject(subject) => {
                self.service.list_credentials_by_subject(subject).await
            }
            CredentialFilter::Schema(schema) => {
                self.service.list_credentials_by_schema(schema).await
            }
        };
        let credentials = result.map_err(|err| {
            let message = format!(
                "could not get credentials for {}: {}",
                filter.kind(),
                sanitize_log(filter.value())
            );
            error!(
                parent: &self.span,
                operation = "get_credentials",
                error = %sanitize_log(&err.to_string()),
                "{}",
                message
            );
            CredhubHTTPError::internal(message, err)
        })?;
        Ok(GetCredentialsResponse { credentials })
    }

    /// Deletes a credential by ID.
    pub async fn delete_credential(&self, id: Option<&str>) -> Result<(), CredhubHTTPError> {
        let id = match id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let message = "cannot delete credential without ID parameter";
                error!(parent: &self.span, operation = "delete_credential", "{}", message);
                return Err(CredhubHTTPError::bad_request(message));
            }
        };

        self.service.delete_credential(id).await.map_err(|err| {
            let message = format!("could not delete credential with id: {}", sanitize_log(id));
            error!(
                parent: &self.span,
                operation = "delete_credential",
                error = %sanitize_log(&err.to_string()),
                "{}",
                message
            );
            CredhubHTTPError::internal(message, err)
        })
    }
}

/// Type for implementing the credential HTTP handlers.
pub struct CredentialHTTPHandler;

impl CredentialHTTPHandler {
    /// Handles `PUT /credentials`.
    pub async fn put_credential(
        State(app_state): State<Arc<AppState>>,
        DecodedJson(request): DecodedJson<CreateCredentialRequest>,
    ) -> impl IntoResponse {
        app_state
            .credentials
            .create_credential(request)
            .await
            .map(|response| (StatusCode::CREATED, Json(response)))
    }

    /// Handles `GET /credentials/:id`.
    pub async fn get_credential(
        DecodedPath(id): DecodedPath<String>,
        State(app_state): State<Arc<AppState>>,
    ) -> impl IntoResponse {
        app_state
            .credentials
            .get_credential(Some(&id))
            .await
            .map(|response| (StatusCode::OK, Json(response)))
    }

    /// Handles `GET /credentials?issuer=|subject=|schema=`.
    pub async fn get_credentials(
        CredentialQuery(params): CredentialQuery,
        State(app_state): State<Arc<AppState>>,
    ) -> impl IntoResponse {
        app_state
            .credentials
            .get_credentials(params)
            .await
            .map(|response| (StatusCode::OK, Json(response)))
    }

    /// Handles `DELETE /credentials/:id`.
    pub async fn delete_credential(
        DecodedPath(id): DecodedPath<String>,
        State(app_state): State<Arc<AppState>>,
    ) -> impl IntoResponse {
        app_state
            .credentials
            .delete_credential(Some(&id))
            .await
            .map(|_| StatusCode::OK)
    }
}
