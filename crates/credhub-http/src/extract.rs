//! Request decoding that reports failures as bad requests with the standard error body.
use crate::errors::CredhubHTTPError;
use crate::request::{CreateCredentialRequest, CredentialQueryParams, QUERY_PARAMS_MESSAGE};
use crate::state::AppState;
use crate::utils::sanitize_log;
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use axum::http::request::Parts;
use axum::http::Request;
use axum::Json;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, Span};

/// State carrying the span that extraction failures are logged under.
pub trait LogSpan {
    fn log_span(&self) -> &Span;
}

impl LogSpan for Span {
    fn log_span(&self) -> &Span {
        self
    }
}

impl LogSpan for Arc<AppState> {
    fn log_span(&self) -> &Span {
        self.credentials.span()
    }
}

/// A request body type with the message reported when it cannot be decoded.
pub trait RequestBody: DeserializeOwned {
    const INVALID_MESSAGE: &'static str;
}

impl RequestBody for CreateCredentialRequest {
    const INVALID_MESSAGE: &'static str = "invalid create credential request";
}

/// JSON body extractor. Any rejection (content type, syntax, missing or mistyped field) is a
/// `400` with the standard error body instead of axum's default rejection response.
#[derive(Debug, Clone)]
pub struct DecodedJson<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for DecodedJson<T>
where
    T: RequestBody,
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    S: LogSpan + Send + Sync,
    B: Send + 'static,
{
    type Rejection = CredhubHTTPError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(DecodedJson(value)),
            Err(rejection) => {
                // Serde messages can quote parts of the body.
                let detail = sanitize_log(&rejection.body_text());
                error!(parent: state.log_span(), error = %detail, "{}", T::INVALID_MESSAGE);
                Err(CredhubHTTPError::bad_request(format!(
                    "{}: {}",
                    T::INVALID_MESSAGE,
                    detail
                )))
            }
        }
    }
}

/// Path parameter extractor reporting undecodable parameters (e.g. invalid UTF-8) as a `400`.
#[derive(Debug, Clone)]
pub struct DecodedPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for DecodedPath<T>
where
    T: DeserializeOwned + Send,
    S: LogSpan + Send + Sync,
{
    type Rejection = CredhubHTTPError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(DecodedPath(value)),
            Err(rejection) => {
                let detail = sanitize_log(&rejection.body_text());
                let message = format!("invalid path parameter: {detail}");
                error!(parent: state.log_span(), "{}", message);
                Err(CredhubHTTPError::bad_request(message))
            }
        }
    }
}

/// Credential listing query. A repeated parameter takes its first value and unknown
/// parameters are ignored.
#[derive(Debug, Clone)]
pub struct CredentialQuery(pub CredentialQueryParams);

#[async_trait]
impl<S> FromRequestParts<S> for CredentialQuery
where
    S: LogSpan + Send + Sync,
{
    type Rejection = CredhubHTTPError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<Vec<(String, String)>>::from_request_parts(parts, state).await {
            Ok(Query(pairs)) => Ok(CredentialQuery(CredentialQueryParams::from_pairs(pairs))),
            Err(rejection) => {
                let detail = sanitize_log(&rejection.body_text());
                error!(parent: state.log_span(), error = %detail, "{}", QUERY_PARAMS_MESSAGE);
                Err(CredhubHTTPError::bad_request(QUERY_PARAMS_MESSAGE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use hyper::StatusCode;

    async fn decode(
        body: &'static str,
        content_type: &str,
    ) -> Result<DecodedJson<CreateCredentialRequest>, CredhubHTTPError> {
        let req = Request::builder()
            .method("PUT")
            .uri("/credentials")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        DecodedJson::<CreateCredentialRequest>::from_request(req, &Span::none()).await
    }

    async fn query(uri: &str) -> CredentialQueryParams {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        let span = Span::none();
        let CredentialQuery(params) = CredentialQuery::from_request_parts(&mut parts, &span)
            .await
            .unwrap();
        params
    }

    #[tokio::test]
    async fn test_decode_ok() {
        let DecodedJson(request) = decode(
            r#"{"issuer":"did:example:a","subject":"did:example:b","data":{"name":"x"}}"#,
            "application/json",
        )
        .await
        .unwrap();
        assert_eq!(request.issuer, "did:example:a");
    }

    #[tokio::test]
    async fn test_decode_failures_are_bad_requests() {
        for (body, content_type) in [
            (r#"{"issuer":"did:example:a","subject":"did:example:b"}"#, "application/json"),
            (r#"{"issuer":"did:example:a","#, "application/json"),
            (r#"{"issuer":1,"subject":"did:example:b","data":{}}"#, "application/json"),
            (r#"{"issuer":"did:example:a","subject":"did:example:b","data":{}}"#, "text/plain"),
        ] {
            let err = decode(body, content_type).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert!(err
                .to_string()
                .starts_with("invalid create credential request"));
        }
    }

    #[tokio::test]
    async fn test_query_first_value_wins() {
        assert_eq!(
            query("/credentials?issuer=did:example:a&issuer=did:example:b").await,
            CredentialQueryParams {
                issuer: Some("did:example:a".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(
            query("/credentials?subject=did:example:b&page=2").await,
            CredentialQueryParams {
                subject: Some("did:example:b".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(query("/credentials").await, CredentialQueryParams::default());
    }
}
