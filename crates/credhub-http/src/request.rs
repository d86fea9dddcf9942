//! Wire request types and their translation to service requests.
use crate::errors::CredhubHTTPError;
use credhub_core::claims::ClaimMap;
use credhub_core::service::{self, CredentialFilter};
use serde::{Deserialize, Serialize};

/// Reported when zero or several query parameters are set.
pub const QUERY_PARAMS_MESSAGE: &str =
    "must use one of the following query parameters: issuer, subject, schema";

/// Body of a create credential request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCredentialRequest {
    pub issuer: String,
    pub subject: String,
    /// Optional. If absent, only the default required context is applied.
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Optional. If present, the data is validated against the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub data: ClaimMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

impl CreateCredentialRequest {
    /// Name of the first required field that is missing or empty.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.issuer.is_empty() {
            Some("issuer")
        } else if self.subject.is_empty() {
            Some("subject")
        } else if self.data.is_empty() {
            Some("data")
        } else {
            None
        }
    }

    /// Maps the wire request onto the service request field by field.
    pub fn into_service_request(self) -> service::CreateCredentialRequest {
        service::CreateCredentialRequest {
            issuer: self.issuer,
            subject: self.subject,
            context: self.context,
            json_schema: self.schema,
            data: self.data,
            expiry: self.expiry,
        }
    }
}

impl From<CreateCredentialRequest> for service::CreateCredentialRequest {
    fn from(request: CreateCredentialRequest) -> Self {
        request.into_service_request()
    }
}

/// Query parameters for listing credentials. Exactly one must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialQueryParams {
    pub issuer: Option<String>,
    pub subject: Option<String>,
    pub schema: Option<String>,
}

impl CredentialQueryParams {
    /// Collects the known parameters from raw query pairs. The first value of a repeated
    /// parameter is kept.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "issuer" => &mut params.issuer,
                "subject" => &mut params.subject,
                "schema" => &mut params.schema,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// The single filter selected by the parameters. Empty values count as absent.
    pub fn into_filter(self) -> Result<CredentialFilter, CredhubHTTPError> {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());
        match (
            present(self.issuer),
            present(self.subject),
            present(self.schema),
        ) {
            (Some(issuer), None, None) => Ok(CredentialFilter::Issuer(issuer)),
            (None, Some(subject), None) => Ok(CredentialFilter::Subject(subject)),
            (None, None, Some(schema)) => Ok(CredentialFilter::Schema(schema)),
            _ => Err(CredhubHTTPError::bad_request(QUERY_PARAMS_MESSAGE)),
        }
    }
}

impl TryFrom<CredentialQueryParams> for CredentialFilter {
    type Error = CredhubHTTPError;

    fn try_from(params: CredentialQueryParams) -> Result<Self, Self::Error> {
        params.into_filter()
    }
}
