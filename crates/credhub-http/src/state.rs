use crate::config::HTTPConfig;
use crate::errors::CredhubHTTPError;
use crate::router::CredentialRouter;
use credhub_core::issuer::LocalCredentialService;
use credhub_core::schema::SchemaRegistry;
use credhub_core::service::CredentialService;
use log::info;
use std::sync::Arc;

/// A shared app state for handlers.
pub struct AppState {
    pub config: HTTPConfig,
    pub credentials: CredentialRouter,
}

impl AppState {
    /// App state backed by an in-memory credential service, with schemas loaded from
    /// `schema_path` when configured.
    pub fn new(config: HTTPConfig) -> Result<Self, CredhubHTTPError> {
        let schemas = match &config.schema_path {
            Some(path) => SchemaRegistry::from_file(path)
                .map_err(|err| CredhubHTTPError::Config(err.to_string()))?,
            None => SchemaRegistry::new(),
        };
        info!("Loaded {} credential schema(s)", schemas.len());
        let service = Arc::new(LocalCredentialService::in_memory(schemas));
        Ok(Self::with_service(config, service))
    }

    pub fn with_service(config: HTTPConfig, service: Arc<dyn CredentialService>) -> Self {
        let span = tracing::info_span!("credential_router");
        Self {
            config,
            credentials: CredentialRouter::new(service, span),
        }
    }
}
