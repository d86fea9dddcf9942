use crate::errors::CredhubHTTPError;
use crate::router::CredentialHTTPHandler;
use crate::{config::HTTPConfig, handlers, state::AppState};
use axum::routing::{get, put, IntoMakeService};
use axum::Router;
use hyper::server::conn::AddrIncoming;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// A wrapped axum router with the credential routes.
pub struct CredhubRouter {
    router: Router,
}

impl From<Arc<AppState>> for CredhubRouter {
    fn from(app_state: Arc<AppState>) -> Self {
        Self {
            router: Self::generate_router(app_state),
        }
    }
}

impl CredhubRouter {
    fn generate_router(shared_state: Arc<AppState>) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/credentials",
                put(CredentialHTTPHandler::put_credential)
                    .get(CredentialHTTPHandler::get_credentials),
            )
            .route(
                "/credentials/:id",
                get(CredentialHTTPHandler::get_credential)
                    .delete(CredentialHTTPHandler::delete_credential),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(shared_state)
    }

    /// Moves wrapped app router and consumes.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Builds a server bound to the configured address, ready to be awaited.
pub fn http_server(
    config: HTTPConfig,
) -> Result<axum::Server<AddrIncoming, IntoMakeService<Router>>, CredhubHTTPError> {
    let addr = config.to_socket_address();
    let shared_state = Arc::new(AppState::new(config)?);
    let app = CredhubRouter::from(shared_state).into_router();
    let builder = axum::Server::try_bind(&addr)
        .map_err(|err| CredhubHTTPError::Config(format!("could not bind {addr}: {err}")))?;
    Ok(builder.serve(app.into_make_service()))
}
