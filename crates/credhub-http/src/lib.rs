//! Credhub HTTP server functionality.
pub mod config;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod request;
pub mod router;
pub mod server;
pub mod state;
pub mod utils;
