//! Credhub library.
pub use credhub_core as core;
pub use credhub_http as http;
