//! Gateway server implementation

pub mod auth;
pub mod environment;
pub mod forward;
pub mod router;
pub mod routes;
mod server;

pub use environment::Environment;
pub use forward::{Forwarder, MtlsForwarder, UpstreamRequest, UpstreamResponse};
pub use router::{AppState, create_router};
pub use server::Gateway;
