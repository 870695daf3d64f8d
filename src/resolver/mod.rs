//! Service configuration resolution.
//!
//! The resolver assembles per-service configuration from the secret backend
//! and the process environment, with a per-service TTL cache in front. Missing
//! keys and backend failures degrade silently (logged, treated as absence);
//! the one hard contract lives in the connection-string builder.

pub mod cache;
pub mod connection;
pub mod resolver;

pub use connection::{MissingConfigurationError, connection_string};
pub use resolver::{ConfigResolver, ServiceConfig};
