//! Secret backend integration for Sophia.
//!
//! This module provides the `SecretStore` abstraction over the external
//! configuration/secrets backend (a Pulumi-ESC-style HTTP API) together with
//! the env-file helpers used by the `secrets import-env`/`export-env` commands.

pub mod envfile;
pub mod esc;
pub mod http;
pub mod store;

pub use esc::EscClient;
pub use http::{HttpClient, ReqwestClient};
pub use store::{SecretStore, StoreHealth};
