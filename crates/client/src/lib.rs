//! HTTP and filesystem backends for the admin console.
//!
//! [`http::HttpResourceApi`] implements the core API traits over the
//! backend's REST interface; [`token_store::FileTokenStore`] persists the
//! bearer token between runs.

pub mod config;
pub mod http;
pub mod token_store;

pub use config::{ClientConfig, ConfigError};
pub use http::HttpResourceApi;
pub use token_store::{FileTokenStore, TokenStoreError};
