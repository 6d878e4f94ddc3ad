//! Authenticated HTTP client for the dashkit backend contract.
//!
//! [`client::ApiClient`] attaches bearer credentials to outbound
//! requests, transparently recovers from an expired access token once
//! per request via a single-flight refresh exchange, and escalates
//! unrecoverable auth failure to a full session teardown (store cleared,
//! user notified, redirected to login).
//!
//! The token store, notification sink, and navigation primitive are
//! injected trait objects so tests and hosts can substitute their own.

pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod store;

pub use client::{ApiClient, Envelope, PageMeta, Part, Payload};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorDetails};
pub use hooks::{Navigator, NotificationSink, Severity, TracingSink};
pub use store::{
    ACCESS_TOKEN_KEY, ACCESS_TOKEN_TTL, MemoryTokenStore, REFRESH_TOKEN_KEY, TokenStore,
    USER_ID_KEY, clear_session,
};
