// fmcly-api: Async Rust client for the Firepower Management Center REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::AuthToken;
pub use client::{FmcClient, PAGE_LIMIT};
pub use error::Error;
pub use reqwest::Method;
pub use transport::{TlsMode, TransportConfig};
pub use types::{DomainInfo, ObjectSummary, Page, Paging};
