// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # BillBook Fetch
//!
//! HTTP access to the MyBillBook web API.
//!
//! - [`auth`] - Credentials and the fixed header set bound to every request
//! - [`client`] - [`ApiClient`], which classifies each response and retries
//!   transient failures from one driver loop
//! - [`retry`] - [`RetryPolicy`]: linear backoff for rate limits, fixed
//!   backoff for transport failures, one shared retry cap
//! - [`error`] - [`RequestError`] and its [`ErrorKind`] classification
//!
//! ## Example
//!
//! ```ignore
//! use billbook_fetch::{ApiClient, ClientSettings, Credentials};
//!
//! let client = ApiClient::new(ClientSettings::default(), &Credentials::from_env())?;
//! client.probe().await?;
//! let page = client.list_items(1, 500).await?;
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod retry;

pub use auth::{Credentials, AUTH_TOKEN_ENV, COMPANY_ID_ENV, COOKIES_ENV};
pub use client::{endpoints, ApiClient, ClientSettings, HttpMethod, Query, DEFAULT_BASE_URL};
pub use error::{ErrorKind, RequestError};
pub use retry::RetryPolicy;
