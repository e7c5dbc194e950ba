//! Implements a client for the sixpack A/B testing server
//!
//! A [`Session`] enrolls a visitor in experiments (`participate`) and records
//! conversions (`convert`). Input is validated locally; the server does the
//! bucketing. Network and server failures never surface as errors, they come
//! back as a `failed` [`models::SixpackResponse`], and `participate` then
//! falls back to the first (control) alternative.
//!
//! The default request timeout is 10ms, override it with
//! [`models::SessionOptions::timeout`].
mod client;
mod error;
mod http;
mod validation;

pub mod models;
pub use crate::client::{generate_client_id, Session};
pub use crate::error::{Error, Result};
pub use crate::http::{DEFAULT_HOST, DEFAULT_TIMEOUT, UNREACHABLE};
