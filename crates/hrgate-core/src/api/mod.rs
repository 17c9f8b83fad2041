//! Authenticated request gateway for the portal API.
//!
//! Every outgoing call goes through [`Gateway::send`], which pulls a bearer
//! token from the [`TokenStore`](crate::auth::TokenStore), attaches it and
//! classifies the response. Nothing patches the HTTP client globally; callers
//! invoke the gateway explicitly.

pub mod error;
pub mod gateway;
pub mod request;

pub use error::{Classification, GatewayError};
pub use gateway::{Gateway, Reply};
pub use request::{Body, RequestDescriptor};
