//! Session token handling.
//!
//! This module provides:
//! - `SessionToken`: the opaque bearer credential handed out by the backend
//! - `TokenStore`: fetch-on-demand cache of the current token
//! - `logout_url`: the identity provider's end-session URL
//!
//! Tokens live only in memory and are dropped on logout.

pub mod logout;
pub mod session;

pub use logout::logout_url;
pub use session::{SessionToken, TokenStore};
