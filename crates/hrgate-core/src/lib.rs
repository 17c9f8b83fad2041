//! Core library for hrgate.
//!
//! Client-side plumbing for the HR employee portal: the token store that
//! pulls the session-backed bearer token from the backend, the gateway that
//! attaches it to every authenticated call and classifies the response, and
//! the action bindings that turn page events into requests and feedback.
//!
//! The page itself (dialogs, toasts, navigation, table rows) is abstracted
//! behind the [`page::Page`] trait so any host can drive the bindings.

pub mod api;
pub mod auth;
pub mod bindings;
pub mod config;
pub mod context;
pub mod models;
pub mod page;
pub mod table;
pub mod utils;

pub use api::{Classification, Gateway, GatewayError, Reply, RequestDescriptor};
pub use auth::{SessionToken, TokenStore};
pub use bindings::{ActionOutcome, Dispatcher, UiEvent};
pub use config::Config;
pub use context::SessionContext;
pub use page::{Element, Notice, NoticeKind, Page};
