//! Data models for portal payloads and table rows.
//!
//! - `ActionResult`: `{success, message, error}` body returned by portal actions
//! - `AttendanceRequest`, `AttendanceKind`: check-in / check-out payloads
//! - `EmployeeRow`: one row of the employees table

pub mod action;
pub mod attendance;
pub mod employee;

pub use action::ActionResult;
pub use attendance::{AttendanceKind, AttendanceRequest};
pub use employee::EmployeeRow;
