use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};

/// Default attendance status recorded by the backend
const DEFAULT_STATUS: &str = "present";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceKind {
    CheckIn,
    CheckOut,
}

impl AttendanceKind {
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceKind::CheckIn => "Check-in",
            AttendanceKind::CheckOut => "Check-out",
        }
    }
}

/// Payload for the attendance endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceRequest {
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    pub status: String,
}

impl AttendanceRequest {
    pub fn at(kind: AttendanceKind, employee_id: impl Into<String>, time: NaiveTime) -> Self {
        let stamp = time.format("%H:%M:%S").to_string();
        let (check_in, check_out) = match kind {
            AttendanceKind::CheckIn => (Some(stamp), None),
            AttendanceKind::CheckOut => (None, Some(stamp)),
        };
        Self {
            employee_id: employee_id.into(),
            check_in,
            check_out,
            status: DEFAULT_STATUS.to_string(),
        }
    }

    /// Stamped with the local wall-clock time
    pub fn now(kind: AttendanceKind, employee_id: impl Into<String>) -> Self {
        Self::at(kind, employee_id, Local::now().time())
    }
}
