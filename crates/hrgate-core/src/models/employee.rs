use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

/// One row of the employees table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeRow {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Lowercase department key, e.g. `human resources`
    pub department: String,
    pub contact: String,
    #[serde(default)]
    pub hidden: bool,
}

impl EmployeeRow {
    /// Case-insensitive match against every searchable column.
    pub fn matches(&self, term: &str) -> bool {
        [&self.name, &self.email, &self.role, &self.department, &self.contact]
            .iter()
            .any(|field| contains_ignore_case(field, term))
    }
}
