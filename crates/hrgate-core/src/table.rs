//! Employees table state: text search, department filter, row removal.
//!
//! A row is visible when it matches both the current search term and the
//! selected department. Hosts render `state()` to decide between the rows,
//! the "no results" placeholder and the "no employees" placeholder.

use tracing::debug;

use crate::models::EmployeeRow;
use crate::utils::title_case;

/// Department filter cycle, in click order. Index 0 shows everything.
pub const DEPARTMENTS: [&str; 7] = [
    "all",
    "engineering",
    "product",
    "design",
    "human resources",
    "marketing",
    "sales",
];

/// What the table body should display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    /// No rows at all
    Empty,
    /// Rows exist but none pass the current search/filter
    NoResults,
    Showing(usize),
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeTable {
    rows: Vec<EmployeeRow>,
    search_term: String,
    department: usize,
}

impl EmployeeTable {
    pub fn new(rows: Vec<EmployeeRow>) -> Self {
        let mut table = Self {
            rows,
            ..Self::default()
        };
        table.apply();
        table
    }

    pub fn rows(&self) -> &[EmployeeRow] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &EmployeeRow> {
        self.rows.iter().filter(|r| !r.hidden)
    }

    pub fn department(&self) -> &'static str {
        DEPARTMENTS[self.department]
    }

    /// Filter on a search term; whitespace is trimmed, case ignored.
    pub fn search(&mut self, term: &str) -> TableState {
        self.search_term = term.trim().to_lowercase();
        self.apply();
        self.state()
    }

    /// Advance to the next department in the cycle and re-filter.
    pub fn cycle_department(&mut self) -> &'static str {
        self.department = (self.department + 1) % DEPARTMENTS.len();
        self.apply();
        debug!(department = self.department(), "Department filter changed");
        self.department()
    }

    /// Select a department by name; unknown names leave the filter as is.
    pub fn set_department(&mut self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        match DEPARTMENTS.iter().position(|d| *d == wanted) {
            Some(index) => {
                self.department = index;
                self.apply();
                true
            }
            None => false,
        }
    }

    /// Text for the filter button
    pub fn filter_label(&self) -> String {
        match self.department() {
            "all" => "All Departments".to_string(),
            department => title_case(department),
        }
    }

    /// Remove a row by employee id. Returns false when no such row exists.
    pub fn remove(&mut self, employee_id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.employee_id != employee_id);
        self.rows.len() != before
    }

    pub fn state(&self) -> TableState {
        if self.rows.is_empty() {
            return TableState::Empty;
        }
        match self.visible_rows().count() {
            0 => TableState::NoResults,
            n => TableState::Showing(n),
        }
    }

    fn apply(&mut self) {
        let department = DEPARTMENTS[self.department];
        for row in &mut self.rows {
            let in_department = department == "all" || row.department.to_lowercase() == department;
            row.hidden = !(in_department && row.matches(&self.search_term));
        }
    }
}
