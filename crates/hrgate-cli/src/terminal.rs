//! Terminal implementation of the page surface.
//!
//! Dialogs become stdin prompts, toasts and navigation become lines on
//! stdout, and the employees table (when one was loaded) lives in memory.

use std::io::{self, BufRead, Write};

use hrgate_core::page::{Notice, Page};
use hrgate_core::table::{EmployeeTable, TableState};

pub struct TerminalPage {
    assume_yes: bool,
    table: Option<EmployeeTable>,
}

impl TerminalPage {
    pub fn new(assume_yes: bool, table: Option<EmployeeTable>) -> Self {
        Self { assume_yes, table }
    }
}

/// Render a table's visible rows and placeholder state
pub fn print_table(table: &EmployeeTable) {
    println!("Filter: {}", table.filter_label());
    match table.state() {
        TableState::Empty => {
            println!("No employees found");
            println!("Add your first employee to get started");
        }
        TableState::NoResults => {
            println!("No results found");
            println!("Try adjusting your search or filters");
        }
        TableState::Showing(count) => {
            for row in table.visible_rows() {
                println!(
                    "{:<6} {:<24} {:<28} {:<16} {:<16} {}",
                    row.employee_id, row.name, row.email, row.role, row.department, row.contact
                );
            }
            println!("{} employee(s)", count);
        }
    }
}

impl Page for TerminalPage {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }

    fn notify(&mut self, notice: Notice) {
        println!("{}", notice);
    }

    fn alert(&mut self, message: &str) {
        eprintln!("! {}", message);
    }

    fn navigate(&mut self, url: &str) {
        println!("-> {}", url);
    }

    fn reload(&mut self) {
        println!("(page reloaded)");
    }

    fn remove_row(&mut self, employee_id: &str) -> bool {
        let Some(table) = self.table.as_mut() else {
            return false;
        };
        let removed = table.remove(employee_id);
        if removed && table.state() == TableState::Empty {
            print_table(table);
        }
        removed
    }

    fn clear_storage(&mut self) {
        println!("(local session storage cleared)");
    }
}
