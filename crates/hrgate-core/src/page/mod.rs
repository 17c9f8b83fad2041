//! The page surface the action bindings act on.
//!
//! Hosts implement [`Page`] to show dialogs and toasts, navigate, and mutate
//! the employees table. Event targets are described by [`Element`] and
//! matched with CSS-style [`Selector`]s.

pub mod element;
pub mod notice;

pub use element::{Element, Selector, SelectorError};
pub use notice::{Notice, NoticeKind};

/// Everything a binding may do to the page.
pub trait Page {
    /// Blocking yes/no prompt. `false` aborts the action.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Non-blocking toast
    fn notify(&mut self, notice: Notice);

    /// Blocking message; the view stays as it is
    fn alert(&mut self, message: &str);

    fn navigate(&mut self, url: &str);

    fn reload(&mut self);

    /// Remove the table row carrying `data-employee-id`. Returns false when
    /// the page has no such row.
    fn remove_row(&mut self, employee_id: &str) -> bool;

    /// Drop any client-side storage the page keeps (logout).
    fn clear_storage(&mut self);
}
