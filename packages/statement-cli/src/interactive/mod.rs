//! Interactive menu over a single extraction session
//!
//! The menu only offers actions the session can take right now: extraction
//! appears once a file and at least one column are present, preview actions
//! only with a file selected.

mod menu;
mod runner;

pub use runner::run_interactive;
