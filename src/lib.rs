//! Library crate for member-admin.
//!
//! This crate exposes the building blocks of the TUI:
//! - Member record and column selector (`member`)
//! - Data sources and the one-shot load (`source`)
//! - Column search helpers (`search`)
//! - View-state core: pagination, selection, editing, deletes (`table`)
//! - Application state and update loop (`app`)
//! - UI rendering (`ui`)
//! - CLI, logging and error types (`cli`, `logging`, `error`)
//!
//! It is used by the `member-admin` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod cli;
pub mod error;
pub mod logging;
pub mod member;
pub mod search;
pub mod source;
pub mod table;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
pub use member::{Member, MemberField};
pub use table::MemberTable;
