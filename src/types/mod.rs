//! Core type definitions for cleanfiles

mod action;
mod error;
mod inventory;
mod record;

pub use action::{Action, ActionKind, Destination};
pub use error::CleanError;
pub use inventory::{Inventory, ScanIssue};
pub use record::FileRecord;
