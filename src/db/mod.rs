//! Persistence module: record and account stores backed by flat JSON files.
//!
//! Layout:
//! - `models.rs`: record and field structs as stored on disk
//! - `file.rs`: whole-file read, atomic write and removal helpers
//! - `records.rs`: business-card record store with id assignment
//! - `accounts.rs`: username/password-hash store and authentication

pub mod accounts;
pub mod file;
pub mod models;
pub mod records;

pub use accounts::{AccountStore, LoginCheck};
pub use models::{BusinessCardRecord, CardFields};
pub use records::RecordStore;
