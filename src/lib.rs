pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use db::{AccountStore, BusinessCardRecord, CardFields, RecordStore};
pub use error::CardError;
pub use types::{AuthResult, Session};
