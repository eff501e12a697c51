pub mod extraction;
pub mod session;

pub use extraction::ExtractedFields;
pub use session::{AuthResult, Session};
