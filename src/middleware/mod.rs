pub mod auth;
pub mod card_upload;
