pub mod extraction_api;

pub use extraction_api::ExtractionApi;
