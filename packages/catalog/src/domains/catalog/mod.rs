//! Catalog domain - books, academic years, and recommendations
//!
//! Thin data layer: the query surface the client apps bind to, plus input
//! validation for the write paths.

pub mod models;
pub mod validation;

pub use models::{Book, Recommendation, RecommendationDetail, Year};
pub use validation::ValidationError;
