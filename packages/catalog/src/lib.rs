// Family Bookshelf - catalog core
//
// Shared core for the family book-recommendation catalog: session
// reconciliation against the external auth service, the family-member
// store, and the book/year/recommendation data layer.
//
// UI, routing, and image storage live in the client apps; this crate only
// exposes the resolved session and the data surface they bind to.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
