//! Catalog Application Library
//!
//! Genre, book instance and book pages, the form validation pipeline, and
//! the bootstrap that wires them to the store and the HTTP server.

pub mod bootstrap;
pub mod modules;
pub mod validation;

pub use bootstrap::{build_registry, run};
