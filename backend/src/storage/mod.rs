//! # Storage Module
//!
//! Persistence for the admin backend: the repository traits the domain
//! layer depends on, and the JSON-file backend implementing them.

pub mod json;
pub mod traits;

pub use json::*;
pub use traits::*;
