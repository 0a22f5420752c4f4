//! Core types for the products service.

pub mod id;

pub use id::*;
