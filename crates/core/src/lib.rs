//! Products Core - Domain types for the products service.
//!
//! This crate provides the types shared by the HTTP server and its tests:
//! - [`ProductId`] - type-safe product identifier
//! - [`Product`] - the validated product entity
//! - [`ProductInput`] - the request shape for create/update, with validation
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Storage and transport live in `products-server`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod input;
pub mod product;
pub mod types;

pub use input::{FieldError, ProductInput};
pub use product::{Product, ProductError, ProductFields};
pub use types::*;
