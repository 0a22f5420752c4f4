//! Business logic services.
//!
//! # Services
//!
//! - `products` - Product create/read/update/delete on top of a `ProductStore`

pub mod products;

pub use products::{ProductService, ProductServiceError};
