//! Products REST service library.
//!
//! This crate provides the server as a library, allowing the router to be
//! exercised in-process by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod json_api;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
