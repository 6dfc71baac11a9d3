//! Core types and pure logic shared across the Wayfarer workspace.
//!
//! Nothing in this crate touches the network or the database: slug
//! normalization, identifier classification, request path parsing, the error
//! vocabulary, and configuration loading all live here.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod util;
