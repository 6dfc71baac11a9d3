//! PostgreSQL persistence for resource records.

pub mod db;
pub mod error;
pub mod model;
