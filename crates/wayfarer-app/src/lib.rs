pub mod app;
pub mod config;
pub mod error;
pub mod lookup_handler;
pub mod middleware;
