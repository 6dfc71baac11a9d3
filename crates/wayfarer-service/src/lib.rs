//! Slug resolution and backfill logic on top of the record store.

pub mod backfill;
pub mod error;
pub mod lookup;
pub mod resolve;
