//! Persistence layer
//!
//! The snapshot store is the single source of truth for durable application
//! state; everything above it works against the in-memory [`snapshot::Snapshot`].

pub mod snapshot;
pub mod snapshot_store;
