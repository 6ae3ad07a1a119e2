//! Storage layer for bakr
//!
//! The queue snapshot file, written atomically with its directory created
//! on demand.

pub mod queue_store;

pub use queue_store::QueueStore;
