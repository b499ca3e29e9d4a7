//! The timesheet lifecycle engine: pure, synchronous functions over snapshot
//! values. Handlers take a snapshot out of the store, call in here, and
//! replace the collection wholesale with the returned value.

pub mod directory;
pub mod error;
pub mod reconcile;
pub mod visibility;
pub mod workflow;
