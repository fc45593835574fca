//! Bookkeeping collections owned by a single tracer run.

pub mod identity_set;
pub mod traversal_queue;

pub use identity_set::IdentitySet;
pub use traversal_queue::TraversalQueue;
