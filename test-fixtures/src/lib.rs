//! Test fixtures for leaktrace.
//!
//! Provides [`ModelHeap`], an arena-backed [`Introspector`] whose objects,
//! types and slots are built programmatically, plus a loader for JSON heap
//! descriptions under `test-fixtures/heaps/`.
//!
//! [`Introspector`]: leaktrace_core::runtime::Introspector

pub mod heap;
pub mod loader;
pub mod types;

pub use heap::{ModelHeap, ObjRef};
pub use loader::{fixture_path, load_heap, load_heap_str, LoadedHeap};
pub use types::ReferenceTypes;
