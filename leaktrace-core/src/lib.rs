//! # leaktrace-core
//!
//! Heap reachability tracer for diagnosing reference leaks.
//!
//! Starting from a set of roots, the [`Tracer`](tracer::Tracer) walks every
//! object transitively reachable through the host runtime's introspection
//! capability ([`Introspector`](runtime::Introspector)), hands each discovered
//! object to a pluggable [`Visitor`](visitor::Visitor), and keeps the edge
//! through which every object was first reached so that a
//! [`PathReport`](report::PathReport) can later explain *why* an object is
//! still alive.
//!
//! ```ignore
//! use leaktrace_core::prelude::*;
//!
//! let config = TraceConfig::default();
//! let mut leaked = TypeCollector::new("app.Editor", true);
//! let status = Tracer::new(&runtime, &config).run(&roots, &mut leaked, true)?;
//! if leaked.count() > 0 {
//!     eprintln!("{}", leaked.report(&runtime, config.effective_report_value_max_len()));
//! }
//! ```

pub mod collections;
pub mod config;
pub mod edge;
pub mod errors;
pub mod leak_check;
pub mod report;
pub mod runtime;
pub mod tracer;
pub mod tracing_setup;
pub mod visitor;

/// Convenience re-exports for embedding applications.
pub mod prelude {
    pub use crate::config::TraceConfig;
    pub use crate::edge::{EdgeKind, EdgeRef, ReferenceEdge};
    pub use crate::errors::{AccessError, ConfigError, LeakTraceErrorCode, TraceError};
    pub use crate::leak_check::{check_instance_counts, InstanceExpectation, LeakCheckOutcome};
    pub use crate::report::{BacklinkNode, PathReport};
    pub use crate::runtime::{
        Introspector, ObjectId, ReferentStrength, SlotInfo, TypeInfo, TypeKind, TypeRef,
    };
    pub use crate::tracer::{AccessDiagnostic, RunStatus, Tracer};
    pub use crate::visitor::{CompositeVisitor, Match, TypeCollector, Visitor};
}
