//! Visitors invoked by the tracer for every accepted edge.

pub mod composite;
pub mod type_collector;

pub use composite::CompositeVisitor;
pub use type_collector::{Match, TypeCollector};

use crate::edge::EdgeRef;
use crate::runtime::TypeRef;

/// Strategy invoked by the tracer for every dequeued, non-excluded edge.
///
/// Called on repeat visits too; `first_visit` tells whether the object's
/// identity was seen for the first time in this run. The return value asks
/// the tracer to explore the object's outgoing references and is only
/// honoured on first visits.
pub trait Visitor<O> {
    fn visit(&mut self, edge: &EdgeRef<O>, ty: &TypeRef, first_visit: bool) -> bool;
}

impl<O, F> Visitor<O> for F
where
    F: FnMut(&EdgeRef<O>, &TypeRef, bool) -> bool,
{
    fn visit(&mut self, edge: &EdgeRef<O>, ty: &TypeRef, first_visit: bool) -> bool {
        self(edge, ty, first_visit)
    }
}
