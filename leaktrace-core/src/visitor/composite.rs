//! Fan-out visitor so several queries share one traversal.

use super::Visitor;
use crate::edge::EdgeRef;
use crate::runtime::TypeRef;

/// Forwards every visit to all sub-visitors.
///
/// Continues into an object's children if any sub-visitor asks to.
pub struct CompositeVisitor<'a, O> {
    visitors: Vec<&'a mut dyn Visitor<O>>,
}

impl<'a, O> CompositeVisitor<'a, O> {
    pub fn new(visitors: Vec<&'a mut dyn Visitor<O>>) -> Self {
        Self { visitors }
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

impl<O> Visitor<O> for CompositeVisitor<'_, O> {
    fn visit(&mut self, edge: &EdgeRef<O>, ty: &TypeRef, first_visit: bool) -> bool {
        // No short-circuit: every sub-visitor must see every call.
        let mut keep_going = false;
        for visitor in self.visitors.iter_mut() {
            keep_going |= visitor.visit(edge, ty, first_visit);
        }
        keep_going
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::ReferenceEdge;
    use crate::runtime::{ObjectId, TypeInfo};

    #[test]
    fn forwards_to_all_and_ors_results() {
        let ty = TypeInfo::class("app.Thing").into_ref();
        let edge = ReferenceEdge::root((), ObjectId::new(1).unwrap(), ty.clone());

        let mut a_calls = 0;
        let mut b_calls = 0;
        let mut stop = |_: &EdgeRef<()>, _: &TypeRef, _: bool| {
            a_calls += 1;
            false
        };
        let mut go = |_: &EdgeRef<()>, _: &TypeRef, _: bool| {
            b_calls += 1;
            true
        };
        let visitors: Vec<&mut dyn Visitor<()>> = vec![&mut stop, &mut go];
        let mut composite = CompositeVisitor::new(visitors);
        assert_eq!(composite.len(), 2);
        assert!(composite.visit(&edge, &ty, true));
        assert!(composite.visit(&edge, &ty, false));
        drop(composite);
        assert_eq!(a_calls, 2);
        assert_eq!(b_calls, 2);
    }

    #[test]
    fn empty_composite_stops() {
        let ty = TypeInfo::class("app.Thing").into_ref();
        let edge = ReferenceEdge::root((), ObjectId::new(1).unwrap(), ty.clone());
        let mut composite: CompositeVisitor<'_, ()> = CompositeVisitor::new(Vec::new());
        assert!(composite.is_empty());
        assert!(!composite.visit(&edge, &ty, true));
    }
}
