//! Reference edges: how each reachable object was discovered.
//!
//! Edges form backward-linked chains ending at a root. Every object is
//! enqueued only through the first edge that discovers it, so the edge graph
//! is a forest even though the object graph may be cyclic.

use std::sync::Arc;

use crate::runtime::{ObjectId, TypeRef};

/// Shared, immutable handle to an edge.
pub type EdgeRef<O> = Arc<ReferenceEdge<O>>;

/// Provenance of an edge.
#[derive(Debug, Clone)]
pub enum EdgeKind {
    /// Starting object of the traversal.
    Root { ty: TypeRef },
    /// Value read from a storage slot of the holder (or of a type, for statics).
    Slot {
        declaring_type: TypeRef,
        slot: String,
        is_static: bool,
    },
    /// Element of the holder's array value.
    Index {
        component_type: TypeRef,
        index: usize,
    },
}

/// "`value` is reached via this edge from `holder`".
#[derive(Debug)]
pub struct ReferenceEdge<O> {
    value: O,
    identity: ObjectId,
    holder: Option<EdgeRef<O>>,
    kind: EdgeKind,
}

impl<O> ReferenceEdge<O> {
    /// Edge for a traversal root.
    pub fn root(value: O, identity: ObjectId, ty: TypeRef) -> EdgeRef<O> {
        Arc::new(Self {
            value,
            identity,
            holder: None,
            kind: EdgeKind::Root { ty },
        })
    }

    /// Edge for a value held in slot `slot` declared by `declaring_type`.
    pub fn slot(
        holder: &EdgeRef<O>,
        declaring_type: TypeRef,
        slot: impl Into<String>,
        is_static: bool,
        value: O,
        identity: ObjectId,
    ) -> EdgeRef<O> {
        Arc::new(Self {
            value,
            identity,
            holder: Some(Arc::clone(holder)),
            kind: EdgeKind::Slot {
                declaring_type,
                slot: slot.into(),
                is_static,
            },
        })
    }

    /// Edge for element `index` of the holder's array.
    pub fn index(
        holder: &EdgeRef<O>,
        component_type: TypeRef,
        index: usize,
        value: O,
        identity: ObjectId,
    ) -> EdgeRef<O> {
        Arc::new(Self {
            value,
            identity,
            holder: Some(Arc::clone(holder)),
            kind: EdgeKind::Index {
                component_type,
                index,
            },
        })
    }

    #[inline]
    pub fn value(&self) -> &O {
        &self.value
    }

    #[inline]
    pub fn identity(&self) -> ObjectId {
        self.identity
    }

    #[inline]
    pub fn holder(&self) -> Option<&EdgeRef<O>> {
        self.holder.as_ref()
    }

    #[inline]
    pub fn kind(&self) -> &EdgeKind {
        &self.kind
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.holder.is_none()
    }

    /// Number of edges between this one and its root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.holder.as_deref();
        while let Some(edge) = current {
            depth += 1;
            current = edge.holder.as_deref();
        }
        depth
    }

    /// Iterate from this edge back to its root.
    pub fn chain(&self) -> Chain<'_, O> {
        Chain { next: Some(self) }
    }

    /// Display label of this edge's provenance.
    ///
    /// Roots are labelled with their runtime type, slots with
    /// `<declaring type>#<slot>`, array elements with `<component>[<index>]`.
    pub fn label(&self) -> String {
        match &self.kind {
            EdgeKind::Root { ty } => ty.name.clone(),
            EdgeKind::Slot {
                declaring_type,
                slot,
                ..
            } => format!("{}#{}", declaring_type.name, slot),
            EdgeKind::Index {
                component_type,
                index,
            } => format!("{}[{}]", component_type.name, index),
        }
    }
}

/// Iterator over an edge and its holders, ending at the root.
pub struct Chain<'a, O> {
    next: Option<&'a ReferenceEdge<O>>,
}

impl<'a, O> Iterator for Chain<'a, O> {
    type Item = &'a ReferenceEdge<O>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.holder.as_deref();
        Some(current)
    }
}
