//! Host runtime boundary.
//!
//! The tracer never inspects memory itself. Everything it learns about an
//! object (its identity, its type, the values stored in its slots) comes
//! through the [`Introspector`] trait, which the embedding runtime
//! implements.
//!
//! ```text
//! ┌─────────────────┐           ┌──────────────────────────┐
//! │ leaktrace-core  │           │      host runtime        │
//! │                 │           │                          │
//! │   Tracer        │◀──────────│  impl Introspector       │
//! │   uses:         │           │  (reflection, VM object  │
//! │   Introspector  │           │   model, test heap, ...) │
//! └─────────────────┘           └──────────────────────────┘
//! ```

pub mod identity;
pub mod namespace;
pub mod types;

pub use identity::ObjectId;
pub use namespace::{NamespaceClass, NamespaceFilter, TRACER_NAMESPACE};
pub use types::{ReferentStrength, SlotInfo, TypeInfo, TypeKind, TypeRef};

use crate::errors::AccessError;

/// Introspection capability supplied by the host runtime.
///
/// `Object` is the runtime's handle to a heap object. Handles are cloned into
/// reference edges, so they should be cheap to clone (an index, a pointer, an
/// `Arc`).
pub trait Introspector {
    /// Handle to a live heap object.
    type Object: Clone;

    /// Identity of `object`. Two handles to the same object must yield the
    /// same id; handles to different live objects must not.
    fn identity(&self, object: &Self::Object) -> ObjectId;

    /// Runtime (most derived) type of `object`.
    fn type_of(&self, object: &Self::Object) -> TypeRef;

    /// If `object` is itself a loaded type descriptor, the type it describes.
    /// Its static slots are then traversed as well.
    fn as_type_descriptor(&self, _object: &Self::Object) -> Option<TypeRef> {
        None
    }

    /// Number of elements of an array object.
    fn array_len(&self, array: &Self::Object) -> usize;

    /// Element `index` of an array object, `None` when the element is null.
    fn array_element(&self, array: &Self::Object, index: usize) -> Option<Self::Object>;

    /// Force-read `slot` declared by `declaring`, bypassing access control.
    ///
    /// `holder` is `None` for static (type-level) slots. `Ok(None)` means the
    /// slot holds null; `Err` means the runtime refused access.
    fn read_slot(
        &self,
        holder: Option<&Self::Object>,
        declaring: &TypeRef,
        slot: &SlotInfo,
    ) -> Result<Option<Self::Object>, AccessError>;

    /// Human-readable description of `object` for reports.
    fn describe(&self, object: &Self::Object) -> String;
}
