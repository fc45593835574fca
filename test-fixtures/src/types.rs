//! Well-known types of the model runtime.

use leaktrace_core::runtime::{ReferentStrength, SlotInfo, TypeInfo, TypeRef};

/// Name of the type every type-descriptor object has.
pub const TYPE_DESCRIPTOR: &str = "lang.Type";

/// Reference wrapper types, mirroring a managed runtime's `lang.ref` package.
#[derive(Debug, Clone)]
pub struct ReferenceTypes {
    pub weak: TypeRef,
    pub soft: TypeRef,
    pub phantom: TypeRef,
}

impl ReferenceTypes {
    pub fn new() -> Self {
        Self {
            weak: wrapper("lang.ref.WeakReference", ReferentStrength::Weak),
            soft: wrapper("lang.ref.SoftReference", ReferentStrength::Soft),
            phantom: wrapper("lang.ref.PhantomReference", ReferentStrength::Phantom),
        }
    }
}

impl Default for ReferenceTypes {
    fn default() -> Self {
        Self::new()
    }
}

fn wrapper(name: &str, strength: ReferentStrength) -> TypeRef {
    TypeInfo::class(name)
        .with_slot(SlotInfo::referent("referent", strength))
        .with_slot(SlotInfo::reference("queue"))
        .into_ref()
}
