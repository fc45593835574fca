//! Type descriptors supplied by the host runtime.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

/// Shared handle to a type descriptor.
pub type TypeRef = Arc<TypeInfo>;

/// Strength of the reference held by a reference wrapper's referent slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferentStrength {
    Weak,
    Soft,
    Phantom,
}

impl ReferentStrength {
    /// Weak and soft referents do not keep their target alive.
    #[inline]
    pub fn is_weak_or_soft(self) -> bool {
        matches!(self, Self::Weak | Self::Soft)
    }
}

/// Shape of a type.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Class,
    Interface,
    /// Value type that can never hold a reference.
    Primitive,
    Array {
        component: TypeRef,
    },
}

/// A storage slot declared by a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    pub name: String,
    /// Type-level storage rather than per-instance storage.
    pub is_static: bool,
    /// Slot holds a primitive value and is never traversed.
    pub is_primitive: bool,
    /// Set when this slot is the referent slot of a reference wrapper type.
    pub referent: Option<ReferentStrength>,
}

impl SlotInfo {
    /// Instance slot holding a reference.
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            is_primitive: false,
            referent: None,
        }
    }

    /// Instance slot holding a primitive value.
    pub fn primitive(name: impl Into<String>) -> Self {
        Self {
            is_primitive: true,
            ..Self::reference(name)
        }
    }

    /// Type-level slot holding a reference.
    pub fn static_reference(name: impl Into<String>) -> Self {
        Self {
            is_static: true,
            ..Self::reference(name)
        }
    }

    /// Referent slot of a weak/soft/phantom reference wrapper.
    pub fn referent(name: impl Into<String>, strength: ReferentStrength) -> Self {
        Self {
            referent: Some(strength),
            ..Self::reference(name)
        }
    }

    /// Slot holding a reference the tracer may follow.
    #[inline]
    pub fn is_traceable_instance_slot(&self) -> bool {
        !self.is_static && !self.is_primitive
    }

    #[inline]
    pub fn is_traceable_static_slot(&self) -> bool {
        self.is_static && !self.is_primitive
    }

    /// True for the referent slot of a weak or soft reference wrapper.
    #[inline]
    pub fn is_weak_or_soft_referent(&self) -> bool {
        self.referent.is_some_and(ReferentStrength::is_weak_or_soft)
    }
}

/// Runtime type descriptor: name, namespace, supertypes and declared slots.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Fully qualified name, e.g. `app.model.Document` or `app.model.Node[]`.
    pub name: String,
    /// Namespace the type is declared in, e.g. `app.model`.
    pub namespace: String,
    pub kind: TypeKind,
    pub super_type: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    /// Slots declared by this type only (not inherited ones).
    pub slots: Vec<SlotInfo>,
}

impl TypeInfo {
    /// Class type; the namespace is everything before the last `.` of `name`.
    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            namespace: namespace_of(&name).to_string(),
            name,
            kind: TypeKind::Class,
            super_type: None,
            interfaces: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Interface,
            ..Self::class(name)
        }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            namespace: String::new(),
            name,
            kind: TypeKind::Primitive,
            super_type: None,
            interfaces: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Array of `component`, named `<component>[]` in the component's namespace.
    pub fn array_of(component: &TypeRef) -> Self {
        Self {
            name: format!("{}[]", component.name),
            namespace: component.namespace.clone(),
            kind: TypeKind::Array {
                component: Arc::clone(component),
            },
            super_type: None,
            interfaces: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn with_super(mut self, super_type: &TypeRef) -> Self {
        self.super_type = Some(Arc::clone(super_type));
        self
    }

    pub fn with_interface(mut self, interface: &TypeRef) -> Self {
        self.interfaces.push(Arc::clone(interface));
        self
    }

    pub fn with_slot(mut self, slot: SlotInfo) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn into_ref(self) -> TypeRef {
        Arc::new(self)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive)
    }

    /// Component type for arrays.
    pub fn component(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::Array { component } => Some(component),
            _ => None,
        }
    }

    /// `this` followed by its super-type chain, most derived first.
    pub fn ancestry(this: &TypeRef) -> SmallVec<[TypeRef; 8]> {
        let mut chain = SmallVec::new();
        let mut current = Some(Arc::clone(this));
        while let Some(ty) = current {
            current = ty.super_type.clone();
            chain.push(ty);
        }
        chain
    }

    /// True if this type is `name`, or (with `include_subtypes`) extends or
    /// implements a type called `name` anywhere up its hierarchy.
    pub fn is_named_or_subtype_of(&self, name: &str, include_subtypes: bool) -> bool {
        if self.name == name {
            return true;
        }
        if !include_subtypes {
            return false;
        }
        if let Some(super_type) = &self.super_type {
            if super_type.is_named_or_subtype_of(name, true) {
                return true;
            }
        }
        self.interfaces
            .iter()
            .any(|iface| iface.is_named_or_subtype_of(name, true))
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn namespace_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => "",
    }
}
