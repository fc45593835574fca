//! Arena-backed model heap.

use rustc_hash::{FxHashMap, FxHashSet};

use leaktrace_core::errors::AccessError;
use leaktrace_core::runtime::{Introspector, ObjectId, SlotInfo, TypeInfo, TypeRef};

use crate::types::TYPE_DESCRIPTOR;

/// Handle to an object in a [`ModelHeap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef(u32);

impl ObjRef {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// (declaring type name, slot name)
type SlotKey = (String, String);

#[derive(Debug)]
enum Body {
    Instance(FxHashMap<SlotKey, ObjRef>),
    Array(Vec<Option<ObjRef>>),
    Descriptor(TypeRef),
}

#[derive(Debug)]
struct HeapObject {
    ty: TypeRef,
    label: Option<String>,
    body: Body,
}

/// In-memory object graph implementing [`Introspector`].
///
/// Objects are never freed; cycles are built by assigning slots after
/// allocation. Identities are arena indices offset by one.
#[derive(Debug)]
pub struct ModelHeap {
    objects: Vec<HeapObject>,
    statics: FxHashMap<SlotKey, ObjRef>,
    denied: FxHashSet<SlotKey>,
    descriptor_type: TypeRef,
}

impl ModelHeap {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            statics: FxHashMap::default(),
            denied: FxHashSet::default(),
            descriptor_type: TypeInfo::class(TYPE_DESCRIPTOR).into_ref(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Allocate an instance of `ty` with all slots null.
    pub fn alloc(&mut self, ty: &TypeRef) -> ObjRef {
        self.push(ty.clone(), None, Body::Instance(FxHashMap::default()))
    }

    /// Allocate an instance whose description is `label`.
    pub fn alloc_labeled(&mut self, ty: &TypeRef, label: impl Into<String>) -> ObjRef {
        self.push(
            ty.clone(),
            Some(label.into()),
            Body::Instance(FxHashMap::default()),
        )
    }

    /// Allocate an array of type `array_ty` with `len` null elements.
    ///
    /// # Panics
    /// Panics if `array_ty` is not an array type.
    pub fn alloc_array(&mut self, array_ty: &TypeRef, len: usize) -> ObjRef {
        assert!(
            array_ty.is_array(),
            "{} is not an array type",
            array_ty.name
        );
        self.push(array_ty.clone(), None, Body::Array(vec![None; len]))
    }

    /// Allocate the descriptor object of `ty`; its static slots become traceable.
    pub fn alloc_type_object(&mut self, ty: &TypeRef) -> ObjRef {
        let descriptor_type = self.descriptor_type.clone();
        self.push(
            descriptor_type,
            Some(format!("type {}", ty.name)),
            Body::Descriptor(ty.clone()),
        )
    }

    /// Store `value` in slot `slot` declared by `declaring` of `obj`.
    pub fn set(&mut self, obj: ObjRef, declaring: &TypeRef, slot: &str, value: ObjRef) {
        match &mut self.objects[obj.index()].body {
            Body::Instance(slots) => {
                slots.insert(key(declaring, slot), value);
            }
            _ => panic!("object {obj:?} has no instance slots"),
        }
    }

    /// Null out a slot.
    pub fn clear_slot(&mut self, obj: ObjRef, declaring: &TypeRef, slot: &str) {
        if let Body::Instance(slots) = &mut self.objects[obj.index()].body {
            slots.remove(&key(declaring, slot));
        }
    }

    pub fn set_element(&mut self, array: ObjRef, index: usize, value: Option<ObjRef>) {
        match &mut self.objects[array.index()].body {
            Body::Array(elements) => elements[index] = value,
            _ => panic!("object {array:?} is not an array"),
        }
    }

    pub fn set_static(&mut self, declaring: &TypeRef, slot: &str, value: ObjRef) {
        self.statics.insert(key(declaring, slot), value);
    }

    /// Make every read of `declaring#slot` fail with an access error.
    pub fn deny(&mut self, declaring: &TypeRef, slot: &str) {
        self.denied.insert(key(declaring, slot));
    }

    fn push(&mut self, ty: TypeRef, label: Option<String>, body: Body) -> ObjRef {
        let id = u32::try_from(self.objects.len()).expect("model heap exceeds u32 objects");
        self.objects.push(HeapObject { ty, label, body });
        ObjRef(id)
    }
}

impl Default for ModelHeap {
    fn default() -> Self {
        Self::new()
    }
}

fn key(declaring: &TypeInfo, slot: &str) -> SlotKey {
    (declaring.name.clone(), slot.to_string())
}

impl Introspector for ModelHeap {
    type Object = ObjRef;

    fn identity(&self, object: &ObjRef) -> ObjectId {
        ObjectId::new(object.index() + 1).expect("index + 1 is never zero")
    }

    fn type_of(&self, object: &ObjRef) -> TypeRef {
        self.objects[object.index()].ty.clone()
    }

    fn as_type_descriptor(&self, object: &ObjRef) -> Option<TypeRef> {
        match &self.objects[object.index()].body {
            Body::Descriptor(ty) => Some(ty.clone()),
            _ => None,
        }
    }

    fn array_len(&self, array: &ObjRef) -> usize {
        match &self.objects[array.index()].body {
            Body::Array(elements) => elements.len(),
            _ => 0,
        }
    }

    fn array_element(&self, array: &ObjRef, index: usize) -> Option<ObjRef> {
        match &self.objects[array.index()].body {
            Body::Array(elements) => elements.get(index).copied().flatten(),
            _ => None,
        }
    }

    fn read_slot(
        &self,
        holder: Option<&ObjRef>,
        declaring: &TypeRef,
        slot: &SlotInfo,
    ) -> Result<Option<ObjRef>, AccessError> {
        let slot_key = key(declaring, &slot.name);
        if self.denied.contains(&slot_key) {
            return Err(AccessError::AccessDenied {
                declaring_type: declaring.name.clone(),
                slot: slot.name.clone(),
                reason: "access check refused".to_string(),
            });
        }
        match holder {
            None => Ok(self.statics.get(&slot_key).copied()),
            Some(obj) => match &self.objects[obj.index()].body {
                Body::Instance(slots) => Ok(slots.get(&slot_key).copied()),
                _ => Ok(None),
            },
        }
    }

    fn describe(&self, object: &ObjRef) -> String {
        let obj = &self.objects[object.index()];
        match &obj.label {
            Some(label) => label.clone(),
            None => format!("{}@{}", obj.ty.name, object.index() + 1),
        }
    }
}
