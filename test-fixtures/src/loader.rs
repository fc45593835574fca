//! JSON heap fixtures.
//!
//! A fixture declares types (super types before subtypes), objects, slot
//! assignments by object id, and the roots to trace from:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "app.Node", "slots": [ { "name": "next" } ] }
//!   ],
//!   "objects": [
//!     { "id": "a", "type": "app.Node", "slots": { "app.Node#next": "b" } },
//!     { "id": "b", "type": "app.Node", "slots": { "app.Node#next": "a" } },
//!     { "id": "arr", "array_of": "app.Node", "elements": ["a", null] }
//!   ],
//!   "roots": ["a"]
//! }
//! ```

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use leaktrace_core::runtime::{ReferentStrength, SlotInfo, TypeInfo, TypeRef};

use crate::heap::{ModelHeap, ObjRef};

#[derive(Debug, Deserialize)]
struct HeapFixture {
    #[serde(default)]
    types: Vec<TypeFixture>,
    #[serde(default)]
    objects: Vec<ObjectFixture>,
    #[serde(default)]
    statics: FxHashMap<String, String>,
    #[serde(default)]
    denied: Vec<String>,
    roots: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TypeFixture {
    name: String,
    #[serde(default)]
    interface: bool,
    #[serde(default, rename = "super")]
    super_type: Option<String>,
    #[serde(default)]
    interfaces: Vec<String>,
    #[serde(default)]
    slots: Vec<SlotFixture>,
}

#[derive(Debug, Deserialize)]
struct SlotFixture {
    name: String,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default)]
    primitive: bool,
    #[serde(default)]
    referent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectFixture {
    id: String,
    #[serde(default, rename = "type")]
    type_name: Option<String>,
    #[serde(default)]
    array_of: Option<String>,
    #[serde(default)]
    elements: Vec<Option<String>>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    slots: FxHashMap<String, String>,
}

/// A fixture heap with its roots and name tables.
#[derive(Debug)]
pub struct LoadedHeap {
    pub heap: ModelHeap,
    pub roots: Vec<ObjRef>,
    pub types: FxHashMap<String, TypeRef>,
    pub objects: FxHashMap<String, ObjRef>,
}

impl LoadedHeap {
    /// Object allocated for fixture id `id`.
    ///
    /// # Panics
    /// Panics if the fixture has no such object.
    pub fn object(&self, id: &str) -> ObjRef {
        *self
            .objects
            .get(id)
            .unwrap_or_else(|| panic!("fixture has no object '{id}'"))
    }

    pub fn type_ref(&self, name: &str) -> TypeRef {
        self.types
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("fixture has no type '{name}'"))
    }
}

/// Absolute path of a file under `test-fixtures/heaps/`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("heaps")
        .join(name)
}

/// Load `test-fixtures/heaps/<name>`.
///
/// # Panics
/// Panics if the file is missing or malformed.
pub fn load_heap(name: &str) -> LoadedHeap {
    let path = fixture_path(name);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    load_heap_str(&content)
}

/// Build a heap from fixture JSON text.
///
/// # Panics
/// Panics on malformed JSON or dangling type/object references.
pub fn load_heap_str(json: &str) -> LoadedHeap {
    let fixture: HeapFixture =
        serde_json::from_str(json).unwrap_or_else(|e| panic!("Failed to parse heap fixture: {e}"));

    let mut types: FxHashMap<String, TypeRef> = FxHashMap::default();
    for t in &fixture.types {
        let mut info = if t.interface {
            TypeInfo::interface(t.name.as_str())
        } else {
            TypeInfo::class(t.name.as_str())
        };
        if let Some(super_name) = &t.super_type {
            info = info.with_super(lookup(&types, super_name));
        }
        for iface in &t.interfaces {
            info = info.with_interface(lookup(&types, iface));
        }
        for slot in &t.slots {
            info = info.with_slot(slot_info(slot));
        }
        types.insert(t.name.clone(), info.into_ref());
    }

    let mut heap = ModelHeap::new();
    let mut objects: FxHashMap<String, ObjRef> = FxHashMap::default();
    for o in &fixture.objects {
        let obj = match (&o.type_name, &o.array_of) {
            (_, Some(component)) => {
                let array_ty = TypeInfo::array_of(lookup(&types, component)).into_ref();
                heap.alloc_array(&array_ty, o.elements.len())
            }
            (Some(type_name), None) => {
                let ty = lookup(&types, type_name).clone();
                match &o.label {
                    Some(label) => heap.alloc_labeled(&ty, label.as_str()),
                    None => heap.alloc(&ty),
                }
            }
            (None, None) => panic!("object '{}' needs a type or array_of", o.id),
        };
        objects.insert(o.id.clone(), obj);
    }

    for o in &fixture.objects {
        let obj = objects[&o.id];
        for (slot_path, target) in &o.slots {
            let (declaring, slot) = split_slot_path(slot_path);
            let declaring = lookup(&types, declaring).clone();
            heap.set(obj, &declaring, slot, lookup_obj(&objects, target));
        }
        for (index, element) in o.elements.iter().enumerate() {
            let value = element.as_deref().map(|id| lookup_obj(&objects, id));
            heap.set_element(obj, index, value);
        }
    }

    for (slot_path, target) in &fixture.statics {
        let (declaring, slot) = split_slot_path(slot_path);
        let declaring = lookup(&types, declaring).clone();
        heap.set_static(&declaring, slot, lookup_obj(&objects, target));
    }

    for slot_path in &fixture.denied {
        let (declaring, slot) = split_slot_path(slot_path);
        let declaring = lookup(&types, declaring).clone();
        heap.deny(&declaring, slot);
    }

    let roots = fixture
        .roots
        .iter()
        .map(|id| lookup_obj(&objects, id))
        .collect();

    LoadedHeap {
        heap,
        roots,
        types,
        objects,
    }
}

fn slot_info(slot: &SlotFixture) -> SlotInfo {
    let referent = slot.referent.as_deref().map(|s| match s {
        "weak" => ReferentStrength::Weak,
        "soft" => ReferentStrength::Soft,
        "phantom" => ReferentStrength::Phantom,
        other => panic!("unknown referent strength '{other}'"),
    });
    SlotInfo {
        name: slot.name.clone(),
        is_static: slot.is_static,
        is_primitive: slot.primitive,
        referent,
    }
}

fn split_slot_path(path: &str) -> (&str, &str) {
    path.split_once('#')
        .unwrap_or_else(|| panic!("slot path '{path}' must be <type>#<slot>"))
}

fn lookup<'a>(types: &'a FxHashMap<String, TypeRef>, name: &str) -> &'a TypeRef {
    types
        .get(name)
        .unwrap_or_else(|| panic!("unknown type '{name}' (declare super types first)"))
}

fn lookup_obj(objects: &FxHashMap<String, ObjRef>, id: &str) -> ObjRef {
    *objects
        .get(id)
        .unwrap_or_else(|| panic!("unknown object '{id}'"))
}
