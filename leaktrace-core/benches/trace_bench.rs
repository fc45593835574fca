use criterion::{black_box, criterion_group, criterion_main, Criterion};

use leaktrace_core::config::TraceConfig;
use leaktrace_core::runtime::{SlotInfo, TypeInfo, TypeRef};
use leaktrace_core::tracer::Tracer;
use leaktrace_core::visitor::TypeCollector;
use test_fixtures::{ModelHeap, ObjRef};

struct Graph {
    heap: ModelHeap,
    root: ObjRef,
}

/// Binary tree of `depth` levels whose leaves point back at the root, with
/// one array of every leaf hanging off the root.
fn build_tree(depth: u32) -> Graph {
    let node: TypeRef = TypeInfo::class("bench.Node")
        .with_slot(SlotInfo::reference("left"))
        .with_slot(SlotInfo::reference("right"))
        .with_slot(SlotInfo::reference("back"))
        .with_slot(SlotInfo::primitive("weight"))
        .into_ref();
    let leaf: TypeRef = TypeInfo::class("bench.Leaf").with_super(&node).into_ref();
    let index: TypeRef = TypeInfo::class("bench.Index")
        .with_slot(SlotInfo::reference("leaves"))
        .into_ref();
    let leaf_array = TypeInfo::array_of(&leaf).into_ref();

    let mut heap = ModelHeap::new();
    let root = heap.alloc(&node);
    let mut level = vec![root];
    for d in 1..depth {
        let ty = if d + 1 == depth { &leaf } else { &node };
        let mut next = Vec::with_capacity(level.len() * 2);
        for parent in &level {
            let l = heap.alloc(ty);
            let r = heap.alloc(ty);
            heap.set(*parent, &node, "left", l);
            heap.set(*parent, &node, "right", r);
            next.push(l);
            next.push(r);
        }
        level = next;
    }
    for leaf_obj in &level {
        heap.set(*leaf_obj, &node, "back", root);
    }

    let holder = heap.alloc(&index);
    let array = heap.alloc_array(&leaf_array, level.len());
    for (i, leaf_obj) in level.iter().enumerate() {
        heap.set_element(array, i, Some(*leaf_obj));
    }
    heap.set(holder, &index, "leaves", array);
    heap.set(root, &node, "back", holder);

    Graph { heap, root }
}

fn bench_trace_tree(c: &mut Criterion) {
    let graph = build_tree(14);
    let config = TraceConfig::default();
    let tracer = Tracer::new(&graph.heap, &config);

    c.bench_function("trace_tree_16k_objects", |b| {
        b.iter(|| {
            let mut collector = TypeCollector::new("bench.Leaf", false);
            let status = tracer
                .run(black_box(&[graph.root]), &mut collector, true)
                .unwrap();
            black_box((status.objects_visited, collector.count()))
        })
    });
}

fn bench_trace_with_subtypes(c: &mut Criterion) {
    let graph = build_tree(12);
    let config = TraceConfig::default();
    let tracer = Tracer::new(&graph.heap, &config);

    c.bench_function("trace_tree_subtype_match", |b| {
        b.iter(|| {
            let mut collector = TypeCollector::new("bench.Node", true);
            tracer
                .run(black_box(&[graph.root]), &mut collector, true)
                .unwrap();
            black_box(collector.count())
        })
    });
}

criterion_group!(benches, bench_trace_tree, bench_trace_with_subtypes);
criterion_main!(benches);
