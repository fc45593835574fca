use std::collections::{HashSet, VecDeque};

use leaktrace_core::collections::{IdentitySet, TraversalQueue};
use leaktrace_core::config::TraceConfig;
use leaktrace_core::edge::EdgeRef;
use leaktrace_core::runtime::{ObjectId, SlotInfo, TypeInfo, TypeRef};
use leaktrace_core::tracer::Tracer;
use proptest::prelude::*;
use test_fixtures::{ModelHeap, ObjRef};

const SLOTS: [&str; 3] = ["s0", "s1", "s2"];

fn multi_slot_type() -> TypeRef {
    SLOTS
        .iter()
        .fold(TypeInfo::class("app.Node"), |ty, name| {
            ty.with_slot(SlotInfo::reference(*name))
        })
        .into_ref()
}

/// Push `Some(v)`, pop `None`.
fn queue_op() -> impl Strategy<Value = Option<u32>> {
    prop_oneof![
        3 => any::<u32>().prop_map(Some),
        2 => Just(None),
    ]
}

proptest! {
    #[test]
    fn set_remembers_every_insert(
        ids in prop::collection::vec(1usize..5_000, 0..600),
        initial in 1usize..32,
    ) {
        let mut set = IdentitySet::with_capacity(initial);
        let mut distinct = HashSet::new();
        for raw in &ids {
            let id = ObjectId::new(*raw).unwrap();
            let fresh = set.insert(id);
            prop_assert_eq!(fresh, distinct.insert(*raw));
        }
        prop_assert_eq!(set.len(), distinct.len());
        prop_assert!(set.capacity().is_power_of_two());
        for raw in &distinct {
            prop_assert!(set.contains(ObjectId::new(*raw).unwrap()));
        }
    }

    #[test]
    fn queue_matches_vecdeque(
        ops in prop::collection::vec(queue_op(), 0..400),
        initial in 0usize..8,
    ) {
        let mut queue = TraversalQueue::with_capacity(initial);
        let mut model = VecDeque::new();
        for op in ops {
            match op {
                Some(v) => {
                    queue.push(v);
                    model.push_back(v);
                }
                None => prop_assert_eq!(queue.pop(), model.pop_front()),
            }
            prop_assert_eq!(queue.len(), model.len());
        }
        while let Some(expected) = model.pop_front() {
            prop_assert_eq!(queue.pop(), Some(expected));
        }
        prop_assert!(queue.is_empty());
        prop_assert_eq!(queue.pop(), None);
    }

    #[test]
    fn each_reachable_object_is_first_visited_once(
        node_count in 1usize..40,
        links in prop::collection::vec((0usize..40, 0usize..3, 0usize..40), 0..120),
    ) {
        let ty = multi_slot_type();
        let mut heap = ModelHeap::new();
        let nodes: Vec<ObjRef> = (0..node_count).map(|_| heap.alloc(&ty)).collect();
        let mut adjacency = vec![[None; 3]; node_count];
        for (from, slot, to) in links {
            let (from, to) = (from % node_count, to % node_count);
            heap.set(nodes[from], &ty, SLOTS[slot], nodes[to]);
            adjacency[from][slot] = Some(to);
        }

        let mut reachable = HashSet::from([0usize]);
        let mut pending = vec![0usize];
        while let Some(n) = pending.pop() {
            for next in adjacency[n].iter().flatten() {
                if reachable.insert(*next) {
                    pending.push(*next);
                }
            }
        }

        let config = TraceConfig::default();
        let mut first_visits: Vec<ObjRef> = Vec::new();
        let mut visitor = |edge: &EdgeRef<ObjRef>, _ty: &TypeRef, first: bool| {
            if first {
                first_visits.push(*edge.value());
            }
            true
        };
        let status = Tracer::new(&heap, &config)
            .run(&[nodes[0]], &mut visitor, true)
            .unwrap();

        let unique: HashSet<ObjRef> = first_visits.iter().copied().collect();
        prop_assert_eq!(unique.len(), first_visits.len());
        prop_assert_eq!(unique.len(), reachable.len());
        prop_assert_eq!(status.objects_visited, reachable.len());
        for n in reachable {
            prop_assert!(unique.contains(&nodes[n]));
        }
    }
}
