//! Breadth-first reachability tracer.
//!
//! One [`Tracer::run`] visits every object transitively reachable from the
//! given roots exactly once:
//!
//! 1. Each root becomes a root edge and is visited.
//! 2. Edges are dequeued in FIFO order; the target's type is resolved and
//!    objects in excluded namespaces are dropped.
//! 3. The identity is marked; the visitor sees every edge, but only a first
//!    visit the visitor accepts is expanded.
//! 4. Arrays expand into index edges; other objects into slot edges for
//!    every reference slot up the type hierarchy, plus the static slots of
//!    the type an object describes, if any.
//!
//! The visited set and the queue live only for the duration of the run.

mod status;

pub use status::{AccessDiagnostic, RunStatus};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::collections::{IdentitySet, TraversalQueue};
use crate::config::TraceConfig;
use crate::edge::{EdgeRef, ReferenceEdge};
use crate::errors::{AccessError, ConfigError, TraceError};
use crate::runtime::{Introspector, NamespaceFilter, SlotInfo, TypeInfo, TypeKind, TypeRef};
use crate::visitor::Visitor;

/// Per-run bookkeeping, dropped when the run ends.
struct RunState<O> {
    visited: IdentitySet,
    queue: TraversalQueue<EdgeRef<O>>,
    status: RunStatus,
    skip_weak_or_soft: bool,
}

impl<O> RunState<O> {
    /// Release every identity and pending edge, returning the status.
    fn finish(mut self) -> RunStatus {
        self.visited.clear();
        self.queue.clear();
        std::mem::take(&mut self.status)
    }
}

/// Reachability tracer over a host runtime.
///
/// Holds no state between runs; independent tracers may run concurrently
/// over a `Sync` runtime.
pub struct Tracer<'r, I: Introspector> {
    runtime: &'r I,
    namespaces: NamespaceFilter,
    initial_set_capacity: usize,
    initial_queue_capacity: usize,
    skip_weak_or_soft: bool,
    /// Set when the config failed validation; every run reports it.
    invalid_config: Option<ConfigError>,
}

impl<'r, I: Introspector> Tracer<'r, I> {
    pub fn new(runtime: &'r I, config: &TraceConfig) -> Self {
        Self {
            runtime,
            invalid_config: TraceConfig::validate(config).err(),
            namespaces: NamespaceFilter::new(&config.namespaces),
            initial_set_capacity: config.effective_initial_set_capacity(),
            initial_queue_capacity: config.effective_initial_queue_capacity(),
            skip_weak_or_soft: config.effective_skip_weak_or_soft(),
        }
    }

    pub fn runtime(&self) -> &'r I {
        self.runtime
    }

    /// Run with the configured weak/soft skipping policy.
    pub fn run_with_defaults<V>(
        &self,
        roots: &[I::Object],
        visitor: &mut V,
    ) -> Result<RunStatus, TraceError>
    where
        V: Visitor<I::Object> + ?Sized,
    {
        self.run(roots, visitor, self.skip_weak_or_soft)
    }

    /// Visit everything reachable from `roots`.
    ///
    /// With `skip_weak_or_soft`, the referent slot of weak and soft reference
    /// wrappers is not followed, so objects kept only by such wrappers are
    /// not reported as reachable.
    ///
    /// Fails before visiting anything if `roots` is empty or the config
    /// given to [`Tracer::new`] does not validate.
    pub fn run<V>(
        &self,
        roots: &[I::Object],
        visitor: &mut V,
        skip_weak_or_soft: bool,
    ) -> Result<RunStatus, TraceError>
    where
        V: Visitor<I::Object> + ?Sized,
    {
        if let Some(error) = &self.invalid_config {
            return Err(TraceError::Config(error.clone()));
        }
        if roots.is_empty() {
            return Err(TraceError::EmptyRoots);
        }

        let span = crate::trace_run_span!(roots.len(), skip_weak_or_soft);
        let _enter = span.enter();

        let mut state = RunState {
            visited: IdentitySet::with_capacity(self.initial_set_capacity),
            queue: TraversalQueue::with_capacity(self.initial_queue_capacity),
            status: RunStatus::default(),
            skip_weak_or_soft,
        };

        for root in roots {
            let ty = self.runtime.type_of(root);
            let identity = self.runtime.identity(root);
            let edge = ReferenceEdge::root(root.clone(), identity, ty);
            self.visit_edge(&mut state, edge, visitor);
        }

        while let Some(edge) = state.queue.pop() {
            self.visit_edge(&mut state, edge, visitor);
        }

        let status = state.finish();
        debug!(
            objects_visited = status.objects_visited,
            edges_enqueued = status.edges_enqueued,
            repeat_visits = status.repeat_visits,
            excluded_skipped = status.excluded_skipped,
            diagnostics = status.diagnostic_count(),
            "trace complete"
        );
        Ok(status)
    }

    fn visit_edge<V>(
        &self,
        state: &mut RunState<I::Object>,
        edge: EdgeRef<I::Object>,
        visitor: &mut V,
    ) where
        V: Visitor<I::Object> + ?Sized,
    {
        let ty = self.runtime.type_of(edge.value());
        if self.namespaces.is_excluded(&ty.namespace) {
            if edge.is_root() {
                warn!(type_name = %ty.name, "root type is in an excluded namespace, skipping");
            }
            state.status.excluded_skipped += 1;
            return;
        }

        let first_visit = state.visited.insert(edge.identity());
        let keep_going = visitor.visit(&edge, &ty, first_visit);
        if !first_visit {
            state.status.repeat_visits += 1;
            return;
        }
        state.status.objects_visited += 1;
        if !keep_going {
            return;
        }

        match &ty.kind {
            TypeKind::Array { component } => self.push_elements(state, &edge, component),
            _ => self.push_slots(state, &edge, &ty),
        }
    }

    fn push_elements(
        &self,
        state: &mut RunState<I::Object>,
        edge: &EdgeRef<I::Object>,
        component: &TypeRef,
    ) {
        if component.is_primitive() {
            return;
        }
        let array = edge.value();
        for index in 0..self.runtime.array_len(array) {
            if let Some(element) = self.runtime.array_element(array, index) {
                let identity = self.runtime.identity(&element);
                let child =
                    ReferenceEdge::index(edge, Arc::clone(component), index, element, identity);
                state.queue.push(child);
                state.status.edges_enqueued += 1;
            }
        }
    }

    fn push_slots(&self, state: &mut RunState<I::Object>, edge: &EdgeRef<I::Object>, ty: &TypeRef) {
        if let Some(described) = self.runtime.as_type_descriptor(edge.value()) {
            for slot in described.slots.iter().filter(|s| s.is_traceable_static_slot()) {
                self.read_and_push(state, edge, None, &described, slot);
            }
        }

        for declaring in TypeInfo::ancestry(ty) {
            for slot in declaring.slots.iter().filter(|s| s.is_traceable_instance_slot()) {
                if state.skip_weak_or_soft && slot.is_weak_or_soft_referent() {
                    continue;
                }
                self.read_and_push(state, edge, Some(ty), &declaring, slot);
            }
        }
    }

    /// Read one slot and enqueue its value. `holder_type` is `None` for
    /// static slots, which are read without a holder object.
    fn read_and_push(
        &self,
        state: &mut RunState<I::Object>,
        edge: &EdgeRef<I::Object>,
        holder_type: Option<&TypeRef>,
        declaring: &TypeRef,
        slot: &SlotInfo,
    ) {
        if let Some(namespace) = self.namespaces.restricted_prefix(&declaring.namespace) {
            let error = AccessError::RestrictedNamespace {
                declaring_type: declaring.name.clone(),
                slot: slot.name.clone(),
                namespace: namespace.to_string(),
            };
            record(state, holder_type, error);
            return;
        }

        let holder = holder_type.map(|_| edge.value());
        match self.runtime.read_slot(holder, declaring, slot) {
            Ok(Some(value)) => {
                let identity = self.runtime.identity(&value);
                let child = ReferenceEdge::slot(
                    edge,
                    Arc::clone(declaring),
                    slot.name.as_str(),
                    slot.is_static,
                    value,
                    identity,
                );
                state.queue.push(child);
                state.status.edges_enqueued += 1;
            }
            Ok(None) => {}
            Err(error) => record(state, holder_type, error),
        }
    }
}

fn record<O>(state: &mut RunState<O>, holder_type: Option<&TypeRef>, error: AccessError) {
    debug!(error = %error, "slot not readable, continuing");
    let diagnostic = AccessDiagnostic::new(holder_type.map(|t| t.name.clone()), error);
    state.status.add_diagnostic(diagnostic);
}
