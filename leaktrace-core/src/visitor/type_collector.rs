//! Collector for live instances of a named type.

use std::fmt::Write as _;

use super::Visitor;
use crate::edge::EdgeRef;
use crate::report::{truncate, PathReport};
use crate::runtime::{Introspector, ObjectId, TypeInfo, TypeRef};

/// A matched object and the edge it was first reached through.
#[derive(Debug, Clone)]
pub struct Match<O> {
    pub identity: ObjectId,
    pub edge: EdgeRef<O>,
}

impl<O> Match<O> {
    #[inline]
    pub fn value(&self) -> &O {
        self.edge.value()
    }
}

/// Collects every first-visited object whose type is `type_name`, or a
/// subtype of it when `include_subtypes` is set.
///
/// Always asks the tracer to continue: objects reachable only through a
/// match may match too.
#[derive(Debug, Clone)]
pub struct TypeCollector<O> {
    type_name: String,
    include_subtypes: bool,
    found: Vec<Match<O>>,
}

impl<O> TypeCollector<O> {
    pub fn new(type_name: impl Into<String>, include_subtypes: bool) -> Self {
        Self {
            type_name: type_name.into(),
            include_subtypes,
            found: Vec::new(),
        }
    }

    /// True if `ty` is `requested_name`, or with `include_subtypes` extends
    /// or implements it.
    pub fn matches(ty: &TypeInfo, requested_name: &str, include_subtypes: bool) -> bool {
        ty.is_named_or_subtype_of(requested_name, include_subtypes)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn include_subtypes(&self) -> bool {
        self.include_subtypes
    }

    pub fn count(&self) -> usize {
        self.found.len()
    }

    pub fn matches_found(&self) -> &[Match<O>] {
        &self.found
    }

    pub fn matched_objects(&self) -> impl Iterator<Item = &O> + '_ {
        self.found.iter().map(Match::value)
    }

    /// Drop all collected matches (and the edges they retain).
    pub fn clear(&mut self) {
        self.found.clear();
    }

    /// Multi-line text listing every match with its backlink trail.
    pub fn report<I>(&self, runtime: &I, max_value_len: usize) -> String
    where
        I: Introspector<Object = O>,
        O: Clone,
    {
        let mut out = String::new();
        let noun = if self.found.len() == 1 {
            "instance"
        } else {
            "instances"
        };
        let _ = writeln!(out, "{} {} of {}:", self.found.len(), noun, self.type_name);
        for (i, found) in self.found.iter().enumerate() {
            let described = truncate(&runtime.describe(found.value()), max_value_len);
            let _ = writeln!(out, "- {i}: {described}");
            out.push_str(&PathReport::build(found).render(runtime, max_value_len));
        }
        out
    }
}

impl<O> Visitor<O> for TypeCollector<O> {
    fn visit(&mut self, edge: &EdgeRef<O>, ty: &TypeRef, first_visit: bool) -> bool {
        if first_visit && Self::matches(ty, &self.type_name, self.include_subtypes) {
            tracing::trace!(type_name = %ty.name, identity = %edge.identity(), "collector match");
            self.found.push(Match {
                identity: edge.identity(),
                edge: std::sync::Arc::clone(edge),
            });
        }
        true
    }
}
