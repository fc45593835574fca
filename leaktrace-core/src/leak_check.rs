//! Expected-instance-count checks for leak tests.
//!
//! Runs a single traversal with one [`TypeCollector`] per expectation and
//! reports every type whose live count differs from what the test expected.
//! The tracer itself never fails on a mismatch; deciding what a mismatch
//! means is up to the caller.

use std::fmt::Write as _;

use tracing::{debug, info};

use crate::config::TraceConfig;
use crate::errors::TraceError;
use crate::runtime::Introspector;
use crate::tracer::{RunStatus, Tracer};
use crate::visitor::{CompositeVisitor, TypeCollector, Visitor};

/// How many live instances of a type a test expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceExpectation {
    pub type_name: String,
    pub expected: usize,
    pub include_subtypes: bool,
}

impl InstanceExpectation {
    pub fn new(type_name: impl Into<String>, expected: usize) -> Self {
        Self {
            type_name: type_name.into(),
            expected,
            include_subtypes: false,
        }
    }

    pub fn including_subtypes(mut self) -> Self {
        self.include_subtypes = true;
        self
    }
}

/// An expectation that did not hold.
#[derive(Debug, Clone)]
pub struct InstanceCountMismatch {
    pub type_name: String,
    pub expected: usize,
    pub actual: usize,
    /// Collector report listing every live instance with its backlinks.
    pub report: String,
}

/// Result of [`check_instance_counts`].
#[derive(Debug, Clone)]
pub struct LeakCheckOutcome {
    pub status: RunStatus,
    pub mismatches: Vec<InstanceCountMismatch>,
}

impl LeakCheckOutcome {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Text suitable for a test-failure message; empty when every count held.
    pub fn failure_message(&self) -> String {
        let mut out = String::new();
        for mismatch in &self.mismatches {
            let _ = writeln!(
                out,
                "Expected {} instance(s) of {}, found {}",
                mismatch.expected, mismatch.type_name, mismatch.actual
            );
            out.push_str(&mismatch.report);
        }
        out
    }
}

/// Count live instances for every expectation in a single traversal.
pub fn check_instance_counts<I: Introspector>(
    runtime: &I,
    roots: &[I::Object],
    expectations: &[InstanceExpectation],
    config: &TraceConfig,
) -> Result<LeakCheckOutcome, TraceError> {
    let span = crate::leak_check_span!(expectations.len());
    let _enter = span.enter();

    let mut collectors: Vec<TypeCollector<I::Object>> = expectations
        .iter()
        .map(|e| TypeCollector::new(e.type_name.as_str(), e.include_subtypes))
        .collect();

    let status = {
        let visitors: Vec<&mut dyn Visitor<I::Object>> = collectors
            .iter_mut()
            .map(|c| c as &mut dyn Visitor<I::Object>)
            .collect();
        let mut composite = CompositeVisitor::new(visitors);
        Tracer::new(runtime, config).run_with_defaults(roots, &mut composite)?
    };

    let max_len = config.effective_report_value_max_len();
    let mut mismatches = Vec::new();
    for (expectation, collector) in expectations.iter().zip(&collectors) {
        let actual = collector.count();
        debug!(
            type_name = %expectation.type_name,
            expected = expectation.expected,
            actual,
            "instance count"
        );
        if actual != expectation.expected {
            mismatches.push(InstanceCountMismatch {
                type_name: expectation.type_name.clone(),
                expected: expectation.expected,
                actual,
                report: collector.report(runtime, max_len),
            });
        }
    }

    if !mismatches.is_empty() {
        info!(mismatches = mismatches.len(), "instance count check failed");
    }

    Ok(LeakCheckOutcome { status, mismatches })
}
