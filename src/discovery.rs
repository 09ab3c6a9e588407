//! Test discovery.
//!
//! Walks the catalog in order and keeps the classes that qualify as test classes: a parameterless constructor
//! and at least one method that is marked as a test and takes no parameters. Each qualifying method becomes one
//! [`TestCase`], in the order the inspector reports methods. Nothing is re-sorted.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};
use verdict_runtime::{ClassDescriptor, MethodInfo};

use crate::catalog::Catalog;
use crate::inspector::MetadataInspector;

/// How test cases are named in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    /// Bare method name, qualified as `Class::method` only when two cases share a method name.
    #[default]
    Auto,
    /// Always `Class::method`.
    Qualified,
}

/// A class that passed discovery, with its qualifying methods.
#[derive(Debug, Clone)]
pub struct TestClassDescriptor<'c> {
    class: &'c ClassDescriptor,
    methods: Vec<&'c MethodInfo>,
}

impl<'c> TestClassDescriptor<'c> {
    pub fn class(&self) -> &'c ClassDescriptor {
        self.class
    }

    pub fn name(&self) -> &'c str {
        self.class.name()
    }

    /// Qualifying methods in inspector order; never empty.
    pub fn methods(&self) -> &[&'c MethodInfo] {
        &self.methods
    }
}

/// One (class, method) pair selected for execution.
#[derive(Debug, Clone)]
pub struct TestCase<'c> {
    class: &'c ClassDescriptor,
    method: &'c MethodInfo,
    display_name: String,
}

impl<'c> TestCase<'c> {
    pub fn class(&self) -> &'c ClassDescriptor {
        self.class
    }

    pub fn method(&self) -> &'c MethodInfo {
        self.method
    }

    pub fn class_name(&self) -> &'c str {
        self.class.name()
    }

    pub fn method_name(&self) -> &'c str {
        self.method.name()
    }

    /// Unique within a run.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Everything one discovery pass found.
#[derive(Debug, Clone, Default)]
pub struct Discovery<'c> {
    test_classes: Vec<TestClassDescriptor<'c>>,
    cases: Vec<TestCase<'c>>,
}

impl<'c> Discovery<'c> {
    pub fn test_classes(&self) -> &[TestClassDescriptor<'c>] {
        &self.test_classes
    }

    /// Test cases in discovery order.
    pub fn cases(&self) -> &[TestCase<'c>] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Discover every test case in `catalog`.
pub fn discover<'c>(catalog: &'c Catalog, inspector: &dyn MetadataInspector, naming: NamingPolicy) -> Discovery<'c> {
    let mut seen = HashSet::new();
    let mut test_classes = Vec::new();

    for class in catalog {
        if !seen.insert(class.path()) {
            warn!(class = class.path(), "class listed more than once in catalog, skipping repeat");
            continue;
        }
        if let Some(test_class) = classify(class, inspector) {
            debug!(
                class = class.name(),
                tests = test_class.methods.len(),
                "test class discovered"
            );
            test_classes.push(test_class);
        }
    }

    let cases = build_cases(&test_classes, naming);
    debug!(classes = test_classes.len(), cases = cases.len(), "discovery complete");
    Discovery { test_classes, cases }
}

fn classify<'c>(class: &'c ClassDescriptor, inspector: &dyn MetadataInspector) -> Option<TestClassDescriptor<'c>> {
    if !inspector.has_parameterless_constructor(class) {
        debug!(class = class.name(), "skipped: no parameterless constructor");
        return None;
    }

    let methods: Vec<&MethodInfo> = inspector
        .methods(class)
        .into_iter()
        .filter(|method| is_test_method(inspector, method))
        .collect();

    if methods.is_empty() {
        debug!(class = class.name(), "skipped: no marked parameterless methods");
        return None;
    }

    Some(TestClassDescriptor { class, methods })
}

/// Marked as a test and callable without arguments.
fn is_test_method(inspector: &dyn MetadataInspector, method: &MethodInfo) -> bool {
    if !inspector.is_marked_as_test(method) {
        return false;
    }
    let params = inspector.parameter_count(method);
    if params != 0 {
        debug!(method = method.name(), params, "marked method takes parameters, not a test");
        return false;
    }
    true
}

fn build_cases<'c>(test_classes: &[TestClassDescriptor<'c>], naming: NamingPolicy) -> Vec<TestCase<'c>> {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    let mut class_counts: HashMap<&str, usize> = HashMap::new();
    for test_class in test_classes {
        *class_counts.entry(test_class.name()).or_insert(0) += 1;
        for method in &test_class.methods {
            *name_counts.entry(method.name()).or_insert(0) += 1;
        }
    }

    let name_counts = &name_counts;
    test_classes
        .iter()
        .flat_map(|test_class| {
            // Short class names can collide across modules; the path cannot.
            let prefix = if class_counts.get(test_class.name()).copied().unwrap_or(0) > 1 {
                test_class.class.path()
            } else {
                test_class.name()
            };
            test_class.methods.iter().map(move |&method| {
                let qualify = match naming {
                    NamingPolicy::Qualified => true,
                    NamingPolicy::Auto => name_counts.get(method.name()).copied().unwrap_or(0) > 1,
                };
                let display_name = if qualify {
                    format!("{prefix}::{}", method.name())
                } else {
                    method.name().to_string()
                };
                TestCase {
                    class: test_class.class,
                    method,
                    display_name,
                }
            })
        })
        .collect()
}
