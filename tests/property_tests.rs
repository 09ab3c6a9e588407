//! Property-based tests for discovery and execution
//!
//! These tests use proptest to generate catalogs of hand-built descriptors and check
//! that discovery selects exactly the qualifying methods and that every selected
//! method produces exactly one outcome.

use std::any::Any;

use proptest::prelude::*;
use verdict::verdict_runtime::{ClassDescriptor, ConstructorInfo, Instance, MethodInfo};
use verdict::{Catalog, DescriptorInspector, NamingPolicy, TestStatus, discover, run_catalog};

fn construct() -> Result<Instance, String> {
    Ok(Box::new(()))
}

fn pass(_instance: &mut dyn Any) -> Result<(), String> {
    Ok(())
}

fn fail(_instance: &mut dyn Any) -> Result<(), String> {
    Err("generated failure".to_string())
}

#[derive(Debug, Clone)]
struct MethodShape {
    marked: bool,
    params: usize,
    passes: bool,
}

#[derive(Debug, Clone)]
struct ClassShape {
    parameterless: bool,
    methods: Vec<MethodShape>,
}

impl ClassShape {
    fn qualifying(&self) -> usize {
        if !self.parameterless {
            return 0;
        }
        self.methods.iter().filter(|m| m.marked && m.params == 0).count()
    }

    fn failing(&self) -> usize {
        if !self.parameterless {
            return 0;
        }
        self.methods
            .iter()
            .filter(|m| m.marked && m.params == 0 && !m.passes)
            .count()
    }

    fn descriptor(&self, index: usize) -> ClassDescriptor {
        let constructor = if self.parameterless {
            ConstructorInfo::parameterless(construct)
        } else {
            ConstructorInfo::with_params(1)
        };
        let mut class = ClassDescriptor::new(format!("Class{index}")).with_constructor(constructor);
        for (position, shape) in self.methods.iter().enumerate() {
            let mut method = MethodInfo::new(format!("method_{index}_{position}"), shape.params);
            if shape.marked {
                method = method.marked_as_test();
                if shape.params == 0 {
                    method = method.with_invoker(if shape.passes { pass } else { fail });
                }
            }
            class = class.with_method(method);
        }
        class
    }
}

fn method_strategy() -> impl Strategy<Value = MethodShape> {
    (any::<bool>(), 0usize..3, any::<bool>()).prop_map(|(marked, params, passes)| MethodShape {
        marked,
        params,
        passes,
    })
}

fn class_strategy() -> impl Strategy<Value = ClassShape> {
    (any::<bool>(), prop::collection::vec(method_strategy(), 0..6))
        .prop_map(|(parameterless, methods)| ClassShape { parameterless, methods })
}

fn catalog_of(shapes: &[ClassShape]) -> Catalog {
    shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| shape.descriptor(index))
        .collect()
}

proptest! {
    /// Property: a class contributes exactly its marked parameterless methods, or nothing
    #[test]
    fn discovery_selects_exactly_qualifying_methods(shapes in prop::collection::vec(class_strategy(), 0..6)) {
        let catalog = catalog_of(&shapes);
        let discovery = discover(&catalog, &DescriptorInspector, NamingPolicy::Auto);

        let expected: usize = shapes.iter().map(ClassShape::qualifying).sum();
        prop_assert_eq!(discovery.len(), expected);

        let expected_classes = shapes.iter().filter(|shape| shape.qualifying() > 0).count();
        prop_assert_eq!(discovery.test_classes().len(), expected_classes);
        for test_class in discovery.test_classes() {
            prop_assert!(!test_class.methods().is_empty());
        }
    }

    /// Property: one outcome per case, failures carry a detail, order matches discovery
    #[test]
    fn every_case_yields_one_outcome(shapes in prop::collection::vec(class_strategy(), 0..6)) {
        let catalog = catalog_of(&shapes);
        let discovery = discover(&catalog, &DescriptorInspector, NamingPolicy::Auto);
        let (report, reporter) = run_catalog(&catalog);

        prop_assert_eq!(report.outcomes().len(), discovery.len());
        prop_assert_eq!(reporter.lines().len(), discovery.len());

        let expected_failures: usize = shapes.iter().map(ClassShape::failing).sum();
        prop_assert_eq!(report.summary().failed, expected_failures);

        for (outcome, case) in report.outcomes().iter().zip(discovery.cases()) {
            prop_assert_eq!(outcome.display_name(), case.display_name());
            if outcome.status() == TestStatus::Failed {
                prop_assert!(outcome.failure().is_some_and(|detail| !detail.message().is_empty()));
            }
        }
    }

    /// Property: display names are unique within a run
    #[test]
    fn display_names_are_unique(shapes in prop::collection::vec(class_strategy(), 0..6)) {
        let catalog = catalog_of(&shapes);
        let discovery = discover(&catalog, &DescriptorInspector, NamingPolicy::Auto);
        let mut names: Vec<&str> = discovery.cases().iter().map(|case| case.display_name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), total);
    }
}
