//! Metadata queries discovery is built on.
//!
//! The inspector answers four questions about a class: does it have a usable parameterless constructor, what are
//! its methods, is a method marked as a test, and how many parameters does it take. Answers are pure and
//! repeatable. A class that cannot be introspected is reported as having no constructor and no methods, so it
//! never qualifies and never aborts discovery.

use tracing::warn;
use verdict_runtime::{ClassDescriptor, MethodInfo};

/// Structural queries over a class descriptor.
///
/// Implement this trait to change what discovery considers a test, e.g. to read markers from another source.
pub trait MetadataInspector {
    /// Whether the harness can build an instance without arguments.
    fn has_parameterless_constructor(&self, class: &ClassDescriptor) -> bool;

    /// The class's methods, in the order discovery should visit them.
    fn methods<'c>(&self, class: &'c ClassDescriptor) -> Vec<&'c MethodInfo>;

    fn is_marked_as_test(&self, method: &MethodInfo) -> bool;

    fn parameter_count(&self, method: &MethodInfo) -> usize;
}

/// Reads the metadata recorded in the descriptor itself (default behavior).
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptorInspector;

impl MetadataInspector for DescriptorInspector {
    fn has_parameterless_constructor(&self, class: &ClassDescriptor) -> bool {
        match class.validate() {
            Ok(()) => class.parameterless_constructor().is_some(),
            Err(err) => {
                warn!(class = class.name(), error = %err, "malformed class descriptor, treating as non-qualifying");
                false
            }
        }
    }

    fn methods<'c>(&self, class: &'c ClassDescriptor) -> Vec<&'c MethodInfo> {
        if class.validate().is_err() {
            return Vec::new();
        }
        class.methods().iter().collect()
    }

    fn is_marked_as_test(&self, method: &MethodInfo) -> bool {
        method.is_marked()
    }

    fn parameter_count(&self, method: &MethodInfo) -> usize {
        method.param_count()
    }
}
