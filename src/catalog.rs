//! The ordered set of classes a run discovers tests from.
//!
//! Classes are registered explicitly; the catalog never scans for them. Registration order is discovery order.

use std::slice;

use verdict_runtime::{ClassDescriptor, TestClass};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: Vec<ClassDescriptor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the descriptor of `T`.
    pub fn with<T: TestClass>(mut self) -> Self {
        self.register::<T>();
        self
    }

    pub fn register<T: TestClass>(&mut self) {
        self.classes.push(T::descriptor());
    }

    /// Appends a descriptor built outside `#[test_class]`.
    pub fn with_descriptor(mut self, descriptor: ClassDescriptor) -> Self {
        self.push(descriptor);
        self
    }

    pub fn push(&mut self, descriptor: ClassDescriptor) {
        self.classes.push(descriptor);
    }

    pub fn iter(&self) -> slice::Iter<'_, ClassDescriptor> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<ClassDescriptor> for Catalog {
    fn from_iter<T: IntoIterator<Item = ClassDescriptor>>(iter: T) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ClassDescriptor;
    type IntoIter = slice::Iter<'a, ClassDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order_is_preserved() {
        let catalog = Catalog::new()
            .with_descriptor(ClassDescriptor::new("Second"))
            .with_descriptor(ClassDescriptor::new("First"));
        let names: Vec<&str> = catalog.iter().map(ClassDescriptor::name).collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_collects_from_iterator() {
        let catalog: Catalog = ["A", "B", "C"].into_iter().map(ClassDescriptor::new).collect();
        assert_eq!((&catalog).into_iter().count(), 3);
        assert!(Catalog::new().is_empty());
    }
}
