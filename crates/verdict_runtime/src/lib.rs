//! Runtime support for verdict test classes.
//!
//! This crate provides what test code and `#[test_class]`-generated code depend on: class descriptors,
//! the `TestClass` trait, and the assertion library.

#![deny(clippy::unwrap_used)]

// Generated code refers to `::verdict_runtime`, including inside this crate's own tests.
extern crate self as verdict_runtime;

pub mod reflection;
pub mod testing;

pub use reflection::{
    ClassDescriptor, Constructor, ConstructorInfo, DescriptorError, Instance, Invoker, MethodInfo, TestClass,
};
pub use testing::{AssertionFailure, IntoTestResult, assert_equal};

pub use verdict_derive::test_class;
