//! Built-in sample catalog, run by the `verdict` binary.
//!
//! `SampleTests` is the only class that qualifies: `Person` needs a name to be built and `Apple` has no marked
//! methods. Running the catalog prints
//!
//! ```text
//! simple_passing_test : PASSED
//! simple_failing_test : FAILED
//! ```

use verdict_runtime::{assert_equal, test_class};

use crate::catalog::Catalog;

pub struct SampleTests;

#[test_class]
impl SampleTests {
    pub fn new() -> Self {
        Self
    }

    #[test_method]
    pub fn simple_passing_test(&self) {
        assert_equal(1, 1);
    }

    #[test_method]
    pub fn simple_failing_test(&self) {
        assert_equal(1, 2);
    }

    pub fn some_dummy_method(&self) {}
}

pub struct Person {
    name: String,
}

#[test_class]
impl Person {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }

    #[test_method]
    pub fn has_name(&self) {
        assert_equal(self.name.is_empty(), false);
    }
}

#[derive(Default)]
pub struct Apple {
    variety: String,
}

#[test_class(default)]
impl Apple {
    pub fn variety(&self) -> &str {
        &self.variety
    }
}

/// `SampleTests`, `Person` and `Apple`, in that order.
pub fn catalog() -> Catalog {
    Catalog::new().with::<SampleTests>().with::<Person>().with::<Apple>()
}
