//! Class descriptors for discoverable test classes.
//!
//! A `ClassDescriptor` is the harness-facing view of a class: its constructors and its methods in declaration
//! order, each method carrying its test marker, parameter count and (for callable tests) a stored invoker.
//! Descriptors are normally generated by `#[test_class]`, but catalogs may build them by hand as well.

use std::any::Any;
use std::collections::HashSet;

use thiserror::Error;

/// A freshly constructed, type-erased test class instance.
pub type Instance = Box<dyn Any>;

/// Builds a new instance. `Err` carries a description of why construction failed.
pub type Constructor = fn() -> Result<Instance, String>;

/// Calls one test method on an instance created by the owning class's constructor.
pub type Invoker = fn(&mut dyn Any) -> Result<(), String>;

/// Implemented by every type that can appear in a test catalog.
///
/// This trait is typically generated using `#[test_class]` on an inherent impl block.
///
/// # Examples
///
/// ```ignore
/// pub struct Arithmetic;
///
/// #[test_class(default)]
/// impl Arithmetic {
///     #[test_method]
///     pub fn adds(&self) {
///         assert_equal(2 + 2, 4);
///     }
/// }
///
/// let descriptor = Arithmetic::descriptor();
/// assert_eq!(descriptor.name(), "Arithmetic");
/// ```
pub trait TestClass: 'static {
    /// Returns the constructors and methods of this class.
    fn descriptor() -> ClassDescriptor;
}

/// Errors that make a descriptor impossible to introspect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("class name is empty")]
    EmptyName,

    #[error("class {class} declares method `{method}` more than once")]
    DuplicateMethod { class: String, method: String },

    #[error("class {class} marks `{method}` as a test but provides no invoker")]
    MissingInvoker { class: String, method: String },

    #[error("class {class} declares a parameterless constructor without a factory")]
    MissingFactory { class: String },
}

/// One constructor of a class.
#[derive(Debug, Clone, Copy)]
pub struct ConstructorInfo {
    param_count: usize,
    factory: Option<Constructor>,
}

impl ConstructorInfo {
    /// A constructor that takes no arguments and can be called by the harness.
    pub fn parameterless(factory: Constructor) -> Self {
        Self {
            param_count: 0,
            factory: Some(factory),
        }
    }

    /// A constructor that requires arguments. The harness never calls it.
    pub fn with_params(param_count: usize) -> Self {
        Self {
            param_count,
            factory: None,
        }
    }

    pub fn param_count(&self) -> usize {
        self.param_count
    }

    pub fn factory(&self) -> Option<Constructor> {
        self.factory
    }
}

/// One method of a class.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    name: String,
    marked: bool,
    param_count: usize,
    invoker: Option<Invoker>,
}

impl MethodInfo {
    /// An unmarked method with the given parameter count (receiver excluded).
    pub fn new(name: impl Into<String>, param_count: usize) -> Self {
        Self {
            name: name.into(),
            marked: false,
            param_count,
            invoker: None,
        }
    }

    /// Tags the method with the test marker.
    pub fn marked_as_test(mut self) -> Self {
        self.marked = true;
        self
    }

    pub fn with_invoker(mut self, invoker: Invoker) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn param_count(&self) -> usize {
        self.param_count
    }

    pub fn invoker(&self) -> Option<Invoker> {
        self.invoker
    }
}

/// Harness-facing description of a class.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    name: String,
    path: Option<String>,
    constructors: Vec<ConstructorInfo>,
    methods: Vec<MethodInfo>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Descriptor of a type implementing [`TestClass`].
    pub fn of<T: TestClass>() -> Self {
        T::descriptor()
    }

    /// Sets the fully qualified path (e.g. `billing::Tests`) that identifies the class.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorInfo) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the class: its path if one was recorded, else its name.
    ///
    /// Two descriptors with the same short name but different paths are different classes.
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }

    pub fn constructors(&self) -> &[ConstructorInfo] {
        &self.constructors
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// The first callable constructor taking no arguments.
    pub fn parameterless_constructor(&self) -> Option<Constructor> {
        self.constructors
            .iter()
            .filter(|constructor| constructor.param_count == 0)
            .find_map(|constructor| constructor.factory)
    }

    /// Checks that the descriptor can be introspected consistently.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::EmptyName);
        }
        if self
            .constructors
            .iter()
            .any(|constructor| constructor.param_count == 0 && constructor.factory.is_none())
        {
            return Err(DescriptorError::MissingFactory {
                class: self.name.clone(),
            });
        }
        let mut seen = HashSet::new();
        for method in &self.methods {
            if !seen.insert(method.name.as_str()) {
                return Err(DescriptorError::DuplicateMethod {
                    class: self.name.clone(),
                    method: method.name.clone(),
                });
            }
            if method.marked && method.param_count == 0 && method.invoker.is_none() {
                return Err(DescriptorError::MissingInvoker {
                    class: self.name.clone(),
                    method: method.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Message used by generated invokers when handed an instance of the wrong type.
pub fn instance_mismatch(class: &str) -> String {
    format!("instance is not a {class}")
}
