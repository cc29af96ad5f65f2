//! Scripted objects and the document object they drive
//!
//! A host document owns a [`DocumentObject`]: its properties and its
//! current shape. A [`ScriptedObject`] is the proxy attached to it; the
//! host calls back into the proxy on construction, on every property
//! change and on recompute. [`ScriptedFeature`] is the binding that makes
//! those calls in the order the host does.

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::property::{Assignment, PropertyBag, PropertyError};
use crate::geometry::{GeometryKernel, KernelError};
use crate::standards::TableError;

/// Errors raised by a scripted object callback
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ObjectError {
    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Table(#[from] TableError),

    #[error("geometry kernel: {0}")]
    Kernel(#[from] KernelError),

    #[error("{property} is invalid: {reason}")]
    InvalidValue { property: String, reason: String },

    #[error("property '{0}' has no value")]
    Unset(String),
}

/// A host document object: properties plus the shape they produce
#[derive(Debug, Clone)]
pub struct DocumentObject<S> {
    name: String,
    pub properties: PropertyBag,
    shape: Option<S>,
}

impl<S> DocumentObject<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: PropertyBag::new(),
            shape: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> Option<&S> {
        self.shape.as_ref()
    }

    pub fn set_shape(&mut self, shape: S) {
        self.shape = Some(shape);
    }
}

/// Callbacks a part implements to live in a host document
pub trait ScriptedObject<K: GeometryKernel> {
    /// Type name shown by the host
    fn type_name(&self) -> &'static str;

    /// Declare properties and their defaults on a new object
    fn attach(&self, obj: &mut DocumentObject<K::Shape>) -> Result<(), ObjectError>;

    /// Called after the host stored a new value for `prop`
    fn on_changed(
        &self,
        obj: &mut DocumentObject<K::Shape>,
        kernel: &K,
        prop: &str,
    ) -> Result<(), ObjectError>;

    /// Rebuild the object's shape from its properties
    fn execute(&self, obj: &mut DocumentObject<K::Shape>, kernel: &K) -> Result<(), ObjectError>;
}

/// A document object bound to its scripted proxy and a geometry kernel
#[derive(Debug)]
pub struct ScriptedFeature<K: GeometryKernel, P> {
    object: DocumentObject<K::Shape>,
    proxy: P,
    kernel: K,
}

impl<K, P> ScriptedFeature<K, P>
where
    K: GeometryKernel,
    P: ScriptedObject<K>,
{
    /// Create the object and let the proxy declare its properties
    pub fn new(name: impl Into<String>, proxy: P, kernel: K) -> Result<Self, ObjectError> {
        let mut object = DocumentObject::new(name);
        proxy.attach(&mut object)?;
        debug!(object = object.name(), kind = proxy.type_name(), "attached scripted object");
        Ok(Self {
            object,
            proxy,
            kernel,
        })
    }

    /// Store a property value, then notify the proxy
    ///
    /// The value stays assigned even if the proxy's callback fails; the
    /// previous shape is kept in that case.
    pub fn set_property(
        &mut self,
        name: &str,
        value: impl Into<Assignment>,
    ) -> Result<(), ObjectError> {
        self.object.properties.set(name, value)?;
        debug!(object = self.object.name(), property = name, "property changed");
        self.proxy
            .on_changed(&mut self.object, &self.kernel, name)
            .inspect_err(|e| warn!(object = self.object.name(), error = %e, "on_changed failed"))
    }

    /// Rebuild the shape
    pub fn recompute(&mut self) -> Result<(), ObjectError> {
        debug!(object = self.object.name(), "recompute");
        self.proxy
            .execute(&mut self.object, &self.kernel)
            .inspect_err(|e| warn!(object = self.object.name(), error = %e, "recompute failed"))
    }

    pub fn object(&self) -> &DocumentObject<K::Shape> {
        &self.object
    }

    pub fn shape(&self) -> Option<&K::Shape> {
        self.object.shape()
    }

    pub fn proxy(&self) -> &P {
        &self.proxy
    }
}
