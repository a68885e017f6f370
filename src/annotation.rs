//! Signature annotations bound to callable identity.
//!
//! Annotations live in a process-wide side table keyed by [`CallableId`], so
//! they never travel with a rebound callable and are never visible as an
//! ordinary member. An entry is removed when the last handle to its callable
//! is dropped.
//!
//! Declarations reach [`Quackable::declare`] in one of three shapes:
//!
//! - [`Declaration::Function`]: a function value annotated directly
//! - [`Declaration::LegacyMethod`]: a method declared through a property descriptor
//! - [`Declaration::Method`]: a method declared with a decorator context that
//!   can register initializers
//!
//! All of them end in [`attach`].

use crate::errors::{QuackError, Result};
use crate::signature::{signature_of, FunctionSignature};
use crate::value::{Callable, CallableId, Object, Value};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::fmt;

static ANNOTATIONS: Lazy<DashMap<CallableId, FunctionSignature>> = Lazy::new(DashMap::new);

/// Record `signature` for `callable`, replacing any earlier annotation.
/// Returns the same callable.
pub fn attach(callable: &Callable, signature: FunctionSignature) -> Callable {
    tracing::debug!(callable = %callable.id(), signature = %signature, "attached annotation");
    ANNOTATIONS.insert(callable.id(), signature);
    callable.clone()
}

/// The signature attached to `callable`, if any.
pub fn lookup(callable: &Callable) -> Option<FunctionSignature> {
    let found = ANNOTATIONS
        .get(&callable.id())
        .map(|entry| entry.value().clone());
    tracing::debug!(callable = %callable.id(), annotated = found.is_some(), "looked up annotation");
    found
}

pub fn is_quackable(callable: &Callable) -> bool {
    ANNOTATIONS.contains_key(&callable.id())
}

pub(crate) fn forget(id: CallableId) {
    ANNOTATIONS.remove(&id);
}

/// Descriptor handed to legacy method declarations.
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    pub value: Option<Value>,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyDescriptor {
    /// Descriptor of an ordinary class method.
    pub fn method(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// Descriptor of an accessor, which carries no `value`.
    pub fn accessor() -> Self {
        Self {
            value: None,
            writable: false,
            enumerable: false,
            configurable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
    Field,
}

/// Initializer registry of a decorated class member.
#[derive(Debug, Clone, Default)]
pub struct Initializers {
    pending: Vec<Callable>,
}

impl Initializers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, initializer: Callable) {
        self.pending.push(initializer);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run every registered initializer in registration order.
    pub fn run(&self) -> Result<()> {
        for initializer in &self.pending {
            initializer.call(Vec::new())?;
        }
        Ok(())
    }
}

/// Context handed to method decorators.
#[derive(Debug, Clone)]
pub struct DecoratorContext {
    pub kind: MemberKind,
    pub name: String,
    pub initializers: Option<Initializers>,
}

impl DecoratorContext {
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Method,
            name: name.into(),
            initializers: Some(Initializers::new()),
        }
    }

    /// A context that cannot register initializers.
    pub fn without_initializers(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            initializers: None,
        }
    }

    pub fn add_initializer(&mut self, initializer: Callable) -> Result<()> {
        match self.initializers.as_mut() {
            Some(registry) => {
                registry.add(initializer);
                Ok(())
            }
            None => Err(QuackError::invalid_usage(format!(
                "member `{}` cannot register initializers",
                self.name
            ))),
        }
    }
}

/// How an annotation is being applied.
#[derive(Debug, Clone)]
pub enum Declaration {
    Function(Value),
    LegacyMethod {
        target: Object,
        key: String,
        descriptor: PropertyDescriptor,
    },
    Method {
        method: Value,
        context: DecoratorContext,
    },
}

impl Declaration {
    fn shape(&self) -> &'static str {
        match self {
            Declaration::Function(_) => "function",
            Declaration::LegacyMethod { .. } => "legacy method",
            Declaration::Method { .. } => "method",
        }
    }
}

/// Annotator produced by [`quackable`].
#[derive(Debug, Clone)]
pub struct Quackable {
    signature: FunctionSignature,
}

/// Parse `text` once and return an annotator for it.
pub fn quackable(text: &str) -> Result<Quackable> {
    Ok(Quackable {
        signature: signature_of(text)?,
    })
}

impl Quackable {
    pub fn new(signature: FunctionSignature) -> Self {
        Self { signature }
    }

    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    /// Annotate a callable directly.
    pub fn annotate(&self, callable: &Callable) -> Callable {
        attach(callable, self.signature.clone())
    }

    /// Annotate whatever callable `declaration` carries and return it.
    pub fn declare(&self, declaration: Declaration) -> Result<Callable> {
        let shape = declaration.shape();
        let callable = match declaration {
            Declaration::Function(value) => function_value(value, shape)?,
            Declaration::LegacyMethod {
                key, descriptor, ..
            } => match descriptor.value {
                Some(value) => function_value(value, shape)?,
                None => {
                    return Err(QuackError::invalid_usage(format!(
                        "descriptor of `{key}` has no function value"
                    )))
                }
            },
            Declaration::Method { method, context } => {
                if context.initializers.is_none() {
                    return Err(QuackError::invalid_usage(format!(
                        "context of `{}` has no initializer registry",
                        context.name
                    )));
                }
                function_value(method, shape)?
            }
        };
        Ok(self.annotate(&callable))
    }
}

fn function_value(value: Value, shape: &str) -> Result<Callable> {
    match value {
        Value::Function(callable) => Ok(callable),
        other => Err(QuackError::invalid_usage(format!(
            "{shape} declaration received {}",
            other.kind()
        ))),
    }
}

impl fmt::Display for Quackable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quackable({})", self.signature)
    }
}
