//! Nominal capabilities layered over structural guards.
//!
//! A [`Role`] pairs a guard predicate over an object's shape with an identity
//! that is unique per construction: two roles built from the same guard are
//! still different roles. [`RoleAware`] wraps an object and records which
//! roles it has been attached to.

use crate::errors::{QuackError, Result};
use crate::value::{Callable, Object, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ROLE_ID: AtomicU64 = AtomicU64::new(1);

/// Member the construction probe exposes. It is never callable.
const PROBE_KEY: &str = "__quack_probe__";

type Guard = dyn Fn(&Object) -> bool + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleId(u64);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "role#{}", self.0)
    }
}

/// A named capability defined by a guard over an object's methods.
#[derive(Clone)]
pub struct Role {
    id: RoleId,
    description: String,
    guard: Arc<Guard>,
}

impl Role {
    /// Register a new role.
    ///
    /// The guard is first run against a probe object whose only member is
    /// not callable. A guard that accepts the probe is not checking that
    /// members are methods, so construction fails with
    /// [`QuackError::RoleConstruction`].
    pub fn new<G>(description: impl Into<String>, guard: G) -> Result<Self>
    where
        G: Fn(&Object) -> bool + Send + Sync + 'static,
    {
        let description = description.into();
        let probe = Object::new().with(PROBE_KEY, Value::Null);
        if guard(&probe) {
            if let Some((key, _)) = probe.entries().into_iter().find(|(_, v)| !v.is_callable()) {
                return Err(QuackError::RoleConstruction {
                    role: description,
                    key: key.to_string(),
                });
            }
        }

        let id = RoleId(NEXT_ROLE_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(role = %description, id = %id, "registered role");
        Ok(Self {
            id,
            description,
            guard: Arc::new(guard),
        })
    }

    /// A role satisfied by objects exposing every one of `methods` as a callable.
    pub fn with_methods<I, S>(description: impl Into<String>, methods: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let methods: Vec<String> = methods.into_iter().map(Into::into).collect();
        Self::new(description, move |object: &Object| {
            methods.iter().all(|name| object.method(name).is_some())
        })
    }

    pub fn id(&self) -> RoleId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the guard against `object`.
    pub fn admits(&self, object: &Object) -> bool {
        (self.guard)(object)
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Role")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Role {}

/// An object view that tracks attached roles.
///
/// Reads go through to the wrapped object; the attached-role set belongs to
/// this wrapper only.
#[derive(Debug, Clone)]
pub struct RoleAware {
    object: Object,
    roles: BTreeSet<RoleId>,
}

impl RoleAware {
    pub fn new(object: &Object) -> Self {
        Self {
            object: Object::layered_over(object),
            roles: BTreeSet::new(),
        }
    }

    /// Attach `role` if its guard accepts this object.
    ///
    /// Attachment is best effort: a rejected role leaves the wrapper as it
    /// was and yields `None`.
    pub fn attach(&mut self, role: &Role) -> Option<Protocol> {
        if !role.admits(&self.object) {
            tracing::debug!(role = %role.description(), "role guard rejected object");
            return None;
        }
        self.roles.insert(role.id());
        tracing::debug!(role = %role.description(), "attached role");
        self.implements(role)
    }

    /// The object as `role`'s protocol, if the role is attached.
    pub fn implements(&self, role: &Role) -> Option<Protocol> {
        self.has_role(role).then(|| Protocol {
            role: role.id(),
            object: self.object.clone(),
        })
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(&role.id())
    }

    pub fn roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.roles.iter().copied()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.object.get(key)
    }

    pub fn object(&self) -> &Object {
        &self.object
    }
}

pub fn role_aware(object: &Object) -> RoleAware {
    RoleAware::new(object)
}

/// [`RoleAware::implements`], failing with [`QuackError::RoleNotImplemented`].
pub fn ensure_implements(aware: &RoleAware, role: &Role) -> Result<Protocol> {
    aware
        .implements(role)
        .ok_or_else(|| QuackError::RoleNotImplemented {
            role: role.description().to_string(),
        })
}

/// An object viewed through a role it has been attached to.
#[derive(Debug, Clone)]
pub struct Protocol {
    role: RoleId,
    object: Object,
}

impl Protocol {
    pub fn role_id(&self) -> RoleId {
        self.role
    }

    pub fn method(&self, name: &str) -> Option<&Callable> {
        self.object.method(name)
    }

    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        self.object.call(name, args)
    }

    pub fn object(&self) -> &Object {
        &self.object
    }
}
