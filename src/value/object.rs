use super::{Callable, Value};
use crate::errors::QuackError;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Default)]
struct Layer {
    own: BTreeMap<String, Value>,
    delegate: Option<Object>,
}

/// A record of named members with read-through delegation.
///
/// Lookup checks the object's own members first and falls back to the
/// delegate chain. Layering never mutates the delegate: an override layer
/// built with [`Object::layered_over`] only shadows members.
#[derive(Clone, Default)]
pub struct Object {
    layer: Arc<Layer>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty override layer reading through to `base`.
    pub fn layered_over(base: &Object) -> Self {
        Self {
            layer: Arc::new(Layer {
                own: BTreeMap::new(),
                delegate: Some(base.clone()),
            }),
        }
    }

    /// Builder-style [`Object::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set an own member, shadowing any delegate member of the same name.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        Arc::make_mut(&mut self.layer)
            .own
            .insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.layer
            .own
            .get(key)
            .or_else(|| self.layer.delegate.as_ref().and_then(|d| d.get(key)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The member under `key`, if present and callable.
    pub fn method(&self, key: &str) -> Option<&Callable> {
        self.get(key).and_then(Value::as_callable)
    }

    /// Invoke the method under `key`.
    pub fn call(&self, key: &str, args: Vec<Value>) -> Result<Value, QuackError> {
        self.method(key)
            .ok_or_else(|| QuackError::missing_method(key))?
            .call(args)
    }

    pub fn own_keys(&self) -> impl Iterator<Item = &str> {
        self.layer.own.keys().map(String::as_str)
    }

    pub fn is_overridden(&self, key: &str) -> bool {
        self.layer.own.contains_key(key)
    }

    pub fn delegate(&self) -> Option<&Object> {
        self.layer.delegate.as_ref()
    }

    /// Every visible key across the delegate chain, sorted and deduplicated.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = BTreeSet::new();
        let mut current = Some(self);
        while let Some(object) = current {
            keys.extend(object.own_keys());
            current = object.delegate();
        }
        keys.into_iter().collect()
    }

    /// Visible members with overrides resolved.
    pub fn entries(&self) -> Vec<(&str, &Value)> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key, value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}
