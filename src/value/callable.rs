use super::{Promise, Value};
use crate::errors::QuackError;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Body = dyn Fn(Vec<Value>) -> Result<Value, QuackError> + Send + Sync;

static NEXT_CALLABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Reference identity of a callable. Unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CallableId(u64);

impl CallableId {
    fn next() -> Self {
        CallableId(NEXT_CALLABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CallableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Inner {
    id: CallableId,
    name: Option<String>,
    body: Arc<Body>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        crate::annotation::forget(self.id);
    }
}

/// A callable value with reference identity.
///
/// `clone` copies the reference: both handles share one [`CallableId`], so an
/// annotation attached through either is visible through both. [`rebind`]
/// creates a new callable with the same behaviour and a fresh identity, which
/// never inherits an annotation.
///
/// [`rebind`]: Callable::rebind
#[derive(Clone)]
pub struct Callable {
    inner: Arc<Inner>,
}

impl Callable {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, QuackError> + Send + Sync + 'static,
    {
        Self::from_parts(None, Arc::new(body))
    }

    /// Same as [`Callable::new`], with a name shown in diagnostics.
    pub fn named<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, QuackError> + Send + Sync + 'static,
    {
        Self::from_parts(Some(name.into()), Arc::new(body))
    }

    /// Build an asynchronous callable: each invocation returns a
    /// [`Value::Promise`] settling with the future's output.
    pub fn asynchronous<F, Fut>(body: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, QuackError>> + Send + 'static,
    {
        Self::new(move |args| Ok(Value::Promise(Promise::new(body(args)))))
    }

    /// A new callable carrying `like`'s name, used by validating wrappers.
    pub(crate) fn wrapping<F>(like: &Callable, body: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, QuackError> + Send + Sync + 'static,
    {
        Self::from_parts(like.inner.name.clone(), Arc::new(body))
    }

    fn from_parts(name: Option<String>, body: Arc<Body>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: CallableId::next(),
                name,
                body,
            }),
        }
    }

    pub fn id(&self) -> CallableId {
        self.inner.id
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value, QuackError> {
        (self.inner.body)(args)
    }

    pub fn same_identity(&self, other: &Callable) -> bool {
        self.inner.id == other.inner.id
    }

    /// A new callable sharing this one's behaviour under a fresh identity.
    pub fn rebind(&self) -> Callable {
        Self::from_parts(self.inner.name.clone(), Arc::clone(&self.inner.body))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.name {
            Some(name) => write!(f, "Callable({} {})", self.inner.id, name),
            None => write!(f, "Callable({})", self.inner.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double() -> Callable {
        Callable::named("double", |args| {
            let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
            Ok(Value::Number(n * 2.0))
        })
    }

    #[test]
    fn test_call_forwards_arguments() {
        let f = double();
        assert_eq!(f.call(vec![Value::from(4)]).unwrap(), Value::Number(8.0));
    }

    #[test]
    fn test_clone_shares_identity() {
        let f = double();
        let g = f.clone();
        assert!(f.same_identity(&g));
        assert_eq!(f.id(), g.id());
    }

    #[test]
    fn test_rebind_gets_fresh_identity_and_same_behaviour() {
        let f = double();
        let g = f.rebind();
        assert!(!f.same_identity(&g));
        assert_eq!(g.name(), Some("double"));
        assert_eq!(g.call(vec![Value::from(1)]).unwrap(), Value::Number(2.0));
    }

    #[tokio::test]
    async fn test_asynchronous_returns_promise() {
        let f = Callable::asynchronous(|args: Vec<Value>| async move {
            Ok(args.into_iter().next().unwrap_or_default())
        });
        let out = f.call(vec![Value::from("hi")]).unwrap();
        let promise = out.as_promise().cloned().unwrap();
        assert_eq!(promise.await.unwrap(), Value::from("hi"));
    }
}
