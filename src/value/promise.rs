use super::Value;
use crate::errors::QuackError;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::{Future, IntoFuture};

/// Outcome of a settled promise: resolved value or rejection.
pub type Settlement = Result<Value, QuackError>;

/// A shareable deferred value.
///
/// Promises are lazy: the wrapped future starts running the first time any
/// holder awaits it, and every holder observes the same settlement.
#[derive(Clone)]
pub struct Promise(Shared<BoxFuture<'static, Settlement>>);

impl Promise {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Settlement> + Send + 'static,
    {
        Promise(future.boxed().shared())
    }

    pub fn resolved(value: Value) -> Self {
        Self::new(futures::future::ready(Ok(value)))
    }

    pub fn rejected(error: QuackError) -> Self {
        Self::new(futures::future::ready(Err(error)))
    }

    /// The settlement, if some holder already drove the promise to completion.
    pub fn peek(&self) -> Option<&Settlement> {
        self.0.peek()
    }
}

impl IntoFuture for Promise {
    type Output = Settlement;
    type IntoFuture = Shared<BoxFuture<'static, Settlement>>;

    fn into_future(self) -> Self::IntoFuture {
        self.0
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(Ok(value)) => write!(f, "Promise(resolved {value:?})"),
            Some(Err(err)) => write!(f, "Promise(rejected {err})"),
            None => f.write_str("Promise(pending)"),
        }
    }
}
