use super::{into_result, IssuePath, ParameterSchema, Phase, Schema};
use crate::errors::Result;
use crate::signature::FunctionSignature;
use crate::value::{Callable, Promise, Value};
use std::sync::Arc;

/// A compiled signature, ready to wrap callables with validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSchema {
    signature: FunctionSignature,
    parameters: ParameterSchema,
    returns: Schema,
}

impl FunctionSchema {
    /// Compile `signature`, failing on a misordered parameter list.
    pub fn compile(signature: &FunctionSignature) -> Result<Self> {
        let parameters = ParameterSchema::compile(&signature.parameters)?;
        tracing::debug!(signature = %signature, "compiled signature schema");
        Ok(Self {
            signature: signature.clone(),
            parameters,
            returns: Schema::compile(&signature.returns),
        })
    }

    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    pub fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    pub fn returns(&self) -> &Schema {
        &self.returns
    }

    pub fn is_async(&self) -> bool {
        self.signature.is_async
    }

    pub fn check_return(&self, value: Value) -> Result<Value> {
        into_result(
            self.returns.check(value, &IssuePath::returned()),
            Phase::Return,
        )
    }

    /// Wrap `target` in a callable that validates every invocation.
    ///
    /// Synchronous wrappers validate the arguments, call `target`, then
    /// validate its return value, failing with a validation error at either
    /// step. Asynchronous wrappers validate the arguments and call `target`
    /// during the invocation but always return a promise: argument failures
    /// and errors raised by `target` become rejections, and the return value
    /// is validated once the promise settles.
    pub fn implement(&self, target: &Callable) -> Callable {
        let schema = Arc::new(self.clone());
        let inner = target.clone();

        if self.is_async() {
            Callable::wrapping(target, move |args| {
                let returned = match schema.parameters.check(args).and_then(|args| inner.call(args)) {
                    Ok(returned) => returned,
                    Err(err) => return Ok(Value::Promise(Promise::rejected(err))),
                };
                let schema = Arc::clone(&schema);
                Ok(Value::Promise(Promise::new(async move {
                    let resolved = match returned {
                        Value::Promise(promise) => promise.await?,
                        other => other,
                    };
                    schema.check_return(resolved)
                })))
            })
        } else {
            Callable::wrapping(target, move |args| {
                let args = schema.parameters.check(args)?;
                let returned = inner.call(args)?;
                schema.check_return(returned)
            })
        }
    }
}
