//! Schema compiler: signature types to runtime validators.
//!
//! [`Schema::compile`] maps each [`ParsedType`] to a validator tree.
//! Validators transform as they check: arrays and tuples are rebuilt from
//! their validated elements, and promise-typed values are replaced by a new
//! promise that validates the resolution once it settles.
//!
//! Parameter lists compile to a [`ParameterSchema`] after the
//! required-prefix / optional-suffix rule has been checked, and whole
//! signatures to a [`FunctionSchema`] that can wrap any [`Callable`].
//!
//! [`Callable`]: crate::value::Callable

mod function;
mod issue;

pub use function::FunctionSchema;
pub use issue::{Issue, IssuePath, Phase, ValidationError};

use crate::errors::{QuackError, Result};
use crate::signature::{ParameterType, ParsedType, PrimitiveType};
use crate::value::{Promise, Value};
use futures::future::{BoxFuture, FutureExt};
use stillwater::{NonEmptyVec, Validation};

/// Outcome of checking one value: the (possibly rebuilt) value, or every issue found.
pub type Checked<T = Value> = Validation<T, NonEmptyVec<Issue>>;

/// Compiled validator for a single type.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Void,
    Any,
    /// Any callable; behaviour is never exercised.
    Callable,
    Array(Box<Schema>),
    Tuple(Vec<Schema>),
    Promise(Box<Schema>),
}

impl Schema {
    pub fn compile(ty: &ParsedType) -> Schema {
        match ty {
            ParsedType::Primitive(primitive) => match primitive {
                PrimitiveType::Number => Schema::Number,
                PrimitiveType::String => Schema::String,
                PrimitiveType::Boolean => Schema::Boolean,
                PrimitiveType::Null => Schema::Null,
                PrimitiveType::Undefined => Schema::Undefined,
                PrimitiveType::Void => Schema::Void,
                PrimitiveType::Dontcare => Schema::Any,
            },
            ParsedType::Array(element) => Schema::Array(Box::new(Schema::compile(element))),
            ParsedType::Tuple(elements) => {
                Schema::Tuple(elements.iter().map(Schema::compile).collect())
            }
            ParsedType::Promise(inner) => Schema::Promise(Box::new(Schema::compile(inner))),
            ParsedType::Function(_) => Schema::Callable,
        }
    }

    /// Human-readable name used as the `expected` side of an issue.
    pub fn describe(&self) -> String {
        match self {
            Schema::Number => "number".to_string(),
            Schema::String => "string".to_string(),
            Schema::Boolean => "boolean".to_string(),
            Schema::Null => "null".to_string(),
            Schema::Undefined => "undefined".to_string(),
            Schema::Void => "void".to_string(),
            Schema::Any => "anything".to_string(),
            Schema::Callable => "function".to_string(),
            Schema::Array(element) => format!("array of {}", element.describe()),
            Schema::Tuple(elements) => format!("tuple of {}", elements.len()),
            Schema::Promise(inner) => format!("promise of {}", inner.describe()),
        }
    }

    pub fn check(&self, value: Value, path: &IssuePath) -> Checked {
        match (self, value) {
            (Schema::Any, value) => Validation::Success(value),
            (Schema::Number, Value::Number(n)) if n.is_finite() => {
                Validation::Success(Value::Number(n))
            }
            (Schema::Number, Value::Number(n)) => {
                fail(Issue::new(path, "finite number", n.to_string()))
            }
            (Schema::String, value @ Value::String(_))
            | (Schema::Boolean, value @ Value::Bool(_))
            | (Schema::Null, value @ Value::Null)
            | (Schema::Undefined | Schema::Void, value @ Value::Undefined)
            | (Schema::Callable, value @ Value::Function(_)) => Validation::Success(value),
            (Schema::Array(element), Value::Array(items)) => rebuild_array(collect_checked(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| element.check(item, &path.push(i))),
            )),
            (Schema::Tuple(elements), Value::Array(items)) if elements.len() == items.len() => {
                rebuild_array(collect_checked(
                    elements
                        .iter()
                        .zip(items)
                        .enumerate()
                        .map(|(i, (schema, item))| schema.check(item, &path.push(i))),
                ))
            }
            (Schema::Tuple(elements), Value::Array(items)) => fail(Issue::new(
                path,
                format!("tuple of {}", elements.len()),
                format!("array of {}", items.len()),
            )),
            (Schema::Promise(inner), value) => {
                Validation::Success(Value::Promise(validated_promise(inner, value, path)))
            }
            (schema, value) => fail(Issue::mismatch(path, schema.describe(), &value)),
        }
    }
}

fn rebuild_array(checked: Checked<Vec<Value>>) -> Checked {
    match checked {
        Validation::Success(items) => Validation::Success(Value::Array(items)),
        Validation::Failure(issues) => Validation::Failure(issues),
    }
}

fn fail<T>(issue: Issue) -> Checked<T> {
    Validation::Failure(NonEmptyVec::new(issue, Vec::new()))
}

/// Accumulate element results; any failure fails the whole collection with every issue.
fn collect_checked(results: impl IntoIterator<Item = Checked>) -> Checked<Vec<Value>> {
    let mut values = Vec::new();
    let mut issues = Vec::new();
    for result in results {
        match result {
            Validation::Success(value) => values.push(value),
            Validation::Failure(errors) => issues.extend(errors),
        }
    }
    let mut issues = issues.into_iter();
    match issues.next() {
        Some(head) => Validation::Failure(NonEmptyVec::new(head, issues.collect())),
        None => Validation::Success(values),
    }
}

/// A promise settling with `value`'s resolution once it passes `inner`.
/// Non-promise values count as already resolved.
fn validated_promise(inner: &Schema, value: Value, path: &IssuePath) -> Promise {
    let inner = inner.clone();
    let path = path.clone();
    Promise::new(async move {
        let resolved = match value {
            Value::Promise(promise) => promise.await?,
            other => other,
        };
        into_result(inner.check(resolved, &path), path.phase())
    })
}

/// Drive every promise in `values` to settlement, including promises
/// nested in arrays, and return the values with each promise replaced by
/// its resolution. Validation rejections are merged into one error.
pub async fn settle(values: Vec<Value>, phase: Phase) -> Result<Vec<Value>> {
    let mut results = Vec::with_capacity(values.len());
    for value in values {
        results.push(settle_value(value).await?);
    }
    into_result(collect_checked(results), phase)
}

fn settle_value(value: Value) -> BoxFuture<'static, Result<Checked>> {
    async move {
        match value {
            Value::Promise(promise) => match promise.await {
                Ok(resolved) => settle_value(resolved).await,
                Err(QuackError::Validation(error)) => Ok(rebuild_array(collect_checked(
                    error.issues().iter().cloned().map(fail),
                ))),
                Err(other) => Err(other),
            },
            Value::Array(items) => {
                let mut results = Vec::with_capacity(items.len());
                for item in items {
                    results.push(settle_value(item).await?);
                }
                Ok(rebuild_array(collect_checked(results)))
            }
            other => Ok(Validation::Success(other)),
        }
    }
    .boxed()
}

pub(crate) fn into_result<T>(checked: Checked<T>, phase: Phase) -> Result<T> {
    match checked {
        Validation::Success(value) => Ok(value),
        Validation::Failure(issues) => Err(ValidationError::new(phase, issues).into()),
    }
}

/// Fails with [`QuackError::ParameterOrder`] at the first required parameter
/// that follows an optional one.
pub fn check_parameter_order(parameters: &[ParameterType]) -> Result<()> {
    let mut seen_optional = false;
    for (index, parameter) in parameters.iter().enumerate() {
        if !parameter.optional && seen_optional {
            return Err(QuackError::ParameterOrder { index });
        }
        seen_optional |= parameter.optional;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    schema: Schema,
    optional: bool,
}

/// Compiled, positional validator for an argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSchema {
    slots: Vec<Slot>,
}

impl ParameterSchema {
    pub fn compile(parameters: &[ParameterType]) -> Result<Self> {
        check_parameter_order(parameters)?;
        Ok(Self {
            slots: parameters
                .iter()
                .map(|p| Slot {
                    schema: Schema::compile(&p.ty),
                    optional: p.optional,
                })
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Validate `args` positionally, returning the validated arguments.
    ///
    /// Absent trailing optional arguments stay absent; an explicit
    /// `Undefined` is also accepted for an optional slot.
    pub fn check(&self, args: Vec<Value>) -> Result<Vec<Value>> {
        into_result(self.check_all(args), Phase::Arguments)
    }

    fn check_all(&self, args: Vec<Value>) -> Checked<Vec<Value>> {
        let root = IssuePath::arguments();
        let received = args.len();
        let mut args = args.into_iter();
        let mut results = Vec::with_capacity(self.slots.len().max(received));

        for (position, slot) in self.slots.iter().enumerate() {
            let path = root.push(position);
            results.push(match args.next() {
                Some(Value::Undefined) if slot.optional => Validation::Success(Value::Undefined),
                Some(arg) => slot.schema.check(arg, &path),
                None if slot.optional => continue,
                None => fail(Issue::new(&path, slot.schema.describe(), "nothing")),
            });
        }
        if received > self.slots.len() {
            results.push(fail(Issue::new(
                &root.push(self.slots.len()),
                format!("at most {} arguments", self.slots.len()),
                format!("{received} arguments"),
            )));
        }
        collect_checked(results)
    }
}
