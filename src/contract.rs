//! Duck-typing contracts over callables and objects.
//!
//! [`expect_quack`] checks one callable against an expected signature;
//! [`expect_duck`] does the same for a set of named methods on an object.
//! Annotated candidates are compared structurally with their annotation,
//! unannotated ones are wrapped in a validating schema.

use crate::annotation;
use crate::errors::{QuackError, Result};
use crate::schema::FunctionSchema;
use crate::signature::{compatible, signature_of, FunctionSignature};
use crate::value::{Callable, Object};

/// Contract for a single callable, built by [`expect_quack`].
#[derive(Debug, Clone)]
pub struct QuackContract {
    schema: FunctionSchema,
    strict: bool,
}

/// Parse `expected` and build a contract for it.
///
/// The signature is compiled immediately, so a misordered parameter list is
/// reported here rather than on first use.
pub fn expect_quack(expected: &str, strict: bool) -> Result<QuackContract> {
    QuackContract::new(signature_of(expected)?, strict)
}

impl QuackContract {
    pub fn new(expected: FunctionSignature, strict: bool) -> Result<Self> {
        Ok(Self {
            schema: FunctionSchema::compile(&expected)?,
            strict,
        })
    }

    pub fn expected(&self) -> &FunctionSignature {
        self.schema.signature()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Check `candidate` against the contract.
    ///
    /// - unannotated: returns a validating wrapper
    /// - annotated and compatible: returns `candidate` itself, or a
    ///   validating wrapper when strict
    /// - annotated and incompatible: fails with
    ///   [`QuackError::SignatureMismatch`]
    pub fn apply(&self, candidate: &Callable) -> Result<Callable> {
        let Some(actual) = annotation::lookup(candidate) else {
            return Ok(self.schema.implement(candidate));
        };

        if !compatible(&actual, self.expected()) {
            tracing::warn!(
                expected = %self.expected(),
                actual = %actual,
                "annotated signature does not match contract"
            );
            return Err(QuackError::SignatureMismatch {
                expected: self.expected().clone(),
                actual,
            });
        }

        if self.strict {
            Ok(self.schema.implement(candidate))
        } else {
            Ok(candidate.clone())
        }
    }
}

/// Contract for a set of named methods, built by [`expect_duck`].
#[derive(Debug, Clone)]
pub struct DuckContract {
    methods: Vec<(String, QuackContract)>,
}

/// Build a contract requiring every `(name, signature)` pair.
///
/// Naming a method twice fails with [`QuackError::InvalidUsage`].
pub fn expect_duck<I, K, S>(expected: I, strict: bool) -> Result<DuckContract>
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: AsRef<str>,
{
    let mut methods: Vec<(String, QuackContract)> = Vec::new();
    for (name, text) in expected {
        let name = name.into();
        if methods.iter().any(|(existing, _)| *existing == name) {
            return Err(QuackError::invalid_usage(format!(
                "method `{name}` is declared more than once"
            )));
        }
        let contract = expect_quack(text.as_ref(), strict)?;
        methods.push((name, contract));
    }
    Ok(DuckContract { methods })
}

impl DuckContract {
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|(name, _)| name.as_str())
    }

    /// Check every declared method of `candidate`.
    ///
    /// Returns a layer over `candidate` in which each declared method is
    /// replaced by its checked form; undeclared members read through. Nothing
    /// is returned if any method is missing or mismatched.
    pub fn apply(&self, candidate: &Object) -> Result<Object> {
        let mut ducked = Object::layered_over(candidate);
        for (name, contract) in &self.methods {
            let method = candidate
                .method(name)
                .ok_or_else(|| QuackError::missing_method(name))?;
            ducked.insert(name.as_str(), contract.apply(method)?);
        }
        tracing::debug!(methods = self.methods.len(), "object satisfies duck contract");
        Ok(ducked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::quackable;
    use crate::value::Value;

    fn identity() -> Callable {
        Callable::new(|args| Ok(args.into_iter().next().unwrap_or_default()))
    }

    #[test]
    fn test_compatible_annotation_returns_same_callable() {
        let f = quackable("(i: number) => number").unwrap().annotate(&identity());
        let checked = expect_quack("(i:number)=>number", false)
            .unwrap()
            .apply(&f)
            .unwrap();
        assert!(checked.same_identity(&f));
    }

    #[test]
    fn test_strict_rewraps_compatible_annotation() {
        let f = quackable("(i: number) => number").unwrap().annotate(&identity());
        let checked = expect_quack("(i: number) => number", true)
            .unwrap()
            .apply(&f)
            .unwrap();
        assert!(!checked.same_identity(&f));
        assert!(checked.call(vec![Value::from("x")]).is_err());
    }

    #[test]
    fn test_unannotated_always_wrapped() {
        for strict in [false, true] {
            let f = identity();
            let checked = expect_quack("(i: number) => number", strict)
                .unwrap()
                .apply(&f)
                .unwrap();
            assert!(!checked.same_identity(&f));
            assert_eq!(checked.call(vec![Value::from(3)]).unwrap(), Value::from(3));
        }
    }

    #[test]
    fn test_mismatch_message_names_both_signatures() {
        let f = quackable("(i:number) => number").unwrap().annotate(&identity());
        let err = expect_quack("(i:string) => number", false)
            .unwrap()
            .apply(&f)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Function does not match expected quack"));
        assert!(message.contains("(i: string) => number"));
        assert!(message.contains("(i: number) => number"));
    }

    #[test]
    fn test_contract_rejects_misordered_expected_signature() {
        let err = expect_quack("(a?: number, b: string) => void", false).unwrap_err();
        assert!(err.is_construction_error());
    }

    #[test]
    fn test_duck_missing_method() {
        let contract = expect_duck([("foo", "(i:number)=>number")], false).unwrap();
        let err = contract
            .apply(&Object::new().with("bar", identity()))
            .unwrap_err();
        assert!(matches!(err, QuackError::MissingMethod { ref name } if name == "foo"));

        let err = contract
            .apply(&Object::new().with("foo", 1))
            .unwrap_err();
        assert!(matches!(err, QuackError::MissingMethod { .. }));
    }

    #[test]
    fn test_duck_rejects_duplicate_method_names() {
        let err = expect_duck(
            [("foo", "(i: number) => number"), ("foo", "(s: string) => string")],
            false,
        )
        .unwrap_err();
        assert!(matches!(err, QuackError::InvalidUsage(ref m) if m.contains("`foo`")));
    }

    #[test]
    fn test_duck_layers_over_candidate() {
        let candidate = Object::new()
            .with("foo", identity())
            .with("label", "duck");
        let ducked = expect_duck([("foo", "(i:number)=>number")], false)
            .unwrap()
            .apply(&candidate)
            .unwrap();
        assert!(ducked.is_overridden("foo"));
        assert_eq!(ducked.get("label"), Some(&Value::from("duck")));
        assert!(ducked.call("foo", vec![Value::from("bad")]).is_err());
        assert!(candidate
            .call("foo", vec![Value::from("bad")])
            .is_ok());
    }
}
