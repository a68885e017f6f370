//! Closed data model for parsed signatures.
//!
//! Signatures are immutable once parsed. Derived equality is exact, parameter
//! names included; use [`compatible`](super::compatible) to compare shapes.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Void,
    /// Accepts anything.
    Dontcare,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 7] = [
        PrimitiveType::Number,
        PrimitiveType::String,
        PrimitiveType::Boolean,
        PrimitiveType::Null,
        PrimitiveType::Undefined,
        PrimitiveType::Void,
        PrimitiveType::Dontcare,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveType::Number => "number",
            PrimitiveType::String => "string",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
            PrimitiveType::Undefined => "undefined",
            PrimitiveType::Void => "void",
            PrimitiveType::Dontcare => "dontcare",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == word)
    }
}

/// A type in the signature grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParsedType {
    Primitive(PrimitiveType),
    Array(Box<ParsedType>),
    Tuple(Vec<ParsedType>),
    Promise(Box<ParsedType>),
    /// Type of a callable-valued parameter. Never validated beyond callability.
    Function(Box<FunctionSignature>),
}

impl ParsedType {
    pub fn array(element: impl Into<ParsedType>) -> Self {
        ParsedType::Array(Box::new(element.into()))
    }

    pub fn tuple<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ParsedType>,
    {
        ParsedType::Tuple(elements.into_iter().map(Into::into).collect())
    }

    pub fn promise(inner: impl Into<ParsedType>) -> Self {
        ParsedType::Promise(Box::new(inner.into()))
    }

    pub fn function(signature: FunctionSignature) -> Self {
        ParsedType::Function(Box::new(signature))
    }
}

impl From<PrimitiveType> for ParsedType {
    fn from(primitive: PrimitiveType) -> Self {
        ParsedType::Primitive(primitive)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParameterType {
    pub optional: bool,
    #[serde(rename = "type")]
    pub ty: ParsedType,
    /// Diagnostic only; ignored by compatibility checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ParameterType {
    pub fn required(ty: impl Into<ParsedType>) -> Self {
        Self {
            optional: false,
            ty: ty.into(),
            name: None,
        }
    }

    pub fn optional(ty: impl Into<ParsedType>) -> Self {
        Self {
            optional: true,
            ty: ty.into(),
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Root of a parsed signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub is_async: bool,
    pub parameters: Vec<ParameterType>,
    pub returns: ParsedType,
}

impl FunctionSignature {
    pub fn new(parameters: Vec<ParameterType>, returns: impl Into<ParsedType>) -> Self {
        Self {
            is_async: false,
            parameters,
            returns: returns.into(),
        }
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn required_arity(&self) -> usize {
        self.parameters.iter().filter(|p| !p.optional).count()
    }
}

// Serialized shape: primitives as bare keywords, composites tagged by `type`.
impl Serialize for ParsedType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParsedType::Primitive(primitive) => primitive.serialize(serializer),
            ParsedType::Array(element) => {
                let mut state = serializer.serialize_struct("ArrayType", 2)?;
                state.serialize_field("type", "array")?;
                state.serialize_field("element", element)?;
                state.end()
            }
            ParsedType::Tuple(elements) => {
                let mut state = serializer.serialize_struct("TupleType", 2)?;
                state.serialize_field("type", "tuple")?;
                state.serialize_field("elements", elements)?;
                state.end()
            }
            ParsedType::Promise(inner) => {
                let mut state = serializer.serialize_struct("PromiseType", 2)?;
                state.serialize_field("type", "promise")?;
                state.serialize_field("inner", inner)?;
                state.end()
            }
            ParsedType::Function(signature) => signature.serialize(serializer),
        }
    }
}

impl Serialize for FunctionSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FunctionType", 4)?;
        state.serialize_field("type", "function")?;
        state.serialize_field("async", &self.is_async)?;
        state.serialize_field("parameters", &self.parameters)?;
        state.serialize_field("return", &self.returns)?;
        state.end()
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for ParsedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedType::Primitive(primitive) => fmt::Display::fmt(primitive, f),
            // `(number) => string[]` would read as an array return type
            ParsedType::Array(element) if matches!(**element, ParsedType::Function(_)) => {
                write!(f, "Array<{element}>")
            }
            ParsedType::Array(element) => write!(f, "{element}[]"),
            ParsedType::Tuple(elements) => {
                f.write_str("[")?;
                write_separated(f, elements)?;
                f.write_str("]")
            }
            ParsedType::Promise(inner) => write!(f, "Promise<{inner}>"),
            ParsedType::Function(signature) => fmt::Display::fmt(signature, f),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, self.optional) {
            (Some(name), false) => write!(f, "{name}: {}", self.ty),
            (Some(name), true) => write!(f, "{name}?: {}", self.ty),
            (None, false) => write!(f, "{}", self.ty),
            (None, true) => write!(f, "{}?", self.ty),
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_async {
            f.write_str("async ")?;
        }
        f.write_str("(")?;
        write_separated(f, &self.parameters)?;
        write!(f, ") => {}", self.returns)
    }
}

fn write_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt(f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> FunctionSignature {
        FunctionSignature::new(
            vec![
                ParameterType::required(PrimitiveType::Number).named("i"),
                ParameterType::optional(ParsedType::array(PrimitiveType::String)).named("j"),
            ],
            PrimitiveType::Boolean,
        )
    }

    #[test]
    fn test_display_renders_dsl() {
        assert_eq!(sample().to_string(), "(i: number, j?: string[]) => boolean");
        let nested = FunctionSignature::new(
            vec![
                ParameterType::optional(PrimitiveType::Number),
                ParameterType::optional(ParsedType::tuple([
                    PrimitiveType::Null,
                    PrimitiveType::Undefined,
                ])),
            ],
            ParsedType::promise(PrimitiveType::Void),
        )
        .asynchronous();
        assert_eq!(
            nested.to_string(),
            "async (number?, [null, undefined]?) => Promise<void>"
        );
    }

    #[test]
    fn test_serialized_shape() {
        let sig = FunctionSignature::new(
            vec![ParameterType::optional(PrimitiveType::Number)],
            PrimitiveType::String,
        );
        assert_eq!(
            serde_json::to_value(&sig).unwrap(),
            json!({
                "type": "function",
                "async": false,
                "parameters": [{"optional": true, "type": "number"}],
                "return": "string"
            })
        );
        assert_eq!(
            serde_json::to_value(ParsedType::array(PrimitiveType::Dontcare)).unwrap(),
            json!({"type": "array", "element": "dontcare"})
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(sample().arity(), 2);
        assert_eq!(sample().required_arity(), 1);
    }

    #[test]
    fn test_keyword_round_trip() {
        for primitive in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_keyword(primitive.keyword()), Some(primitive));
        }
        assert_eq!(PrimitiveType::from_keyword("Promise"), None);
    }
}
