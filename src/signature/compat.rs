//! Structural compatibility between signatures.
//!
//! Compatibility is exact structural equality with parameter names ignored:
//! no coercion, no variance, no reordering. It is reflexive and symmetric.

use super::ast::{FunctionSignature, ParameterType, ParsedType};

/// Whether `actual` has exactly the shape `expected` asks for.
pub fn compatible(expected: &FunctionSignature, actual: &FunctionSignature) -> bool {
    expected.is_async == actual.is_async
        && parameters_compatible(&expected.parameters, &actual.parameters)
        && types_compatible(&expected.returns, &actual.returns)
}

fn parameters_compatible(expected: &[ParameterType], actual: &[ParameterType]) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| e.optional == a.optional && types_compatible(&e.ty, &a.ty))
}

pub fn types_compatible(expected: &ParsedType, actual: &ParsedType) -> bool {
    match (expected, actual) {
        (ParsedType::Primitive(e), ParsedType::Primitive(a)) => e == a,
        (ParsedType::Array(e), ParsedType::Array(a)) => types_compatible(e, a),
        (ParsedType::Tuple(e), ParsedType::Tuple(a)) => {
            e.len() == a.len() && e.iter().zip(a).all(|(e, a)| types_compatible(e, a))
        }
        (ParsedType::Promise(e), ParsedType::Promise(a)) => types_compatible(e, a),
        (ParsedType::Function(e), ParsedType::Function(a)) => compatible(e, a),
        _ => false,
    }
}
