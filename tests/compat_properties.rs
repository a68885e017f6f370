//! Property-based tests for signature parsing and compatibility
//!
//! These tests verify invariants that should hold for all signatures:
//! - Compatibility is reflexive and symmetric
//! - Rendering a signature and parsing it back yields the same signature
//! - Renaming parameters never affects compatibility

use proptest::prelude::*;
use quackquack::{compatible, parse_signature, FunctionSignature, ParameterType, ParsedType, PrimitiveType};

fn primitive() -> impl Strategy<Value = ParsedType> {
    prop::sample::select(PrimitiveType::ALL.to_vec()).prop_map(ParsedType::Primitive)
}

fn parameter_name() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z_][a-z0-9_]{0,6}")
}

fn parameter(ty: impl Strategy<Value = ParsedType>) -> impl Strategy<Value = ParameterType> {
    (ty, any::<bool>(), parameter_name()).prop_map(|(ty, optional, name)| ParameterType {
        optional,
        ty,
        name,
    })
}

/// Required parameters first, optional ones after.
fn signature_from(
    ty: impl Strategy<Value = ParsedType> + Clone,
) -> impl Strategy<Value = FunctionSignature> {
    (
        any::<bool>(),
        prop::collection::vec(parameter(ty.clone()), 0..4),
        ty,
    )
        .prop_map(|(is_async, mut parameters, returns)| {
            parameters.sort_by_key(|p| p.optional);
            FunctionSignature {
                is_async,
                parameters,
                returns,
            }
        })
}

fn parsed_type() -> impl Strategy<Value = ParsedType> + Clone {
    primitive().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|element| ParsedType::Array(Box::new(element))),
            prop::collection::vec(inner.clone(), 0..3).prop_map(ParsedType::Tuple),
            inner.clone().prop_map(|inner| ParsedType::Promise(Box::new(inner))),
            signature_from(inner).prop_map(ParsedType::function),
        ]
    })
}

fn signature() -> impl Strategy<Value = FunctionSignature> {
    signature_from(parsed_type())
}

fn strip_names(signature: &FunctionSignature) -> FunctionSignature {
    FunctionSignature {
        parameters: signature
            .parameters
            .iter()
            .map(|p| ParameterType {
                name: None,
                ..p.clone()
            })
            .collect(),
        ..signature.clone()
    }
}

proptest! {
    #[test]
    fn prop_compatible_is_reflexive(sig in signature()) {
        prop_assert!(compatible(&sig, &sig));
    }

    #[test]
    fn prop_compatible_is_symmetric(a in signature(), b in signature()) {
        prop_assert_eq!(compatible(&a, &b), compatible(&b, &a));
    }

    #[test]
    fn prop_display_round_trips(sig in signature()) {
        let text = sig.to_string();
        let reparsed = parse_signature(&text).unwrap();
        prop_assert_eq!(reparsed, sig);
    }

    #[test]
    fn prop_names_do_not_affect_compatibility(sig in signature()) {
        prop_assert!(compatible(&sig, &strip_names(&sig)));
    }

    #[test]
    fn prop_async_flag_matters(sig in signature()) {
        let flipped = FunctionSignature { is_async: !sig.is_async, ..sig.clone() };
        prop_assert!(!compatible(&sig, &flipped));
    }
}
