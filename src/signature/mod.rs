//! Signature DSL: AST, parser and structural compatibility.

pub mod ast;
mod compat;
mod parser;

pub use ast::{FunctionSignature, ParameterType, ParsedType, PrimitiveType};
pub use compat::{compatible, types_compatible};
pub use parser::{parse_signature, signature_of};
