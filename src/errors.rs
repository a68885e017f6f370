//! Shared error type for quackquack operations.
//!
//! Every failure the crate can produce is a [`QuackError`]. The type is
//! `Clone` because errors travel through shared promises: an async contract
//! wrapper rejects with the same error for every holder of its promise.
//!
//! # Error Codes
//!
//! Error codes are assigned by category:
//! - Q001-Q009: signature parsing
//! - Q010-Q019: contract enforcement (mismatch, missing method)
//! - Q020-Q029: runtime validation and errors raised by wrapped callables
//! - Q030-Q039: annotation usage
//! - Q040-Q049: roles
//! - Q050-Q059: definition-time construction errors

use crate::schema::ValidationError;
use crate::signature::FunctionSignature;
use serde::Serialize;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Malformed signature text
    pub const PARSE_SYNTAX: ErrorCode = ErrorCode("Q001");

    /// Annotated signature does not match the expected one
    pub const CONTRACT_MISMATCH: ErrorCode = ErrorCode("Q010");
    /// Declared method absent or not callable
    pub const CONTRACT_MISSING_METHOD: ErrorCode = ErrorCode("Q011");

    /// Argument or return value rejected by a compiled schema
    pub const VALIDATION_FAILED: ErrorCode = ErrorCode("Q020");
    /// Error raised by the wrapped callable itself
    pub const CALL_RAISED: ErrorCode = ErrorCode("Q021");

    /// Unrecognized annotation call shape
    pub const ANNOTATION_INVALID_USAGE: ErrorCode = ErrorCode("Q030");

    /// Required role not attached
    pub const ROLE_NOT_IMPLEMENTED: ErrorCode = ErrorCode("Q040");

    /// Required parameter declared after an optional one
    pub const CONSTRUCTION_PARAMETER_ORDER: ErrorCode = ErrorCode("Q050");
    /// Role guard admits non-method members
    pub const CONSTRUCTION_ROLE_GUARD: ErrorCode = ErrorCode("Q051");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Main error type for quackquack operations
#[derive(Debug, Clone, Error)]
pub enum QuackError {
    /// Signature text rejected by the parser
    #[error("Parse error at offset {offset} in `{input}`: {message}")]
    Parse {
        input: String,
        offset: usize,
        message: String,
    },

    /// An annotated callable declares a signature incompatible with the expected one
    #[error("Function does not match expected quack.\nExpected: {expected}\nGot: {actual}")]
    SignatureMismatch {
        expected: FunctionSignature,
        actual: FunctionSignature,
    },

    #[error("Method {name} is missing from the object.")]
    MissingMethod { name: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Error raised by a wrapped callable, forwarded untouched
    #[error("{0}")]
    Raised(String),

    #[error("Invalid usage of quackable: {0}")]
    InvalidUsage(String),

    #[error("Object does not implement required role: {role}")]
    RoleNotImplemented { role: String },

    /// Definition-time failure: a required parameter follows an optional one
    #[error("Required parameter '{index}' cannot follow optional ones")]
    ParameterOrder { index: usize },

    /// Definition-time failure: a role guard admitted a non-method member
    #[error("Role \"{role}\" must only contain methods. Key \"{key}\" is not a function.")]
    RoleConstruction { role: String, key: String },
}

impl QuackError {
    /// Create a parse error pointing at `offset` within `input`
    pub fn parse(input: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            offset,
            message: message.into(),
        }
    }

    pub fn missing_method(name: impl Into<String>) -> Self {
        Self::MissingMethod { name: name.into() }
    }

    /// Create the error a wrapped callable uses to signal its own failure
    pub fn raised(message: impl Into<String>) -> Self {
        Self::Raised(message.into())
    }

    pub fn invalid_usage(message: impl Into<String>) -> Self {
        Self::InvalidUsage(message.into())
    }

    /// Get the structured error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { .. } => ErrorCode::PARSE_SYNTAX,
            Self::SignatureMismatch { .. } => ErrorCode::CONTRACT_MISMATCH,
            Self::MissingMethod { .. } => ErrorCode::CONTRACT_MISSING_METHOD,
            Self::Validation(_) => ErrorCode::VALIDATION_FAILED,
            Self::Raised(_) => ErrorCode::CALL_RAISED,
            Self::InvalidUsage(_) => ErrorCode::ANNOTATION_INVALID_USAGE,
            Self::RoleNotImplemented { .. } => ErrorCode::ROLE_NOT_IMPLEMENTED,
            Self::ParameterOrder { .. } => ErrorCode::CONSTRUCTION_PARAMETER_ORDER,
            Self::RoleConstruction { .. } => ErrorCode::CONSTRUCTION_ROLE_GUARD,
        }
    }

    /// Whether the error is raised while a contract or role is being defined,
    /// as opposed to while a wrapped callable is being invoked.
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::ParameterOrder { .. } | Self::RoleConstruction { .. }
        )
    }

    /// Borrow the validation details, if this is a validation failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, QuackError>;
