//! Duck-typed call contracts.
//!
//! Signatures are written in a small DSL (`"(i: number, j?: string) => boolean"`),
//! attached to callables as annotations, compared structurally, and compiled
//! into validating wrappers that check arguments and return values at call
//! time. Roles add nominal capabilities on top of structural guards.
//!
//! ```
//! use quackquack::{expect_quack, quackable, Callable, Value};
//!
//! let double = Callable::new(|args| {
//!     let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
//!     Ok(Value::from(n * 2.0))
//! });
//! let annotated = quackable("(n: number) => number")?.annotate(&double);
//!
//! let checked = expect_quack("(x: number) => number", false)?.apply(&annotated)?;
//! assert!(checked.same_identity(&annotated));
//!
//! let wrapped = expect_quack("(x: number) => number", false)?.apply(&double.rebind())?;
//! assert!(wrapped.call(vec![Value::from("two")]).is_err());
//! # Ok::<(), quackquack::QuackError>(())
//! ```

// Export modules for library usage
pub mod annotation;
pub mod cli;
pub mod config;
pub mod contract;
pub mod errors;
pub mod role;
pub mod schema;
pub mod signature;
pub mod value;

// Re-export commonly used types
pub use crate::annotation::{attach, is_quackable, lookup, quackable, Declaration, Quackable};
pub use crate::contract::{expect_duck, expect_quack, DuckContract, QuackContract};
pub use crate::errors::{ErrorCode, QuackError, Result};
pub use crate::role::{ensure_implements, role_aware, Protocol, Role, RoleAware, RoleId};
pub use crate::schema::{settle, FunctionSchema, Issue, IssuePath, Phase, ValidationError};
pub use crate::signature::{
    compatible, parse_signature, signature_of, FunctionSignature, ParameterType, ParsedType,
    PrimitiveType,
};
pub use crate::value::{Callable, CallableId, Object, Promise, Value};
