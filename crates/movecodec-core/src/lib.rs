//! # movecodec-core
//!
//! Core types shared across all MoveCodec crates: the Move type-tag grammar,
//! the BCS byte cursor, decoded values, call/signature types and errors.

pub mod call;
pub mod cursor;
pub mod error;
pub mod resolver;
pub mod types;
pub mod value;

pub use call::{
    DecodedArgument, DecodedCall, FunctionId, ParameterDescriptor, ResolvedFunction,
    ScriptFunctionCall,
};
pub use cursor::ByteCursor;
pub use error::{DecodeError, ResolverError, TypeTagParseError};
pub use resolver::FunctionResolver;
pub use types::{PrimitiveKind, StructTag, TypeTag};
pub use value::MoveValue;
