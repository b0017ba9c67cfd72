//! # movecodec-bcs
//!
//! Type-tag driven BCS decoding of Move script-function arguments.
//!
//! ## Implementation notes
//! - Argument bytes carry no type information; the resolved parameter's
//!   `TypeTag` is the schema
//! - `vector<T>` is a ULEB128 element count followed by the elements
//! - struct-typed values decode one value per generic type parameter only
//! - a failure fails the whole argument; the raw hex is shown instead

pub mod batch;
pub mod call_decoder;
pub mod config;
pub mod decoder;
pub mod payload;

pub use batch::{chunked_decode_calls, parallel_decode_calls, parallel_format_arguments, CallJob};
pub use call_decoder::ScriptFunctionDecoder;
pub use config::{DecoderConfig, SignerPolicy};
pub use decoder::{hex_to_bytes, TypeTagValueDecoder};
pub use payload::decode_script_function_payload;
