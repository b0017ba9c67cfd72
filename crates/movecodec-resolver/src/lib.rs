//! # movecodec-resolver
//!
//! Function signature resolvers for MoveCodec.
//!
//! ## Levels
//! 1. **In-Memory Resolver**: loaded from JSON signature files or built in code
//! 2. **JSON-RPC Resolver** (feature `remote`): `contract.resolve_function` on a Starcoin node
//!
//! The public-facing API is the `FunctionResolver` trait from `movecodec-core`.

pub mod memory;
#[cfg(feature = "remote")]
pub mod remote;

pub use memory::MemoryResolver;

#[cfg(feature = "remote")]
pub use remote::JsonRpcResolver;
