//! The function signature resolver seam.
//!
//! Decoding an argument needs the declared type of its parameter, which lives
//! on chain. Concrete resolvers live in `movecodec-resolver`.

use crate::call::{FunctionId, ResolvedFunction};
use crate::error::ResolverError;
use async_trait::async_trait;

/// Looks up the declared parameters of a module function.
///
/// `Ok(None)` means the resolver answered but does not know the function.
#[async_trait]
pub trait FunctionResolver: Send + Sync {
    async fn resolve_function(
        &self,
        id: &FunctionId,
    ) -> Result<Option<ResolvedFunction>, ResolverError>;
}
