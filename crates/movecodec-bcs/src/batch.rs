//! Rayon-powered batch helpers.
//!
//! Decoding is pure CPU work with no shared state, so calls and arguments
//! are decoded in parallel. Output order always matches input order.

use movecodec_core::{
    call::{DecodedCall, ResolvedFunction, ScriptFunctionCall},
    types::TypeTag,
};
use rayon::prelude::*;
use tracing::info;

use crate::call_decoder::ScriptFunctionDecoder;
use crate::decoder::TypeTagValueDecoder;

/// One call plus its resolved signature, if any.
#[derive(Debug, Clone)]
pub struct CallJob {
    pub call: ScriptFunctionCall,
    pub resolved: Option<ResolvedFunction>,
}

impl CallJob {
    pub fn new(call: ScriptFunctionCall, resolved: Option<ResolvedFunction>) -> Self {
        Self { call, resolved }
    }
}

/// Decode a slice of calls in parallel.
pub fn parallel_decode_calls(decoder: &ScriptFunctionDecoder, jobs: &[CallJob]) -> Vec<DecodedCall> {
    jobs.par_iter()
        .map(|job| decoder.decode_call(&job.call, job.resolved.as_ref()))
        .collect()
}

/// Chunk `jobs` into slices of at most `chunk_size` and decode each chunk
/// in parallel.
pub fn chunked_decode_calls(
    decoder: &ScriptFunctionDecoder,
    jobs: &[CallJob],
    chunk_size: usize,
) -> Vec<DecodedCall> {
    let mut out = Vec::with_capacity(jobs.len());
    for chunk in jobs.chunks(chunk_size.max(1)) {
        out.extend(parallel_decode_calls(decoder, chunk));
    }

    let failed: usize = out.iter().map(|c| c.decode_errors.len()).sum();
    info!(
        "batch decode complete: {} calls, {} argument errors",
        out.len(),
        failed
    );
    out
}

/// Format many `(hex argument, type tag)` pairs in parallel. `None` marks
/// arguments that should be shown raw.
pub fn parallel_format_arguments(
    decoder: &TypeTagValueDecoder,
    args: &[(String, TypeTag)],
) -> Vec<Option<String>> {
    args.par_iter()
        .map(|(hex_arg, tag)| decoder.format_argument(hex_arg, tag))
        .collect()
}
