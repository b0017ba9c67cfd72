//! # movecodec-observability
//!
//! Logging and metrics for MoveCodec.
//!
//! ## Built-in metrics
//! - `movecodec.calls_decoded`       counter, tagged with module
//! - `movecodec.arguments_decoded`   counter
//! - `movecodec.argument_fallbacks`  counter, tagged with reason
//! - `movecodec.decode_latency_ms`   histogram
//!
//! ## Structured logging
//! Text or JSON logs through `tracing-subscriber`, with levels configurable
//! per component.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::MoveCodecMetrics;
pub use tracing_setup::{init_tracing, try_init_tracing, LogConfig};
