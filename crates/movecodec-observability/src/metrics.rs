//! MoveCodec metrics definitions.
//!
//! All metrics use OpenTelemetry conventions. Without an installed meter
//! provider the global meter is a no-op.

use movecodec_core::call::DecodedCall;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Central metrics handle for MoveCodec.
#[derive(Clone)]
pub struct MoveCodecMetrics {
    pub calls_decoded: Counter<u64>,
    pub arguments_decoded: Counter<u64>,
    pub argument_fallbacks: Counter<u64>,
    pub decode_latency_ms: Histogram<f64>,
}

impl MoveCodecMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            calls_decoded: meter
                .u64_counter("movecodec.calls_decoded")
                .with_description("Script-function calls passed through the decoder")
                .init(),
            arguments_decoded: meter
                .u64_counter("movecodec.arguments_decoded")
                .with_description("Arguments rendered from their decoded value")
                .init(),
            argument_fallbacks: meter
                .u64_counter("movecodec.argument_fallbacks")
                .with_description("Arguments shown raw instead of decoded")
                .init(),
            decode_latency_ms: meter
                .f64_histogram("movecodec.decode_latency_ms")
                .with_description("Time to decode one call in milliseconds")
                .init(),
        }
    }

    /// Metrics bound to the global meter provider.
    pub fn global() -> Self {
        Self::new(&global::meter("movecodec"))
    }

    /// Record the outcome of one decoded call.
    pub fn record_call(&self, call: &DecodedCall, latency_ms: f64) {
        let module = KeyValue::new("module", call.func.module.clone());
        self.calls_decoded.add(1, &[module.clone()]);
        self.decode_latency_ms.record(latency_ms, &[module]);

        for arg in &call.arguments {
            if arg.is_decoded() {
                self.arguments_decoded.add(1, &[]);
                continue;
            }
            let reason = if arg.param.is_none() {
                "unresolved"
            } else if call.decode_errors.contains_key(&arg.index) {
                "decode_error"
            } else {
                "unsupported"
            };
            self.argument_fallbacks
                .add(1, &[KeyValue::new("reason", reason)]);
        }
    }
}
