//! Script-function call decoder.
//!
//! Pairs each hex argument of a call with its declared parameter and decodes
//! it. Every argument is independent: one failing argument keeps its raw
//! value and never affects the others.
//!
//! # Parameter offset
//! Script functions usually declare a leading `signer` that the chain fills
//! in from the transaction sender, so argument `i` belongs to parameter
//! `i + 1`. [`SignerPolicy`] controls whether that offset is applied.

use movecodec_core::{
    call::{DecodedArgument, DecodedCall, ResolvedFunction, ScriptFunctionCall},
    error::DecodeError,
    resolver::FunctionResolver,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::{DecoderConfig, SignerPolicy};
use crate::decoder::TypeTagValueDecoder;
use crate::payload::decode_script_function_payload;

#[derive(Debug, Default, Clone)]
pub struct ScriptFunctionDecoder {
    values: TypeTagValueDecoder,
}

impl ScriptFunctionDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            values: TypeTagValueDecoder::with_config(config),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        self.values.config()
    }

    pub fn value_decoder(&self) -> &TypeTagValueDecoder {
        &self.values
    }

    /// Index of the parameter that argument 0 corresponds to.
    pub fn param_offset(&self, resolved: &ResolvedFunction) -> usize {
        match self.config().signer_policy {
            SignerPolicy::Auto => usize::from(resolved.first_is_signer()),
            SignerPolicy::AlwaysSkip => 1,
            SignerPolicy::Never => 0,
        }
    }

    /// Decode every argument of `call`.
    ///
    /// Without a resolved signature all arguments are returned raw.
    pub fn decode_call(
        &self,
        call: &ScriptFunctionCall,
        resolved: Option<&ResolvedFunction>,
    ) -> DecodedCall {
        let offset = resolved.map_or(0, |r| self.param_offset(r));
        if let Some(r) = resolved {
            let declared = r.args.len().saturating_sub(offset);
            if declared != call.args.len() {
                debug!(
                    func = %call.func,
                    declared,
                    supplied = call.args.len(),
                    "argument count differs from signature"
                );
            }
        }

        let mut decode_errors = BTreeMap::new();
        let arguments = call
            .args
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let param = resolved.and_then(|r| r.args.get(index + offset)).cloned();
                let value = param.as_ref().and_then(|p| {
                    match self.values.decode_hex(raw, &p.type_tag) {
                        Ok(value) => value,
                        Err(e) => {
                            debug!(
                                func = %call.func,
                                index,
                                param = %p.name,
                                kind = e.kind(),
                                error = %e,
                                "argument decode failed, keeping raw value"
                            );
                            decode_errors.insert(index, e.to_string());
                            None
                        }
                    }
                });
                DecodedArgument {
                    index,
                    raw: raw.clone(),
                    param,
                    value,
                }
            })
            .collect();

        DecodedCall {
            func: call.func.clone(),
            ty_args: call.ty_args.clone(),
            arguments,
            decode_errors,
        }
    }

    /// Resolve the call's signature through `resolver`, then decode.
    ///
    /// Resolver failures are logged and leave every argument raw.
    pub async fn decode_call_with(
        &self,
        resolver: &dyn FunctionResolver,
        call: &ScriptFunctionCall,
    ) -> DecodedCall {
        let resolved = match resolver.resolve_function(&call.func).await {
            Ok(Some(r)) => Some(r),
            Ok(None) => {
                debug!(func = %call.func, "function not known to resolver");
                None
            }
            Err(e) => {
                warn!(func = %call.func, error = %e, "function resolution failed");
                None
            }
        };
        self.decode_call(call, resolved.as_ref())
    }

    /// Decode a raw BCS `TransactionPayload` and its arguments.
    pub fn decode_payload(
        &self,
        payload: &[u8],
        resolved: Option<&ResolvedFunction>,
    ) -> Result<DecodedCall, DecodeError> {
        let call = decode_script_function_payload(payload, self.config())?;
        Ok(self.decode_call(&call, resolved))
    }
}
