//! Raw transaction payload decoding.
//!
//! A Starcoin `TransactionPayload` is a BCS enum:
//!
//! | variant | name             | supported |
//! |---------|------------------|-----------|
//! | 0       | `Script`         | no        |
//! | 1       | `Package`        | no        |
//! | 2       | `ScriptFunction` | yes       |
//!
//! `ScriptFunction` is `{ module: { address, name }, function, ty_args: Vec<TypeTag>, args: Vec<Vec<u8>> }`.
//! Each argument stays BCS-encoded; decoding it needs the resolved signature.

use movecodec_core::{
    call::{FunctionId, ScriptFunctionCall},
    cursor::ByteCursor,
    error::DecodeError,
    types::{PrimitiveKind, StructTag, TypeTag},
};

use crate::config::DecoderConfig;

const PAYLOAD_SCRIPT: usize = 0;
const PAYLOAD_PACKAGE: usize = 1;
const PAYLOAD_SCRIPT_FUNCTION: usize = 2;

/// Decode a BCS `TransactionPayload` that must be a `ScriptFunction`.
pub fn decode_script_function_payload(
    bytes: &[u8],
    config: &DecoderConfig,
) -> Result<ScriptFunctionCall, DecodeError> {
    let mut cursor = ByteCursor::new(bytes);
    match cursor.read_len()? {
        PAYLOAD_SCRIPT_FUNCTION => {}
        PAYLOAD_SCRIPT => {
            return Err(DecodeError::UnsupportedPayload {
                variant: "Script".into(),
            })
        }
        PAYLOAD_PACKAGE => {
            return Err(DecodeError::UnsupportedPayload {
                variant: "Package".into(),
            })
        }
        other => return Err(DecodeError::malformed(format!("unknown payload variant {other}"))),
    }

    let address = short_address_hex(cursor.read_address(config.address_length)?);
    let module = cursor.read_string()?.to_string();
    let function = cursor.read_string()?.to_string();

    let ty_count = cursor.read_len()?;
    let ty_args = (0..ty_count)
        .map(|_| read_type_tag(&mut cursor, config, 0))
        .collect::<Result<Vec<_>, _>>()?;

    let arg_count = cursor.read_len()?;
    let args = (0..arg_count)
        .map(|_| cursor.read_bytes().map(|b| format!("0x{}", hex::encode(b))))
        .collect::<Result<Vec<_>, _>>()?;

    if !cursor.is_empty() {
        return Err(DecodeError::malformed(format!(
            "{} trailing bytes after payload",
            cursor.remaining()
        )));
    }

    Ok(ScriptFunctionCall {
        func: FunctionId::new(address, module, function),
        ty_args,
        args,
    })
}

/// Read a BCS-encoded `TypeTag`.
pub fn read_type_tag(
    cursor: &mut ByteCursor<'_>,
    config: &DecoderConfig,
    depth: usize,
) -> Result<TypeTag, DecodeError> {
    if depth >= config.max_depth {
        return Err(DecodeError::DepthLimitExceeded {
            max: config.max_depth,
        });
    }
    let offset = cursor.position();
    let tag = match cursor.read_len()? {
        0 => PrimitiveKind::Bool.into(),
        1 => PrimitiveKind::U8.into(),
        2 => PrimitiveKind::U64.into(),
        3 => PrimitiveKind::U128.into(),
        4 => PrimitiveKind::Address.into(),
        5 => PrimitiveKind::Signer.into(),
        6 => TypeTag::vector(read_type_tag(cursor, config, depth + 1)?),
        7 => {
            let address = short_address_hex(cursor.read_address(config.address_length)?);
            let module = cursor.read_string()?.to_string();
            let name = cursor.read_string()?.to_string();
            let count = cursor.read_len()?;
            let type_params = (0..count)
                .map(|_| read_type_tag(cursor, config, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            TypeTag::struct_tag(StructTag::new(address, module, name, type_params))
        }
        8 => PrimitiveKind::U16.into(),
        9 => PrimitiveKind::U32.into(),
        10 => PrimitiveKind::U256.into(),
        other => {
            return Err(DecodeError::malformed(format!(
                "unknown type tag variant {other} at offset {offset}"
            )))
        }
    };
    Ok(tag)
}

/// `0x`-prefixed hex with leading zeros stripped (`0x1`, `0xa550c18`).
pub fn short_address_hex(bytes: &[u8]) -> String {
    let full = hex::encode(bytes);
    let trimmed = full.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{trimmed}")
    }
}
