//! `TypeTagValueDecoder`: decodes one BCS value against its type tag.
//!
//! BCS bytes are not self-describing; the type tag is the schema. The
//! decoder walks the tag recursively and consumes exactly the bytes that
//! belong to the value:
//! - primitives: fixed-width little-endian (`bool` is one byte, 0 or 1)
//! - `vector<T>`: ULEB128 element count followed by that many `T`s
//! - structs: one value per generic type parameter, in declaration order.
//!   Field layout is not known from the tag, so fields are not decoded.
//!
//! Elements that occupy no bytes (structs without type params) are charged
//! against a per-value budget equal to the input length, so nested vectors
//! of them cannot multiply the work.
//!
//! A failure anywhere in the recursion fails the whole value. Callers that
//! render arguments fall back to the raw hex (see [`TypeTagValueDecoder::format_argument`]).

use movecodec_core::{
    cursor::ByteCursor,
    error::DecodeError,
    types::{PrimitiveKind, TypeTag},
    value::MoveValue,
};
use tracing::{debug, trace};

use crate::config::DecoderConfig;

/// Stateless decoder; cheap to clone and safe to share across threads.
#[derive(Debug, Default, Clone)]
pub struct TypeTagValueDecoder {
    config: DecoderConfig,
}

impl TypeTagValueDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode the next value on `cursor` according to `tag`.
    ///
    /// Returns `Ok(None)` when `tag` contains an unsupported primitive; no
    /// bytes are consumed in that case.
    pub fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        tag: &TypeTag,
    ) -> Result<Option<MoveValue>, DecodeError> {
        if let Some(name) = tag.unsupported_name() {
            trace!(tag = %tag, unsupported = name, "type tag not decodable");
            return Ok(None);
        }
        let mut budget = cursor.remaining();
        self.decode_value(cursor, tag, 0, &mut budget).map(Some)
    }

    /// Like [`decode`](Self::decode), rendered as a display string.
    pub fn decode_display(
        &self,
        cursor: &mut ByteCursor<'_>,
        tag: &TypeTag,
    ) -> Result<Option<String>, DecodeError> {
        Ok(self.decode(cursor, tag)?.map(|v| v.to_string()))
    }

    /// Decode a complete argument buffer.
    ///
    /// Trailing bytes are tolerated: a struct-typed argument carries field
    /// bytes that the header-only struct decode does not consume.
    pub fn decode_bytes(&self, bytes: &[u8], tag: &TypeTag) -> Result<Option<MoveValue>, DecodeError> {
        let mut cursor = ByteCursor::new(bytes);
        let value = self.decode(&mut cursor, tag)?;
        if value.is_some() && !cursor.is_empty() {
            trace!(tag = %tag, trailing = cursor.remaining(), "bytes left after decode");
        }
        Ok(value)
    }

    /// Decode a `0x`-prefixed hex argument.
    pub fn decode_hex(&self, hex_arg: &str, tag: &TypeTag) -> Result<Option<MoveValue>, DecodeError> {
        let bytes = hex_to_bytes(hex_arg)?;
        self.decode_bytes(&bytes, tag)
    }

    /// Display string for a hex argument, or `None` when the raw argument
    /// should be shown instead. Errors are logged and never returned.
    pub fn format_argument(&self, hex_arg: &str, tag: &TypeTag) -> Option<String> {
        match self.decode_hex(hex_arg, tag) {
            Ok(value) => value.map(|v| v.to_string()),
            Err(e) => {
                debug!(tag = %tag, arg = hex_arg, error = %e, "argument decode failed, using raw value");
                None
            }
        }
    }

    fn decode_value(
        &self,
        cursor: &mut ByteCursor<'_>,
        tag: &TypeTag,
        depth: usize,
        budget: &mut usize,
    ) -> Result<MoveValue, DecodeError> {
        if depth >= self.config.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                max: self.config.max_depth,
            });
        }

        match tag {
            TypeTag::Primitive(kind) => self.decode_primitive(cursor, *kind),

            TypeTag::Vector(inner) => {
                let offset = cursor.position();
                let len = cursor.read_len()?;
                self.check_vector_len(cursor, inner, len, offset, budget)?;
                let mut items = Vec::with_capacity(len.min(cursor.remaining()));
                for _ in 0..len {
                    items.push(self.decode_value(cursor, inner, depth + 1, budget)?);
                }
                Ok(MoveValue::Vector(items))
            }

            TypeTag::Struct(s) => {
                let type_params = s
                    .type_params
                    .iter()
                    .map(|p| self.decode_value(cursor, p, depth + 1, budget))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MoveValue::Struct {
                    tag: (**s).clone(),
                    type_params,
                })
            }

            TypeTag::Unsupported(name) => Err(DecodeError::UnsupportedTypeTag { name: name.clone() }),
        }
    }

    fn decode_primitive(
        &self,
        cursor: &mut ByteCursor<'_>,
        kind: PrimitiveKind,
    ) -> Result<MoveValue, DecodeError> {
        Ok(match kind {
            PrimitiveKind::Bool => MoveValue::Bool(cursor.read_bool()?),
            PrimitiveKind::U8 => MoveValue::U8(cursor.read_u8()?),
            PrimitiveKind::U16 => MoveValue::U16(cursor.read_u16()?),
            PrimitiveKind::U32 => MoveValue::U32(cursor.read_u32()?),
            PrimitiveKind::U64 => MoveValue::U64(cursor.read_u64()?),
            PrimitiveKind::U128 => MoveValue::U128(cursor.read_u128()?),
            PrimitiveKind::U256 => MoveValue::U256(cursor.read_u256()?),
            PrimitiveKind::Address => {
                MoveValue::Address(cursor.read_address(self.config.address_length)?.to_vec())
            }
            PrimitiveKind::Signer => {
                MoveValue::Signer(cursor.read_address(self.config.address_length)?.to_vec())
            }
        })
    }

    /// Reject element counts the remaining buffer cannot possibly hold before
    /// decoding any element. Zero-width elements draw on `budget`, which is
    /// shared by every vector inside one top-level value.
    fn check_vector_len(
        &self,
        cursor: &ByteCursor<'_>,
        inner: &TypeTag,
        len: usize,
        offset: usize,
        budget: &mut usize,
    ) -> Result<(), DecodeError> {
        let width = self.min_width(inner);
        if width == 0 {
            if len > *budget {
                return Err(DecodeError::malformed(format!(
                    "vector length {len} at offset {offset} exceeds the remaining budget of {} zero-width elements",
                    *budget
                )));
            }
            *budget -= len;
            return Ok(());
        }
        let needed = len.saturating_mul(width);
        if needed > cursor.remaining() {
            return Err(DecodeError::BufferUnderrun {
                needed,
                remaining: cursor.remaining(),
                offset: cursor.position(),
            });
        }
        Ok(())
    }

    /// Lower bound on the encoded size of a value of type `tag`.
    fn min_width(&self, tag: &TypeTag) -> usize {
        match tag {
            TypeTag::Primitive(PrimitiveKind::Bool) => 1,
            TypeTag::Primitive(PrimitiveKind::Address | PrimitiveKind::Signer) => {
                self.config.address_length
            }
            TypeTag::Primitive(kind) => kind.int_width().unwrap_or(0),
            TypeTag::Vector(_) => 1,
            TypeTag::Struct(s) => s.type_params.iter().map(|p| self.min_width(p)).sum(),
            TypeTag::Unsupported(_) => 0,
        }
    }
}

/// Parse a hex argument, with or without the `0x` prefix.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, DecodeError> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| DecodeError::malformed(format!("invalid hex argument: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use movecodec_core::types::StructTag;
    use serde::Serialize;

    fn prim(kind: PrimitiveKind) -> TypeTag {
        TypeTag::Primitive(kind)
    }

    fn token(params: Vec<TypeTag>) -> TypeTag {
        TypeTag::struct_tag(StructTag::new("0x1", "Token", "Token", params))
    }

    fn display(bytes: &[u8], tag: &TypeTag) -> Option<String> {
        TypeTagValueDecoder::new()
            .decode_bytes(bytes, tag)
            .unwrap()
            .map(|v| v.to_string())
    }

    fn encoded<T: Serialize>(v: &T) -> Vec<u8> {
        bcs::to_bytes(v).unwrap()
    }

    fn assert_exact<T: Serialize>(tag: &TypeTag, v: &T, expected: String) {
        let bytes = encoded(v);
        let mut cursor = ByteCursor::new(&bytes);
        let out = TypeTagValueDecoder::new().decode_display(&mut cursor, tag).unwrap().unwrap();
        assert_eq!(out, expected, "{tag}");
        assert!(cursor.is_empty(), "{tag}: {} bytes left", cursor.remaining());
    }

    #[test]
    fn primitive_boundaries_consume_exactly_their_encoding() {
        for v in [false, true] {
            assert_exact(&prim(PrimitiveKind::Bool), &v, v.to_string());
        }
        for v in [0u8, 1, u8::MAX] {
            assert_exact(&prim(PrimitiveKind::U8), &v, v.to_string());
        }
        for v in [0u16, 1, u16::MAX] {
            assert_exact(&prim(PrimitiveKind::U16), &v, v.to_string());
        }
        for v in [0u32, 1, u32::MAX] {
            assert_exact(&prim(PrimitiveKind::U32), &v, v.to_string());
        }
        for v in [0u64, 1, u64::MAX] {
            assert_exact(&prim(PrimitiveKind::U64), &v, v.to_string());
        }
        for v in [0u128, 1, u128::MAX] {
            assert_exact(&prim(PrimitiveKind::U128), &v, v.to_string());
        }
        let mut one = [0u8; 16];
        one[15] = 1;
        for addr in [[0u8; 16], one, [0xFFu8; 16]] {
            let expected = format!("0x{}", hex::encode(addr));
            assert_exact(&prim(PrimitiveKind::Address), &addr, expected.clone());
            assert_exact(&prim(PrimitiveKind::Signer), &addr, expected);
        }
        // bcs has no native u256; the wire form is 32 little-endian bytes.
        for v in [U256::ZERO, U256::from(1u8), U256::MAX] {
            let bytes = v.to_le_bytes::<32>();
            let mut cursor = ByteCursor::new(&bytes);
            let out = TypeTagValueDecoder::new()
                .decode_display(&mut cursor, &prim(PrimitiveKind::U256))
                .unwrap()
                .unwrap();
            assert_eq!(out, v.to_string());
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn primitives_round_trip_through_bcs() {
        assert_eq!(display(&encoded(&true), &prim(PrimitiveKind::Bool)).unwrap(), "true");
        assert_eq!(display(&encoded(&false), &prim(PrimitiveKind::Bool)).unwrap(), "false");
        assert_eq!(display(&encoded(&255u8), &prim(PrimitiveKind::U8)).unwrap(), "255");
        assert_eq!(display(&encoded(&65_535u16), &prim(PrimitiveKind::U16)).unwrap(), "65535");
        assert_eq!(display(&encoded(&u32::MAX), &prim(PrimitiveKind::U32)).unwrap(), "4294967295");
        assert_eq!(
            display(&encoded(&u64::MAX), &prim(PrimitiveKind::U64)).unwrap(),
            "18446744073709551615"
        );
        assert_eq!(
            display(&encoded(&u128::MAX), &prim(PrimitiveKind::U128)).unwrap(),
            u128::MAX.to_string()
        );
    }

    #[test]
    fn u64_beyond_safe_integer_range() {
        let bytes = 1_000_000_000_000u64.to_le_bytes();
        assert_eq!(display(&bytes, &prim(PrimitiveKind::U64)).unwrap(), "1000000000000");
        let bytes = (1u64 << 53) + 1;
        assert_eq!(
            display(&bytes.to_le_bytes(), &prim(PrimitiveKind::U64)).unwrap(),
            "9007199254740993"
        );
    }

    #[test]
    fn u256_decodes_losslessly() {
        let value = U256::from(u128::MAX) * U256::from(3u8);
        let bytes = value.to_le_bytes::<32>();
        assert_eq!(display(&bytes, &prim(PrimitiveKind::U256)).unwrap(), value.to_string());
    }

    #[test]
    fn address_and_signer_are_fixed_width_hex() {
        let addr: [u8; 16] = [
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x0a, 0x55, 0x0c, 0x18,
        ];
        let bytes = encoded(&addr);
        assert_eq!(bytes.len(), 16);
        assert_eq!(
            display(&bytes, &prim(PrimitiveKind::Address)).unwrap(),
            "0x0000000000000000000000000a550c18"
        );
        assert_eq!(
            display(&bytes, &prim(PrimitiveKind::Signer)).unwrap(),
            "0x0000000000000000000000000a550c18"
        );
    }

    #[test]
    fn address_width_follows_config() {
        let decoder = TypeTagValueDecoder::with_config(DecoderConfig::default().address_length(32));
        let bytes = [0xABu8; 32];
        let v = decoder.decode_bytes(&bytes, &prim(PrimitiveKind::Address)).unwrap().unwrap();
        assert_eq!(v.to_string(), format!("0x{}", "ab".repeat(32)));
        assert!(decoder.decode_bytes(&bytes[..16], &prim(PrimitiveKind::Address)).is_err());
    }

    #[test]
    fn vector_of_u8() {
        let tag = TypeTag::vector(prim(PrimitiveKind::U8));
        assert_eq!(display(&[3, 1, 2, 3], &tag).unwrap(), "[1, 2, 3]");
        assert_eq!(display(&[0], &tag).unwrap(), "[]");
    }

    #[test]
    fn vector_advances_cursor_exactly() {
        let tag = TypeTag::vector(prim(PrimitiveKind::U64));
        let mut bytes = encoded(&vec![10u64, 20, 30, 40]);
        bytes.push(0xEE);
        let mut cursor = ByteCursor::new(&bytes);
        let out = TypeTagValueDecoder::new().decode_display(&mut cursor, &tag).unwrap().unwrap();
        assert_eq!(out, "[10, 20, 30, 40]");
        assert_eq!(out.split(", ").count(), 4);
        assert_eq!(cursor.position(), 1 + 4 * 8);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn nested_vectors() {
        let tag = TypeTag::vector(TypeTag::vector(prim(PrimitiveKind::Bool)));
        let bytes = encoded(&vec![vec![true, false], vec![], vec![true]]);
        assert_eq!(display(&bytes, &tag).unwrap(), "[[true, false], [], [true]]");
    }

    #[test]
    fn struct_decodes_type_params_in_order() {
        assert_eq!(display(&[5], &token(vec![prim(PrimitiveKind::U8)])).unwrap(), "0x1::Token::Token<5>");

        let tag = token(vec![prim(PrimitiveKind::U8), TypeTag::vector(prim(PrimitiveKind::U16))]);
        let bytes = encoded(&(7u8, vec![1u16, 2]));
        assert_eq!(display(&bytes, &tag).unwrap(), "0x1::Token::Token<7, [1, 2]>");
    }

    #[test]
    fn struct_without_params_reads_nothing() {
        let tag = TypeTag::struct_tag(StructTag::new("0x1", "STC", "STC", vec![]));
        let bytes = [9u8, 9, 9];
        let mut cursor = ByteCursor::new(&bytes);
        let out = TypeTagValueDecoder::new().decode_display(&mut cursor, &tag).unwrap().unwrap();
        assert_eq!(out, "0x1::STC::STC");
        assert!(!out.contains('<'));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn unsupported_tag_is_sentinel_and_consumes_nothing() {
        let tag = TypeTag::Unsupported("U512".into());
        let bytes = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(TypeTagValueDecoder::new().decode(&mut cursor, &tag).unwrap(), None);
        assert_eq!(cursor.position(), 0);

        let nested = TypeTag::vector(token(vec![TypeTag::Unsupported("Future".into())]));
        assert_eq!(TypeTagValueDecoder::new().decode_bytes(&bytes, &nested).unwrap(), None);
    }

    #[test]
    fn underrun_fails_whole_value() {
        let tag = TypeTag::vector(prim(PrimitiveKind::U64));
        // count says 2, only one u64 present
        let mut bytes = vec![2u8];
        bytes.extend_from_slice(&7u64.to_le_bytes());
        let err = TypeTagValueDecoder::new().decode_bytes(&bytes, &tag).unwrap_err();
        assert!(matches!(err, DecodeError::BufferUnderrun { .. }));
    }

    #[test]
    fn underrun_in_nested_struct_leaves_cursor_after_last_complete_read() {
        let tag = token(vec![prim(PrimitiveKind::U8), prim(PrimitiveKind::U64)]);
        let bytes = [5u8, 1, 2, 3];
        let mut cursor = ByteCursor::new(&bytes);
        let err = TypeTagValueDecoder::new().decode(&mut cursor, &tag).unwrap_err();
        assert_eq!(
            err,
            DecodeError::BufferUnderrun {
                needed: 8,
                remaining: 3,
                offset: 1
            }
        );
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn oversized_vector_count_fails_before_decoding_elements() {
        let tag = TypeTag::vector(prim(PrimitiveKind::U128));
        // ULEB128 for 1_000_000 followed by a single element
        let mut bytes = vec![0xC0, 0x84, 0x3D];
        bytes.extend_from_slice(&1u128.to_le_bytes());
        let mut cursor = ByteCursor::new(&bytes);
        let err = TypeTagValueDecoder::new().decode(&mut cursor, &tag).unwrap_err();
        assert!(matches!(err, DecodeError::BufferUnderrun { .. }));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn zero_width_elements_are_bounded_by_buffer() {
        let tag = TypeTag::vector(TypeTag::struct_tag(StructTag::new("0x1", "STC", "STC", vec![])));
        assert_eq!(display(&[2, 0xAA, 0xBB], &tag).unwrap(), "[0x1::STC::STC, 0x1::STC::STC]");
        let err = TypeTagValueDecoder::new().decode_bytes(&[0xFF, 0xFF, 0x03], &tag).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedInput { .. }));
    }

    #[test]
    fn nested_zero_width_vectors_share_one_budget() {
        let stc = TypeTag::struct_tag(StructTag::new("0x1", "STC", "STC", vec![]));
        let tag = TypeTag::vector(TypeTag::vector(stc));
        assert_eq!(
            display(&[2, 1, 1], &tag).unwrap(),
            "[[0x1::STC::STC], [0x1::STC::STC]]"
        );

        // 1000 inner vectors, each claiming 1000 elements: 2002 input bytes
        // would otherwise expand to a million struct values.
        let mut bytes = vec![0xE8, 0x07];
        for _ in 0..1000 {
            bytes.extend_from_slice(&[0xE8, 0x07]);
        }
        let err = TypeTagValueDecoder::new().decode_bytes(&bytes, &tag).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedInput { .. }));
    }

    #[test]
    fn invalid_bool_is_malformed() {
        let err = TypeTagValueDecoder::new()
            .decode_bytes(&[2], &prim(PrimitiveKind::Bool))
            .unwrap_err();
        assert!(matches!(err, DecodeError::MalformedInput { .. }));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let decoder = TypeTagValueDecoder::with_config(DecoderConfig::default().max_depth(2));
        let tag = TypeTag::vector(TypeTag::vector(prim(PrimitiveKind::U8)));
        let err = decoder.decode_bytes(&[1, 1, 7], &tag).unwrap_err();
        assert_eq!(err, DecodeError::DepthLimitExceeded { max: 2 });
    }

    #[test]
    fn format_argument_falls_back_on_any_failure() {
        let decoder = TypeTagValueDecoder::new();
        let u64_tag = prim(PrimitiveKind::U64);
        assert_eq!(
            decoder.format_argument("0x0010a5d4e8000000", &u64_tag).as_deref(),
            Some("1000000000000")
        );
        assert_eq!(decoder.format_argument("0x0102", &u64_tag), None);
        assert_eq!(decoder.format_argument("0xzz", &u64_tag), None);
        assert_eq!(decoder.format_argument("0x01", &TypeTag::Unsupported("U512".into())), None);
    }

    #[test]
    fn hex_prefix_is_optional() {
        assert_eq!(hex_to_bytes("0x0a0B").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(hex_to_bytes("0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(hex_to_bytes("0x").unwrap(), Vec::<u8>::new());
        assert!(hex_to_bytes("0xabc").is_err());
    }
}
