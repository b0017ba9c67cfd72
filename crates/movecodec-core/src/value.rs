//! Decoded Move values.
//!
//! `MoveValue` is the structured result of decoding an argument against its
//! type tag. Its `Display` impl is the human-readable form shown in place of
//! the raw hex argument.

use crate::types::StructTag;
use alloy_primitives::U256;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Address(Vec<u8>),
    Signer(Vec<u8>),
    Vector(Vec<MoveValue>),
    /// A struct header: the tag plus one decoded value per type parameter.
    /// Field values are not part of the decode.
    Struct {
        tag: StructTag,
        type_params: Vec<MoveValue>,
    },
}

impl MoveValue {
    /// `0x`-prefixed lowercase hex for address-like values.
    pub fn as_address_hex(&self) -> Option<String> {
        match self {
            MoveValue::Address(b) | MoveValue::Signer(b) => Some(format!("0x{}", hex::encode(b))),
            _ => None,
        }
    }

    /// Widen any unsigned integer that fits into a `u128`.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            MoveValue::U8(v) => Some(u128::from(*v)),
            MoveValue::U16(v) => Some(u128::from(*v)),
            MoveValue::U32(v) => Some(u128::from(*v)),
            MoveValue::U64(v) => Some(u128::from(*v)),
            MoveValue::U128(v) => Some(*v),
            MoveValue::U256(v) => u128::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[MoveValue]> {
        match self {
            MoveValue::Vector(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for MoveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveValue::Bool(v) => write!(f, "{v}"),
            MoveValue::U8(v) => write!(f, "{v}"),
            MoveValue::U16(v) => write!(f, "{v}"),
            MoveValue::U32(v) => write!(f, "{v}"),
            MoveValue::U64(v) => write!(f, "{v}"),
            MoveValue::U128(v) => write!(f, "{v}"),
            MoveValue::U256(v) => write!(f, "{v}"),
            MoveValue::Address(b) | MoveValue::Signer(b) => write!(f, "0x{}", hex::encode(b)),
            MoveValue::Vector(items) => {
                let parts: Vec<_> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            MoveValue::Struct { tag, type_params } => {
                write!(f, "{}", tag.qualified_name())?;
                if !type_params.is_empty() {
                    let parts: Vec<_> = type_params.iter().map(|x| x.to_string()).collect();
                    write!(f, "<{}>", parts.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// JSON form: small integers as numbers, 64-bit and wider as decimal strings
/// so JavaScript consumers keep full precision.
impl Serialize for MoveValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MoveValue::Bool(v) => serializer.serialize_bool(*v),
            MoveValue::U8(v) => serializer.serialize_u8(*v),
            MoveValue::U16(v) => serializer.serialize_u16(*v),
            MoveValue::U32(v) => serializer.serialize_u32(*v),
            MoveValue::U64(_)
            | MoveValue::U128(_)
            | MoveValue::U256(_)
            | MoveValue::Address(_)
            | MoveValue::Signer(_) => serializer.collect_str(self),
            MoveValue::Vector(items) => serializer.collect_seq(items),
            MoveValue::Struct { tag, type_params } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", &tag.to_string())?;
                map.serialize_entry("type_params", type_params)?;
                map.end()
            }
        }
    }
}
