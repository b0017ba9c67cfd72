//! `ByteCursor`: a forward-only BCS read position over a byte slice.
//!
//! Every read either consumes exactly the canonical number of bytes for the
//! value or fails without moving the cursor.

use crate::error::DecodeError;
use alloy_primitives::U256;

/// A ULEB128-encoded `u32` never needs more than five bytes.
const MAX_ULEB128_BYTES: usize = 5;

#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn underrun(&self, needed: usize) -> DecodeError {
        DecodeError::BufferUnderrun {
            needed,
            remaining: self.remaining(),
            offset: self.pos,
        }
    }

    /// Consume exactly `n` bytes.
    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(self.underrun(n));
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_fixed(N)?);
        Ok(out)
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        match self.rest().first() {
            None => Err(self.underrun(1)),
            Some(0) => {
                self.pos += 1;
                Ok(false)
            }
            Some(1) => {
                self.pos += 1;
                Ok(true)
            }
            Some(b) => Err(DecodeError::malformed(format!(
                "invalid bool byte 0x{b:02x} at offset {}",
                self.pos
            ))),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u128(&mut self) -> Result<u128, DecodeError> {
        Ok(u128::from_le_bytes(self.read_array()?))
    }

    pub fn read_u256(&mut self) -> Result<U256, DecodeError> {
        Ok(U256::from_le_slice(self.read_fixed(32)?))
    }

    /// Read a ULEB128 sequence length or enum variant index.
    ///
    /// BCS requires the minimal encoding and caps the value at `u32::MAX`.
    pub fn read_len(&mut self) -> Result<usize, DecodeError> {
        let mut value: u64 = 0;
        for (i, &byte) in self.rest().iter().take(MAX_ULEB128_BYTES).enumerate() {
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                if i > 0 && byte == 0 {
                    return Err(DecodeError::malformed(format!(
                        "non-canonical ULEB128 length at offset {}",
                        self.pos
                    )));
                }
                if value > u64::from(u32::MAX) {
                    return Err(DecodeError::malformed(format!(
                        "ULEB128 length {value} exceeds u32::MAX at offset {}",
                        self.pos
                    )));
                }
                self.pos += i + 1;
                return Ok(value as usize);
            }
        }
        if self.remaining() < MAX_ULEB128_BYTES {
            Err(self.underrun(self.remaining() + 1))
        } else {
            Err(DecodeError::malformed(format!(
                "ULEB128 length longer than {MAX_ULEB128_BYTES} bytes at offset {}",
                self.pos
            )))
        }
    }

    /// Read a length-prefixed byte sequence. On failure the length prefix is
    /// not consumed either.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let checkpoint = self.pos;
        let result = self.read_len().and_then(|len| self.read_fixed(len));
        if result.is_err() {
            self.pos = checkpoint;
        }
        result
    }

    /// Read a length-prefixed UTF-8 string (Move `Identifier`, `String`).
    pub fn read_string(&mut self) -> Result<&'a str, DecodeError> {
        let checkpoint = self.pos;
        let bytes = self.read_bytes()?;
        std::str::from_utf8(bytes).map_err(|e| {
            self.pos = checkpoint;
            DecodeError::malformed(format!("invalid UTF-8 at offset {checkpoint}: {e}"))
        })
    }

    /// Read a fixed-width account address.
    pub fn read_address(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.read_fixed(len)
    }
}
