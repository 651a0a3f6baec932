//! Cursor over a bitstring, used by the framer to consume fields in order.

use crate::errors::ReadError;

pub struct BitReader<'a> {
    bits: &'a str,
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// `bits` must only contain '0' and '1' (e.g. [crate::bitstring::BitString::as_str]).
    pub fn new(bits: &'a str) -> Self {
        Self { bits, bit_pos: 0 }
    }

    /// Returns the next `n` bits and advances past them.
    pub fn read_bits(&mut self, n: usize) -> Result<&'a str, ReadError> {
        let slice = self.read_bits_at(self.bit_pos, n)?;
        self.bit_pos += n;
        Ok(slice)
    }

    /// Returns `n` bits starting at `bit_pos` without moving the cursor.
    pub fn read_bits_at(&self, bit_pos: usize, n: usize) -> Result<&'a str, ReadError> {
        let remaining = self.bits.len().saturating_sub(bit_pos);
        if n > remaining {
            return Err(ReadError::OutOfBounds {
                needed: n,
                remaining,
            });
        }

        Ok(&self.bits[bit_pos..bit_pos + n])
    }
}
