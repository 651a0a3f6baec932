//! Bit field codecs: boolean, fixed-width unsigned integer and fixed-width integer list.
//!
//! Encoders produce a [BitString] of exactly the declared width. Decoders take
//! a slice whose length is already known from the schema.

use crate::{
    bitstring::{BitString, check_bits},
    errors::{BitsError, ContractViolation},
};

/// Returns true if `value` is representable in `width` unsigned bits.
pub fn fits(value: u64, width: usize) -> bool {
    width >= 64 || value >> width == 0
}

pub fn encode_boolean(value: bool) -> BitString {
    let mut bits = BitString::with_capacity(1);
    bits.push_bit(value);
    bits
}

/// Decodes a single-bit slice. Anything but "0" or "1" is malformed.
pub fn decode_boolean(bits: &str) -> Result<bool, BitsError> {
    match bits {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => {
            check_bits(bits)?;
            Err(BitsError::LengthMismatch {
                expected: 1,
                actual: bits.len(),
            })
        }
    }
}

/// Big-endian representation of `value`, left-padded to `width` bits.
pub fn encode_fixed_integer(value: u64, width: usize) -> Result<BitString, ContractViolation> {
    if !fits(value, width) {
        return Err(ContractViolation::OutOfRange { value, width });
    }

    let mut bits = BitString::with_capacity(width);
    bits.push_bits(value, width);
    Ok(bits)
}

/// Parses `bits` as an unsigned big-endian integer (max 64 bits).
pub fn decode_fixed_integer(bits: &str) -> Result<u64, BitsError> {
    if bits.len() > 64 {
        return Err(BitsError::TooManyBits(bits.len()));
    }

    let mut value = 0u64;
    for c in bits.chars() {
        let bit = match c {
            '0' => 0,
            '1' => 1,
            other => return Err(BitsError::NotABit(other)),
        };
        value = (value << 1) | bit;
    }

    Ok(value)
}

/// Concatenates the `element_width`-bit encodings of `values` in list order.
pub fn encode_fixed_integer_list(
    values: &[u64],
    element_width: usize,
) -> Result<BitString, ContractViolation> {
    let mut bits = BitString::with_capacity(values.len() * element_width);

    for &value in values {
        if !fits(value, element_width) {
            return Err(ContractViolation::OutOfRange {
                value,
                width: element_width,
            });
        }
        bits.push_bits(value, element_width);
    }

    Ok(bits)
}

/// Splits `bits` into `count` chunks of `element_width` bits and decodes each.
pub fn decode_fixed_integer_list(
    bits: &str,
    element_width: usize,
    count: usize,
) -> Result<Vec<u64>, BitsError> {
    let expected = element_width * count;
    if bits.len() != expected {
        return Err(BitsError::LengthMismatch {
            expected,
            actual: bits.len(),
        });
    }

    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let start = i * element_width;
        let chunk = bits
            .get(start..start + element_width)
            .ok_or(BitsError::LengthMismatch {
                expected,
                actual: bits.len(),
            })?;
        values.push(decode_fixed_integer(chunk)?);
    }

    Ok(values)
}
