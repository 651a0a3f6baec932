//! Owned sequence of '0'/'1' characters.
//!
//! Bits are ordered MSB-first: index 0 is the most significant bit of the
//! first field in a segment.

use std::{fmt, str::FromStr};

use crate::errors::BitsError;

/// A string that only ever contains '0' and '1'.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString(String);

impl BitString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        BitString(String::with_capacity(bits))
    }

    /// Validates `bits` and copies it into a new [BitString].
    pub fn parse(bits: &str) -> Result<Self, BitsError> {
        check_bits(bits)?;
        Ok(BitString(bits.to_string()))
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.0.push(if bit { '1' } else { '0' });
    }

    pub fn append(&mut self, other: &BitString) {
        self.0.push_str(&other.0);
    }

    /// Appends the low `width` bits of `value`, MSB-first.
    pub(crate) fn push_bits(&mut self, value: u64, width: usize) {
        for shift in (0..width).rev() {
            self.push_bit((value >> shift) & 1 == 1);
        }
    }

    /// Right-pads with '0' until the length is a multiple of `n`.
    pub fn pad_to_multiple(&mut self, n: usize) {
        if n == 0 {
            return;
        }

        let rem = self.len() % n;
        if rem != 0 {
            for _ in 0..(n - rem) {
                self.0.push('0');
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fails on the first character that is not '0' or '1'.
pub(crate) fn check_bits(bits: &str) -> Result<(), BitsError> {
    match bits.chars().find(|c| *c != '0' && *c != '1') {
        Some(c) => Err(BitsError::NotABit(c)),
        None => Ok(()),
    }
}

impl FromStr for BitString {
    type Err = BitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BitString::parse(s)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BitString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_non_bits() {
        assert_eq!(BitString::parse("0120"), Err(BitsError::NotABit('2')));
        assert_eq!(BitString::parse("").unwrap(), BitString::new());
    }

    #[test]
    fn test_push_bits() {
        let mut bits = BitString::new();
        bits.push_bit(true);
        bits.push_bits(5, 3);
        assert_eq!(bits.as_str(), "1101");
    }

    #[test]
    fn test_pad_to_multiple() {
        let mut bits: BitString = "1101".parse().unwrap();
        bits.pad_to_multiple(6);
        assert_eq!(bits.as_str(), "110100");

        bits.pad_to_multiple(6);
        assert_eq!(bits.len(), 6);
    }
}
