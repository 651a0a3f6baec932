//! URL-safe sextet encoding: six bits per character, no padding character.
//!
//! Unlike byte-oriented base64 the input is a bitstring of any length. It is
//! right-padded with '0' to a multiple of six before encoding, so decoding
//! yields the padded bitstring and the framer drops the trailing pad bits.

use crate::{bitstring::BitString, errors::DecodeError};

/// Alphabet, indexed by sextet value.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const INVALID: u8 = 0xff;

/// ASCII byte to sextet value, [INVALID] for characters outside the alphabet.
const REVERSE: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Sextet value of `c`, if it belongs to the alphabet.
pub fn index_of(c: char) -> Option<u8> {
    let code = c as usize;
    match REVERSE.get(code) {
        Some(&value) if value != INVALID => Some(value),
        _ => None,
    }
}

/// Encodes `bits`, padding the end with '0' to a whole number of sextets.
pub fn encode(bits: &BitString) -> String {
    let mut padded = bits.clone();
    padded.pad_to_multiple(6);

    padded
        .as_str()
        .as_bytes()
        .chunks(6)
        .map(|chunk| {
            let index = chunk
                .iter()
                .fold(0usize, |acc, &bit| (acc << 1) | usize::from(bit == b'1'));
            ALPHABET[index] as char
        })
        .collect()
}

/// Decodes `text` into its (padded) bitstring.
pub fn decode(text: &str) -> Result<BitString, DecodeError> {
    let mut bits = BitString::with_capacity(text.len() * 6);

    for (position, character) in text.chars().enumerate() {
        let value = index_of(character).ok_or(DecodeError::InvalidCharacter {
            character,
            position,
        })?;
        bits.push_bits(u64::from(value), 6);
    }

    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        BitString::parse(s).unwrap()
    }

    #[test]
    fn test_alphabet_indices() {
        assert_eq!(index_of('A'), Some(0));
        assert_eq!(index_of('a'), Some(26));
        assert_eq!(index_of('0'), Some(52));
        assert_eq!(index_of('-'), Some(62));
        assert_eq!(index_of('_'), Some(63));
        assert_eq!(index_of('+'), None);
        assert_eq!(index_of('/'), None);
        assert_eq!(index_of('é'), None);
    }

    #[test]
    fn test_encode_pads_to_sextet() {
        assert_eq!(encode(&bits("1101")), "0");
        assert_eq!(encode(&bits("110100")), "0");
        assert_eq!(encode(&bits("")), "");
    }

    #[test]
    fn test_encode_multiple_sextets() {
        assert_eq!(encode(&bits("000001000000")), "BA");
        assert_eq!(encode(&bits("1111111")), "_g");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("0").unwrap(), bits("110100"));
        assert_eq!(decode("BA").unwrap(), bits("000001000000"));
        assert_eq!(decode("").unwrap(), BitString::new());
    }

    #[test]
    fn test_decode_invalid_character() {
        assert_eq!(
            decode("BA=").unwrap_err(),
            DecodeError::InvalidCharacter {
                character: '=',
                position: 2
            }
        );
        assert_eq!(
            decode("B.A").unwrap_err(),
            DecodeError::InvalidCharacter {
                character: '.',
                position: 1
            }
        );
    }
}
