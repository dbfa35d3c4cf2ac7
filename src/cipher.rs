//! # Cipher Transforms
//!
//! Reversible transforms applied to a message before it is hidden in an
//! image and inverted after it is recovered. None of these methods provide
//! real confidentiality; they obfuscate the payload so a casual LSB dump
//! does not read as plain text.
//!
//! ## Methods
//!
//! - `none`: identity in both directions
//! - `base64`: standard-alphabet base64 with padding
//! - `reverse`: byte-order reversal (self-inverse)
//! - `caesar`: rotates ASCII letters by a shift parsed from the key
//!   (default 3), wrapping within each case's alphabet
//! - `xor`: XORs each byte with the key bytes, cycling the key
//!   (self-inverse, requires a non-empty key)
//!
//! Every transform is a pure function over byte slices. Text enters the
//! pipeline as UTF-8 bytes and [`invert`] hands the original bytes back;
//! intermediate ciphertext (`reverse`, `xor`) is not in general valid
//! UTF-8, which is why the contract is byte-level.

use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rotation used by the caesar method when the key names no other.
const DEFAULT_CAESAR_SHIFT: i64 = 3;

/// Errors produced while applying or inverting a cipher.
#[derive(Debug, Error)]
pub enum CipherError {
    /// A key-requiring method was invoked with an empty key.
    #[error("the {0} cipher requires a non-empty key")]
    MissingKey(CipherMethod),

    /// The input was not valid base64 during inversion.
    #[error("invalid base64 ciphertext: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// The selectable cipher methods.
///
/// The same method and key must be used for embedding and recovery;
/// `caesar` embeds with `+shift` and recovers with `-shift`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CipherMethod {
    /// Leave the message untouched.
    #[default]
    None,
    /// Standard base64 encoding.
    Base64,
    /// Reverse the message bytes.
    Reverse,
    /// Rotate ASCII letters by the key's shift value.
    Caesar,
    /// XOR the message bytes with a cycling key.
    Xor,
}

impl fmt::Display for CipherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CipherMethod::None => "none",
            CipherMethod::Base64 => "base64",
            CipherMethod::Reverse => "reverse",
            CipherMethod::Caesar => "caesar",
            CipherMethod::Xor => "xor",
        })
    }
}

/// Transform a message for embedding.
///
/// # Arguments
/// - `method`: cipher to apply
/// - `key`: cipher key; the caesar shift is parsed from it, `xor` cycles
///   over its bytes, other methods ignore it
/// - `data`: message bytes (UTF-8 text at the outer boundary)
///
/// # Returns
/// - `Ok(Vec<u8>)`: the transformed message
/// - `Err(CipherError::MissingKey)`: `xor` was selected with an empty key
///
/// # Example
/// ```
/// use stegotext::cipher::{apply, CipherMethod};
///
/// let out = apply(CipherMethod::Base64, "", b"hello").unwrap();
/// assert_eq!(out, b"aGVsbG8=");
/// ```
pub fn apply(method: CipherMethod, key: &str, data: &[u8]) -> Result<Vec<u8>, CipherError> {
    match method {
        CipherMethod::None => Ok(data.to_vec()),
        CipherMethod::Base64 => Ok(general_purpose::STANDARD.encode(data).into_bytes()),
        CipherMethod::Reverse => Ok(reverse_bytes(data)),
        CipherMethod::Caesar => Ok(caesar_bytes(data, shift_from_key(key))),
        CipherMethod::Xor => xor_bytes(data, key),
    }
}

/// Undo [`apply`] with the same method and key.
///
/// Round-trip law: `invert(m, k, apply(m, k, t)) == t` for every method
/// and every key valid for it.
///
/// # Errors
/// - `CipherError::MissingKey`: `xor` was selected with an empty key
/// - `CipherError::Decode`: the input was not valid base64
pub fn invert(method: CipherMethod, key: &str, data: &[u8]) -> Result<Vec<u8>, CipherError> {
    match method {
        CipherMethod::None => Ok(data.to_vec()),
        CipherMethod::Base64 => Ok(general_purpose::STANDARD.decode(data)?),
        CipherMethod::Reverse => Ok(reverse_bytes(data)),
        CipherMethod::Caesar => Ok(caesar_bytes(data, -shift_from_key(key))),
        CipherMethod::Xor => xor_bytes(data, key),
    }
}

/// Parse the caesar shift out of the key, falling back to the default
/// when the key is empty or not a number. The parsed value is reduced
/// to 0..26 here, so negating it in [`invert`] stays in range for any
/// key, `i64::MIN` included.
fn shift_from_key(key: &str) -> i64 {
    key.trim()
        .parse::<i64>()
        .unwrap_or(DEFAULT_CAESAR_SHIFT)
        .rem_euclid(26)
}

fn reverse_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    out.reverse();
    out
}

/// Rotate ASCII letters by `shift` positions within their case's alphabet.
/// Non-letter bytes (digits, punctuation, UTF-8 continuation bytes) pass
/// through unchanged.
fn caesar_bytes(data: &[u8], shift: i64) -> Vec<u8> {
    // Euclidean remainder keeps negative shifts inside 0..26.
    let shift = shift.rem_euclid(26) as u8;
    data.iter()
        .map(|&b| match b {
            b'a'..=b'z' => b'a' + (b - b'a' + shift) % 26,
            b'A'..=b'Z' => b'A' + (b - b'A' + shift) % 26,
            _ => b,
        })
        .collect()
}

/// XOR each byte with the key byte at the same index modulo the key
/// length. Applying it twice with the same key restores the input.
fn xor_bytes(data: &[u8], key: &str) -> Result<Vec<u8>, CipherError> {
    if key.is_empty() {
        return Err(CipherError::MissingKey(CipherMethod::Xor));
    }
    let key = key.as_bytes();
    Ok(data
        .iter()
        .enumerate()
        .map(|(i, &b)| b ^ key[i % key.len()])
        .collect())
}
