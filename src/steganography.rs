//! # Steganography Codec
//!
//! Hides a message in the least significant bits of an RGBA pixel buffer
//! and recovers it later. Only the red channel carries data, one bit per
//! pixel, so the visual change is at most one intensity step per pixel.
//!
//! ## Algorithm
//!
//! ### Framing
//!
//! The payload is framed with a decimal length marker before embedding:
//!
//! ```text
//! "hi" -> "2:hi"
//! ```
//!
//! The frame makes the payload self-delimiting: extraction needs no side
//! channel to know where the message ends, and an image without a valid
//! marker is reliably reported as carrying nothing.
//!
//! ### Embedding
//!
//! Each framed byte is split into 8 bits, most significant first, and bit
//! `i` replaces the LSB of the red channel of pixel `i`. Green, blue and
//! alpha channels are never written.
//!
//! ### Extraction
//!
//! Extraction reassembles one byte per 8 pixels and scans the stream for
//! the first `digits:` marker. Two safety bounds keep the scan from
//! chewing through arbitrarily large images that carry no message: the
//! marker must appear within the first 25,000 pixels, and the recovered
//! stream is capped at 10,000 bytes.

use thiserror::Error;

/// Channels per pixel in the raw RGBA buffer.
const BYTES_PER_PIXEL: usize = 4;

/// Pixels inspected before giving up on finding a `digits:` marker.
const MARKER_WINDOW_PIXELS: usize = 25_000;

/// Ceiling on bytes reassembled during extraction.
const MAX_SCAN_BYTES: usize = 10_000;

/// Bytes reserved for the length marker when sizing a message against an
/// image, so `max_message_bytes` stays safe for any message that fits it.
const HEADER_MARGIN: usize = 20;

/// Errors produced by the embedding and extraction routines.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The framed message does not fit in the image.
    #[error(
        "message needs {required_bits} bits but the image only has {available_bits} \
         (capacity {max_message} message bytes)"
    )]
    CapacityExceeded {
        required_bits: usize,
        available_bits: usize,
        max_message: usize,
    },

    /// No valid length marker was found within the scan bounds.
    #[error("no hidden message found in this image")]
    NoPayloadFound,
}

/// Total framed bytes an image of `pixel_count` pixels can carry
/// (one bit per pixel, eight bits per byte).
pub fn capacity_bytes(pixel_count: usize) -> usize {
    pixel_count / 8
}

/// Largest message, in bytes, that is guaranteed to fit once framed.
/// Leaves room for the decimal length prefix and its separator.
pub fn max_message_bytes(pixel_count: usize) -> usize {
    capacity_bytes(pixel_count).saturating_sub(HEADER_MARGIN)
}

/// Prefix the payload with its decimal byte length and a `:` separator.
fn frame_payload(payload: &[u8]) -> Vec<u8> {
    let mut framed = payload.len().to_string().into_bytes();
    framed.push(b':');
    framed.extend_from_slice(payload);
    framed
}

/// Parse a marker prefix into a declared payload length.
///
/// Valid prefixes are non-empty, all ASCII digits, and decode to a
/// length between 1 and the scan ceiling. `"0"` is rejected: a
/// zero-length marker does not delimit a payload. A declaration above
/// the ceiling can never be extracted, so it is rejected here before
/// any end-offset arithmetic can overflow.
fn parse_declared_length(prefix: &[u8]) -> Option<usize> {
    if prefix.is_empty() || !prefix.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(prefix)
        .ok()?
        .parse::<usize>()
        .ok()
        .filter(|&length| length > 0 && length <= MAX_SCAN_BYTES)
}

/// Embed a payload into an RGBA pixel buffer.
///
/// # Arguments
/// - `pixels`: raw RGBA bytes, 4 per pixel
/// - `payload`: message bytes to hide (already ciphered by the caller)
///
/// # Returns
/// - `Ok(Vec<u8>)`: a copy of the buffer with the framed payload written
///   into the red-channel LSBs; untouched pixels keep their exact bytes
/// - `Err(StegoError::CapacityExceeded)`: the framed payload needs more
///   bits than the image has pixels
pub fn embed_payload(pixels: &[u8], payload: &[u8]) -> Result<Vec<u8>, StegoError> {
    let framed = frame_payload(payload);
    let required_bits = framed.len() * 8;
    let available_bits = pixels.len() / BYTES_PER_PIXEL;

    if required_bits > available_bits {
        return Err(StegoError::CapacityExceeded {
            required_bits,
            available_bits,
            max_message: max_message_bytes(available_bits),
        });
    }

    let mut out = pixels.to_vec();
    for (byte_index, &byte) in framed.iter().enumerate() {
        for bit_index in 0..8 {
            let bit = (byte >> (7 - bit_index)) & 1;
            let offset = (byte_index * 8 + bit_index) * BYTES_PER_PIXEL;
            out[offset] = (out[offset] & 0xFE) | bit;
        }
    }
    Ok(out)
}

/// Recover the payload hidden in an RGBA pixel buffer.
///
/// Reassembles bytes from the red-channel LSBs and looks for the first
/// `digits:` marker in the stream. The digits before the first `:` are
/// the only candidate: if they do not form a valid length, no later `:`
/// is considered.
///
/// # Returns
/// - `Ok(Vec<u8>)`: the payload bytes declared by the marker
/// - `Err(StegoError::NoPayloadFound)`: no valid marker within the first
///   25,000 pixels, the stream grew past 10,000 bytes, or the image ended
///   before the declared payload was complete
pub fn extract_payload(pixels: &[u8]) -> Result<Vec<u8>, StegoError> {
    let pixel_count = pixels.len() / BYTES_PER_PIXEL;

    let mut bytes: Vec<u8> = Vec::new();
    let mut current = 0u8;
    let mut bits_in_current = 0usize;
    // Index of the first `:` and the length its prefix declared.
    let mut separator: Option<usize> = None;
    let mut declared: Option<usize> = None;
    // Bytes already scanned for the separator, so the search stays O(n).
    let mut checked = 0usize;

    for pixel_index in 0..pixel_count {
        if declared.is_none() && pixel_index >= MARKER_WINDOW_PIXELS {
            return Err(StegoError::NoPayloadFound);
        }

        let bit = pixels[pixel_index * BYTES_PER_PIXEL] & 1;
        current = (current << 1) | bit;
        bits_in_current += 1;
        if bits_in_current < 8 {
            continue;
        }

        bytes.push(current);
        current = 0;
        bits_in_current = 0;

        if bytes.len() > MAX_SCAN_BYTES {
            return Err(StegoError::NoPayloadFound);
        }

        if separator.is_none() {
            if let Some(found) = bytes[checked..].iter().position(|&b| b == b':') {
                let at = checked + found;
                separator = Some(at);
                // The first separator fixes the marker for good. A junk
                // prefix here means the stream never yields a payload.
                declared = parse_declared_length(&bytes[..at]);
                if declared.is_none() {
                    return Err(StegoError::NoPayloadFound);
                }
            }
            checked = bytes.len();
        }

        if let (Some(at), Some(length)) = (separator, declared) {
            let needed = at + 1 + length;
            if needed > MAX_SCAN_BYTES {
                return Err(StegoError::NoPayloadFound);
            }
            if bytes.len() >= needed {
                return Ok(bytes[at + 1..needed].to_vec());
            }
        }
    }

    Err(StegoError::NoPayloadFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RGBA buffer with a deterministic non-trivial byte pattern.
    fn pixel_buffer(pixel_count: usize) -> Vec<u8> {
        (0..pixel_count * BYTES_PER_PIXEL)
            .map(|i| (i % 251) as u8)
            .collect()
    }

    /// Write raw bytes straight into the red-channel LSBs, bypassing the
    /// framing step, to build malformed streams.
    fn write_raw_bits(pixels: &mut [u8], data: &[u8]) {
        for (byte_index, &byte) in data.iter().enumerate() {
            for bit_index in 0..8 {
                let bit = (byte >> (7 - bit_index)) & 1;
                let offset = (byte_index * 8 + bit_index) * BYTES_PER_PIXEL;
                pixels[offset] = (pixels[offset] & 0xFE) | bit;
            }
        }
    }

    #[test]
    fn test_hi_frames_to_32_pixels() {
        // "hi" framed is "2:hi", 4 bytes, so exactly 32 pixels change at most.
        let pixels = pixel_buffer(32);
        let out = embed_payload(&pixels, b"hi").unwrap();
        assert_eq!(out.len(), pixels.len());
        assert_eq!(extract_payload(&out).unwrap(), b"hi");
    }

    #[test]
    fn test_embed_extract_round_trip() {
        let pixels = pixel_buffer(4_096);
        let message = "bonjour, monde 🌍".as_bytes();
        let out = embed_payload(&pixels, message).unwrap();
        assert_eq!(extract_payload(&out).unwrap(), message);
    }

    #[test]
    fn test_capacity_boundary() {
        // 64 pixels hold 64 bits = 8 framed bytes. "6:abcdef" fits exactly;
        // one more message byte pushes the frame to 9 bytes.
        let pixels = pixel_buffer(64);
        assert!(embed_payload(&pixels, b"abcdef").is_ok());

        match embed_payload(&pixels, b"abcdefg") {
            Err(StegoError::CapacityExceeded {
                required_bits,
                available_bits,
                ..
            }) => {
                assert_eq!(required_bits, 72);
                assert_eq!(available_bits, 64);
            }
            other => panic!("expected CapacityExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_embed_touches_only_red_channel_lsbs() {
        let pixels = pixel_buffer(256);
        let out = embed_payload(&pixels, b"inspect me").unwrap();

        for (i, (&before, &after)) in pixels.iter().zip(out.iter()).enumerate() {
            if i % BYTES_PER_PIXEL == 0 {
                assert_eq!(before & 0xFE, after & 0xFE, "red byte {} changed above the LSB", i);
            } else {
                assert_eq!(before, after, "non-red byte {} changed", i);
            }
        }
    }

    #[test]
    fn test_extract_without_marker_reports_no_payload() {
        // All-zero LSBs decode to NUL bytes: no digits, no separator.
        let pixels = vec![0u8; 512 * BYTES_PER_PIXEL];
        assert!(matches!(
            extract_payload(&pixels),
            Err(StegoError::NoPayloadFound)
        ));
    }

    #[test]
    fn test_extract_gives_up_after_the_marker_window() {
        let pixels = vec![0u8; (MARKER_WINDOW_PIXELS + 64) * BYTES_PER_PIXEL];
        assert!(matches!(
            extract_payload(&pixels),
            Err(StegoError::NoPayloadFound)
        ));
    }

    #[test]
    fn test_zero_length_marker_is_not_a_payload() {
        let mut pixels = pixel_buffer(128);
        write_raw_bits(&mut pixels, b"0:");
        assert!(matches!(
            extract_payload(&pixels),
            Err(StegoError::NoPayloadFound)
        ));
    }

    #[test]
    fn test_non_digit_prefix_is_not_a_marker() {
        // The first `:` fixes the candidate prefix. "abc" is not a length,
        // and the later "7:" marker must not rescue the stream.
        let mut pixels = pixel_buffer(512);
        write_raw_bits(&mut pixels, b"abc:7:payload");
        assert!(matches!(
            extract_payload(&pixels),
            Err(StegoError::NoPayloadFound)
        ));
    }

    #[test]
    fn test_truncated_payload_reports_no_payload() {
        // Marker declares 10 bytes but the image ends after "hi".
        let mut pixels = pixel_buffer(40);
        write_raw_bits(&mut pixels, b"10:hi");
        assert!(matches!(
            extract_payload(&pixels),
            Err(StegoError::NoPayloadFound)
        ));
    }

    #[test]
    fn test_declared_length_beyond_scan_ceiling_fails() {
        let mut pixels = pixel_buffer((MAX_SCAN_BYTES + 16) * 8);
        write_raw_bits(&mut pixels, b"99999:");
        assert!(matches!(
            extract_payload(&pixels),
            Err(StegoError::NoPayloadFound)
        ));
    }

    #[test]
    fn test_overflowing_declared_length_is_rejected() {
        // A corrupted stream can declare any length up to usize::MAX;
        // the decoder must refuse it, not wrap the payload end offset.
        let mut pixels = pixel_buffer(256);
        write_raw_bits(&mut pixels, b"18446744073709551615:");
        assert!(matches!(
            extract_payload(&pixels),
            Err(StegoError::NoPayloadFound)
        ));
    }

    #[test]
    fn test_leading_zeros_in_declared_length() {
        let mut pixels = pixel_buffer(256);
        write_raw_bits(&mut pixels, b"007:seven b");
        assert_eq!(extract_payload(&pixels).unwrap(), b"seven b");
    }

    #[test]
    fn test_payload_may_contain_separators() {
        let pixels = pixel_buffer(512);
        let out = embed_payload(&pixels, b"12:34:56").unwrap();
        assert_eq!(extract_payload(&out).unwrap(), b"12:34:56");
    }

    #[test]
    fn test_capacity_helpers() {
        assert_eq!(capacity_bytes(800), 100);
        assert_eq!(max_message_bytes(800), 80);
        // Tiny images round down to zero rather than underflowing.
        assert_eq!(max_message_bytes(64), 0);
    }

    #[test]
    fn test_trailing_partial_pixel_bytes_are_ignored() {
        // Buffers whose length is not a multiple of 4 still decode; the
        // stray tail bytes never form a full pixel.
        let mut pixels = pixel_buffer(40);
        write_raw_bits(&mut pixels, b"2:ok");
        pixels.extend_from_slice(&[0xAB, 0xCD]);
        assert_eq!(extract_payload(&pixels).unwrap(), b"ok");
    }
}
