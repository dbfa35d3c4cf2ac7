//! End-to-end checks over the cipher and steganography pipeline.

use rand::Rng;

use stegotext::cipher::{self, CipherMethod};
use stegotext::steganography;

/// Random RGBA buffer standing in for a decoded photo.
fn random_pixels(pixel_count: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..pixel_count * 4).map(|_| rng.gen()).collect()
}

#[test]
fn test_full_pipeline_round_trip_for_every_method() {
    let message = "Rendezvous at 23:00, bring the umbrella ☂";
    let pixels = random_pixels(8_192);

    let cases = [
        (CipherMethod::None, ""),
        (CipherMethod::Base64, ""),
        (CipherMethod::Reverse, ""),
        (CipherMethod::Caesar, "19"),
        (CipherMethod::Xor, "correct horse"),
    ];

    for (method, key) in cases {
        let ciphered = cipher::apply(method, key, message.as_bytes()).unwrap();
        let stego = steganography::embed_payload(&pixels, &ciphered).unwrap();
        let payload = steganography::extract_payload(&stego).unwrap();
        let plain = cipher::invert(method, key, &payload).unwrap();

        assert_eq!(
            String::from_utf8(plain).unwrap(),
            message,
            "pipeline failed for {}",
            method
        );
    }
}

#[test]
fn test_extract_from_untouched_image_finds_nothing() {
    let mut pixels = random_pixels(4_096);
    // Zero every red LSB so the bit stream is all zeros, the same as a
    // flat single-color photo.
    for pixel in pixels.chunks_exact_mut(4) {
        pixel[0] &= 0xFE;
    }

    assert!(matches!(
        steganography::extract_payload(&pixels),
        Err(steganography::StegoError::NoPayloadFound)
    ));
}

#[test]
fn test_wrong_xor_key_garbles_the_text_but_not_the_payload() {
    let message = "attack at dawn";
    let pixels = random_pixels(4_096);

    let ciphered = cipher::apply(CipherMethod::Xor, "right", message.as_bytes()).unwrap();
    let stego = steganography::embed_payload(&pixels, &ciphered).unwrap();

    // The payload itself comes back intact regardless of the key.
    let payload = steganography::extract_payload(&stego).unwrap();
    assert_eq!(payload, ciphered);

    // Inverting with the wrong key yields bytes, just not the message.
    let garbled = cipher::invert(CipherMethod::Xor, "wrong", &payload).unwrap();
    assert_ne!(garbled, message.as_bytes());
}
