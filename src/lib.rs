//! Hide short text messages in the least significant bits of image
//! pixels, with optional cipher obfuscation applied before embedding.

pub mod cipher;
pub mod config;
pub mod steganography;

pub use cipher::{CipherError, CipherMethod};
pub use config::StegoConfig;
pub use steganography::{embed_payload, extract_payload, StegoError};
