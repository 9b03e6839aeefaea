//! Cryptographic primitives for MacroVault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 key derivation and the password policy (`kdf`)
//! - AES-256-GCM envelope sealing (`envelope`)
//! - The `Codec` seam the repository encrypts through

pub mod envelope;
pub mod kdf;

pub use envelope::{open, seal, seal_with, MIN_ENVELOPE_LEN, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_key, generate_salt, validate_password, MIN_PASSWORD_LEN, SALT_LEN};

use crate::errors::Result;

/// A password-based authenticated encryption scheme.
///
/// Implementations are stateless byte transforms: no I/O, no caching.
pub trait Codec: Send + Sync {
    /// Name recorded in the payload metadata (e.g. `"AES-256-GCM"`).
    fn algorithm(&self) -> &'static str;

    fn encrypt(&self, payload: &[u8], password: &str) -> Result<Vec<u8>>;

    fn decrypt(&self, envelope: &[u8], password: &str) -> Result<Vec<u8>>;

    fn validate_password(&self, password: &str) -> Result<()> {
        validate_password(password)
    }
}

/// AES-256-GCM with a PBKDF2-derived key; see [`envelope`] for the layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmCodec;

impl Codec for AesGcmCodec {
    fn algorithm(&self) -> &'static str {
        "AES-256-GCM"
    }

    fn encrypt(&self, payload: &[u8], password: &str) -> Result<Vec<u8>> {
        seal(payload, password)
    }

    fn decrypt(&self, envelope: &[u8], password: &str) -> Result<Vec<u8>> {
        open(envelope, password)
    }
}
