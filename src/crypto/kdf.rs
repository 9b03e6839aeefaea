//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is fixed: it is not stored in the envelope, so a
//! file sealed with one count can only be opened with the same count.

use hmac::Hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::errors::{MacroVaultError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 rounds. Deliberately slow to resist brute force.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Reject passwords shorter than [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(MacroVaultError::PasswordPolicy(
            "password cannot be empty".into(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(MacroVaultError::PasswordPolicy(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

/// Derive a 32-byte key from a password and salt.
///
/// The same password + salt always produce the same key. The key is
/// wiped from memory when the returned buffer is dropped.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, PBKDF2_ITERATIONS, key.as_mut())
        .map_err(|e| MacroVaultError::Persistence(format!("key derivation failed: {e}")))?;
    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
