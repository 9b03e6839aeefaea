//! AES-256-GCM envelope sealing.
//!
//! Every envelope carries its own salt and nonce, so a single password is
//! enough to open it:
//!
//! ```text
//! [ 32-byte salt | 12-byte nonce | ciphertext + 16-byte auth tag ]
//! ```
//!
//! There is no magic number and no length field; offsets are fixed by the
//! salt and nonce sizes.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use super::kdf::{derive_key, generate_salt, validate_password, SALT_LEN};
use crate::errors::{MacroVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest envelope that can possibly decrypt (empty payload).
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Seal `payload` under `password` with a fresh random salt and nonce.
pub fn seal(payload: &[u8], password: &str) -> Result<Vec<u8>> {
    validate_password(password)?;

    let salt = generate_salt();
    let generated = Aes256Gcm::generate_nonce(&mut OsRng);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&generated);

    seal_with(payload, password, &salt, &nonce)
}

/// Seal `payload` with caller-chosen salt and nonce.
///
/// Output is fully deterministic. Never reuse a (salt, nonce) pair for
/// different payloads outside of tests.
pub fn seal_with(
    payload: &[u8],
    password: &str,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    validate_password(password)?;

    let key = derive_key(password.as_bytes(), salt)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_ref())
        .map_err(|e| MacroVaultError::Persistence(format!("invalid key length: {e}")))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(nonce), payload)
        .map_err(|e| MacroVaultError::Persistence(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    output.extend_from_slice(salt);
    output.extend_from_slice(nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Open an envelope produced by [`seal`].
///
/// A wrong password and a tampered envelope are indistinguishable here:
/// both fail tag verification and surface as `InvalidPassword`. Envelopes
/// too short to hold salt, nonce and tag are rejected as `CorruptedData`
/// before any key derivation runs.
pub fn open(envelope: &[u8], password: &str) -> Result<Vec<u8>> {
    validate_password(password)?;

    if envelope.len() < MIN_ENVELOPE_LEN {
        return Err(MacroVaultError::CorruptedData(format!(
            "envelope is {} bytes, expected at least {MIN_ENVELOPE_LEN}",
            envelope.len()
        )));
    }

    let (salt, rest) = envelope.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let key = derive_key(password.as_bytes(), salt)?;
    let cipher =
        Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| MacroVaultError::InvalidPassword)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| MacroVaultError::InvalidPassword)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "secret123";

    #[test]
    fn seal_open_roundtrip() {
        let sealed = seal(b"{\"name\":\"m1\"}", PASSWORD).unwrap();
        assert_eq!(sealed.len(), MIN_ENVELOPE_LEN + 13);
        assert_eq!(open(&sealed, PASSWORD).unwrap(), b"{\"name\":\"m1\"}");
    }

    #[test]
    fn empty_payload_produces_minimum_envelope() {
        let sealed = seal(b"", PASSWORD).unwrap();
        assert_eq!(sealed.len(), MIN_ENVELOPE_LEN);
        assert!(open(&sealed, PASSWORD).unwrap().is_empty());
    }

    #[test]
    fn seal_with_is_deterministic() {
        let salt = [3u8; SALT_LEN];
        let nonce = [9u8; NONCE_LEN];
        let a = seal_with(b"payload", PASSWORD, &salt, &nonce).unwrap();
        let b = seal_with(b"payload", PASSWORD, &salt, &nonce).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a[..SALT_LEN], &salt);
        assert_eq!(&a[SALT_LEN..SALT_LEN + NONCE_LEN], &nonce);
    }

    #[test]
    fn random_salt_and_nonce_differ_per_call() {
        let a = seal(b"payload", PASSWORD).unwrap();
        let b = seal(b"payload", PASSWORD).unwrap();
        assert_ne!(a[..SALT_LEN + NONCE_LEN], b[..SALT_LEN + NONCE_LEN]);
    }

    #[test]
    fn short_password_rejected_before_sealing() {
        assert!(matches!(
            seal(b"x", "short"),
            Err(MacroVaultError::PasswordPolicy(_))
        ));
    }

    #[test]
    fn short_envelope_is_corrupted() {
        let blob = vec![0u8; MIN_ENVELOPE_LEN - 1];
        assert!(matches!(
            open(&blob, PASSWORD),
            Err(MacroVaultError::CorruptedData(_))
        ));
    }
}
