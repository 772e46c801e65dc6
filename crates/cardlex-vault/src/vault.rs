// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential encryption and decryption.
//!
//! One credential, one machine-generated installation password. The
//! password never leaves the installation; it exists so the API key is not
//! stored in the clear, not to gate access behind a user passphrase.
//!
//! Every encryption draws a fresh salt and a fresh nonce, so encrypting the
//! same key twice yields two unrelated blobs. All decryption failures
//! collapse into [`DECRYPT_FAILED`]: a caller cannot tell a wrong password
//! from corrupted data.

use cardlex_core::CardlexError;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::blob::EncryptedBlob;
use crate::crypto;
use crate::kdf;

/// The single message every decryption failure surfaces as.
pub const DECRYPT_FAILED: &str = "credential decryption failed";

/// Generate the per-installation password: 32 random bytes, hex-encoded.
pub fn generate_installation_password() -> Result<SecretString, CardlexError> {
    let rng = SystemRandom::new();
    let mut bytes = Zeroizing::new([0u8; 32]);
    rng.fill(bytes.as_mut())
        .map_err(|_| CardlexError::Vault("failed to generate installation password".to_string()))?;
    Ok(SecretString::from(hex::encode(bytes.as_ref())))
}

/// Encrypt an API key under the installation password.
pub fn encrypt_credential(
    api_key: &str,
    password: &SecretString,
    iterations: u32,
) -> Result<EncryptedBlob, CardlexError> {
    let salt = kdf::generate_salt()?;
    let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt, iterations)?;
    let (ciphertext, nonce) = crypto::seal(&key, api_key.as_bytes())?;
    Ok(EncryptedBlob::assemble(&salt, &nonce, &ciphertext))
}

/// Decrypt a stored blob back into the API key.
///
/// Any failure (malformed blob, wrong password, tampered ciphertext,
/// non-UTF-8 plaintext) returns the same opaque error.
pub fn decrypt_credential(
    blob: &EncryptedBlob,
    password: &SecretString,
    iterations: u32,
) -> Result<SecretString, CardlexError> {
    decrypt_inner(blob, password, iterations)
        .map_err(|_| CardlexError::Vault(DECRYPT_FAILED.to_string()))
}

fn decrypt_inner(
    blob: &EncryptedBlob,
    password: &SecretString,
    iterations: u32,
) -> Result<SecretString, CardlexError> {
    let (salt, nonce, ciphertext) = blob.parts()?;
    let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt, iterations)?;
    let plaintext = Zeroizing::new(crypto::open(&key, &nonce, &ciphertext)?);
    let api_key = std::str::from_utf8(&plaintext)
        .map_err(|_| CardlexError::Vault("plaintext is not UTF-8".to_string()))?;
    Ok(SecretString::from(api_key.to_string()))
}

/// Render a short masked preview of a secret for status output.
pub fn mask_secret(value: &str) -> String {
    let total = value.chars().count();
    if total < 10 {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    let suffix: String = value.chars().skip(total - 4).collect();
    format!("{prefix}...{suffix}")
}
