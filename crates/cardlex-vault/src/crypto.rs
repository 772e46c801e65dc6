// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] draws a fresh random 96-bit nonce from the system
//! CSPRNG. Nonce reuse would be catastrophic for GCM security.

use cardlex_core::CardlexError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, CardlexError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| CardlexError::Vault("failed to build AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt plaintext with AES-256-GCM under a random 96-bit nonce.
///
/// Returns `(ciphertext_with_tag, nonce_bytes)`. Both must be stored to
/// decrypt later.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; 12]), CardlexError> {
    let aead = aead_key(key)?;

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; 12];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| CardlexError::Vault("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    aead.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| CardlexError::Vault("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext produced by [`seal`].
///
/// `ciphertext` must include the 16-byte authentication tag. Fails when the
/// key is wrong or the data was tampered with.
pub fn open(
    key: &[u8; 32],
    nonce_bytes: &[u8; 12],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CardlexError> {
    let aead = aead_key(key)?;

    let mut in_out = ciphertext.to_vec();
    let plaintext = aead
        .open_in_place(
            Nonce::assume_unique_for_key(*nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| {
            CardlexError::Vault("AES-256-GCM decryption failed -- wrong key or corrupted data".to_string())
        })?;

    Ok(plaintext.to_vec())
}
