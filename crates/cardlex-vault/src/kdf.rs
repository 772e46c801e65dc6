// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the installation password.
//!
//! Derivation is deterministic for a given (password, salt, iterations)
//! triple; freshness comes from the per-encryption random salt.

use std::num::NonZeroU32;

use cardlex_core::CardlexError;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte AES key from the installation password.
///
/// The returned key is wrapped in [`Zeroizing`] so it is wiped from memory
/// on drop.
pub fn derive_key(
    password: &[u8],
    salt: &[u8; 16],
    iterations: u32,
) -> Result<Zeroizing<[u8; 32]>, CardlexError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| CardlexError::Vault("PBKDF2 iteration count must be non-zero".to_string()))?;

    let mut output = Zeroizing::new([0u8; 32]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        output.as_mut(),
    );

    Ok(output)
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> Result<[u8; 16], CardlexError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; 16];
    rng.fill(&mut salt)
        .map_err(|_| CardlexError::Vault("failed to generate random salt".to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count keeps the tests fast; production uses 100k.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn derive_key_is_deterministic() {
        let salt = [1u8; 16];
        let key1 = derive_key(b"installation password", &salt, TEST_ITERATIONS).unwrap();
        let key2 = derive_key(b"installation password", &salt, TEST_ITERATIONS).unwrap();
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn different_password_produces_different_key() {
        let salt = [2u8; 16];
        let key1 = derive_key(b"password one", &salt, TEST_ITERATIONS).unwrap();
        let key2 = derive_key(b"password two", &salt, TEST_ITERATIONS).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_salt_produces_different_key() {
        let key1 = derive_key(b"same password", &[1u8; 16], TEST_ITERATIONS).unwrap();
        let key2 = derive_key(b"same password", &[2u8; 16], TEST_ITERATIONS).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_iteration_count_produces_different_key() {
        let salt = [3u8; 16];
        let key1 = derive_key(b"password", &salt, 1_000).unwrap();
        let key2 = derive_key(b"password", &salt, 2_000).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn zero_iterations_is_rejected() {
        assert!(derive_key(b"password", &[0u8; 16], 0).is_err());
    }

    #[test]
    fn generate_salt_produces_random_values() {
        let salt1 = generate_salt().unwrap();
        let salt2 = generate_salt().unwrap();
        assert_ne!(salt1, salt2);
    }
}
