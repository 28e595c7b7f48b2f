//! Admin key gate
//!
//! The admin secret is never stored; only its SHA-256 digest is configured,
//! and every admin request is checked against it on the server.

use sha2::{Digest, Sha256};

use crate::error::{TimerError, TimerResult};

/// Checks admin keys against a configured SHA-256 digest
#[derive(Clone)]
pub struct AdminGate {
    key_hash: [u8; 32],
}

impl AdminGate {
    /// Build from a hex-encoded SHA-256 digest
    pub fn from_hex(hash: &str) -> Result<Self, String> {
        let bytes = hex::decode(hash.trim()).map_err(|e| format!("Invalid admin key hash: {}", e))?;
        let key_hash: [u8; 32] = bytes
            .try_into()
            .map_err(|_| "Admin key hash must be a 32 byte SHA-256 digest".to_string())?;
        Ok(Self { key_hash })
    }

    /// Build from the plaintext secret
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key_hash: digest(secret),
        }
    }

    /// Accept the key if its digest matches
    pub fn verify(&self, key: &str) -> TimerResult<()> {
        let candidate = digest(key);
        // Touch every byte so timing does not reveal the matching prefix
        let diff = candidate
            .iter()
            .zip(self.key_hash.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        if diff == 0 {
            Ok(())
        } else {
            Err(TimerError::AuthMismatch)
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

/// Hex SHA-256 of a secret, as printed by `--hash-key`
pub fn hash_secret(secret: &str) -> String {
    hex::encode(digest(secret))
}

fn digest(secret: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(secret.as_bytes()));
    out
}
