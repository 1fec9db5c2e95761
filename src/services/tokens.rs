use rand::Rng;
use sha2::{Digest, Sha256};

/// Generates a password reset token: 32 random bytes, hex encoded.
pub fn generate_reset_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Digest stored in place of the raw token.
pub fn digest_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
