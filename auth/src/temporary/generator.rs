use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

/// Bytes of entropy in a raw temporary token (hex-encoded to 40 chars).
const TOKEN_BYTES: usize = 20;

/// A freshly generated temporary token.
///
/// Only `hash` and `expires_at` may be persisted. `raw` is delivered to the
/// user out of band and then dropped.
#[derive(Debug, Clone)]
pub struct TemporaryToken {
    pub raw: String,
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Generates and redeems time-boxed secrets for email verification and
/// password reset links.
#[derive(Debug, Clone, Copy)]
pub struct TemporaryTokenGenerator {
    ttl: Duration,
}

impl TemporaryTokenGenerator {
    pub const DEFAULT_TTL_MINUTES: i64 = 10;

    /// Create a generator whose tokens expire `ttl` after issuance.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Generate a new token expiring `ttl` from now.
    pub fn generate(&self) -> TemporaryToken {
        self.generate_at(Utc::now())
    }

    /// Generate a new token expiring `ttl` after `now`.
    pub fn generate_at(&self, now: DateTime<Utc>) -> TemporaryToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let raw = hex::encode(bytes);
        let hash = Self::hash(&raw);

        TemporaryToken {
            raw,
            hash,
            expires_at: now + self.ttl,
        }
    }

    /// SHA-256 of a raw token, hex-encoded. Deterministic, so the stored
    /// value can be looked up from a presented raw token.
    pub fn hash(raw: &str) -> String {
        hex::encode(Sha256::digest(raw.as_bytes()))
    }

    /// Check a presented raw token against its stored hash and expiry.
    ///
    /// Returns `false` for a wrong token and for an expired one alike.
    pub fn redeem(candidate: &str, stored_hash: &str, expires_at: DateTime<Utc>) -> bool {
        Self::redeem_at(candidate, stored_hash, expires_at, Utc::now())
    }

    /// Same as [`Self::redeem`] with an explicit clock.
    pub fn redeem_at(
        candidate: &str,
        stored_hash: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        let candidate_hash = Self::hash(candidate);
        let hash_matches = constant_time_eq(candidate_hash.as_bytes(), stored_hash.as_bytes());
        let not_expired = now <= expires_at;

        hash_matches & not_expired
    }
}

impl Default for TemporaryTokenGenerator {
    fn default() -> Self {
        Self::new(Duration::minutes(Self::DEFAULT_TTL_MINUTES))
    }
}

/// Byte comparison whose running time depends only on the input lengths.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
