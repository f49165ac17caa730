use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

use super::errors::TokenError;

/// Number of random bytes behind every token.
pub const TOKEN_BYTES: usize = 32;

/// Size of a token digest in bytes (SHA-256).
pub const DIGEST_BYTES: usize = 32;

/// One-way digest of a token plaintext.
///
/// This is the only form of a token that is ever stored or compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenDigest([u8; DIGEST_BYTES]);

impl TokenDigest {
    /// Compute the digest of a token plaintext.
    ///
    /// Deterministic: the same plaintext always yields the same digest,
    /// which is what makes lookup by digest possible.
    pub fn from_plaintext(plaintext: &str) -> Self {
        Self(Sha256::digest(plaintext.as_bytes()).into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Freshly generated token: plaintext plus digest.
///
/// The plaintext is meant to be handed to the client once and then dropped.
#[derive(Clone)]
pub struct OpaqueToken {
    plaintext: String,
    digest: TokenDigest,
}

impl OpaqueToken {
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    pub fn digest(&self) -> &TokenDigest {
        &self.digest
    }

    /// Split into plaintext and digest.
    pub fn into_parts(self) -> (String, TokenDigest) {
        (self.plaintext, self.digest)
    }
}

impl fmt::Debug for OpaqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueToken")
            .field("plaintext", &"[redacted]")
            .field("digest", &self.digest)
            .finish()
    }
}

/// Opaque bearer token generator.
///
/// Tokens are 32 bytes from the operating system CSPRNG, encoded as
/// URL-safe base64 without padding. The digest is a plain SHA-256 of the
/// encoded plaintext; no key is involved because the input is already
/// unguessable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new token.
    ///
    /// # Errors
    /// * `RandomSourceUnavailable` - The OS random source could not be read
    pub fn generate(&self) -> Result<OpaqueToken, TokenError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::RandomSourceUnavailable(e.to_string()))?;

        let plaintext = URL_SAFE_NO_PAD.encode(bytes);
        let digest = TokenDigest::from_plaintext(&plaintext);

        Ok(OpaqueToken { plaintext, digest })
    }
}
