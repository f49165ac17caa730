//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id)
//! - Opaque bearer token generation and digesting (random + SHA-256)
//!
//! Each service defines its own token model and storage and adapts these
//! primitives. Nothing in this crate touches a database or the network.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Opaque Tokens
//! ```
//! use auth::{TokenDigest, TokenGenerator};
//!
//! let token = TokenGenerator::new().generate().unwrap();
//!
//! // Only the digest is stored; the plaintext goes back to the client.
//! let stored = *token.digest();
//!
//! // On a later request the presented plaintext is digested again.
//! assert_eq!(TokenDigest::from_plaintext(token.plaintext()), stored);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::OpaqueToken;
pub use token::TokenDigest;
pub use token::TokenError;
pub use token::TokenGenerator;
