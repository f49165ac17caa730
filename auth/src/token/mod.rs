pub mod errors;
pub mod generator;

pub use errors::TokenError;
pub use generator::OpaqueToken;
pub use generator::TokenDigest;
pub use generator::TokenGenerator;
