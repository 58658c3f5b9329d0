use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Invalid token format")]
  InvalidToken,
}

// ============================================================================
// SessionToken Value Object (opaque bearer credential)
// ============================================================================

#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
  const TOKEN_LENGTH: usize = 32; // 32 bytes = 256 bits

  /// Generates a new random session token
  pub fn generate() -> Self {
    use rand::Rng;

    let token: [u8; Self::TOKEN_LENGTH] = rand::rngs::OsRng.sample(rand::distributions::Standard);
    Self(hex::encode(token))
  }

  /// Creates a SessionToken from a bearer header value
  pub fn from_string(token: impl Into<String>) -> Result<Self, ValueObjectError> {
    let token = token.into();

    if token.len() != Self::TOKEN_LENGTH * 2 {
      return Err(ValueObjectError::InvalidToken);
    }

    if !token.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(ValueObjectError::InvalidToken);
    }

    Ok(Self(token))
  }

  /// Creates a hash of this token for lookup
  pub fn hash(&self) -> TokenHash {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(self.0.as_bytes());
    let result = hasher.finalize();

    TokenHash(hex::encode(result))
  }

  /// Returns the token as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the token
impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SessionToken(***)")
  }
}

// ============================================================================
// TokenHash Value Object (SHA-256 Hash of Token)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHash(String);

impl TokenHash {
  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for TokenHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
